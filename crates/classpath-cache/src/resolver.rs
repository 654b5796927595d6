//! Class path resolution.
//!
//! Resolves identifiers with the following priority:
//! 1. In-memory cache (hydrated from the artifact at construction)
//! 2. Name mapping + include path search, recorded into the cache
//!
//! Misses are cached too. The artifact is rewritten once, at shutdown, and
//! only when this run computed something new.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tracing::{debug, info, trace};

use crate::cache::{CacheMap, ResolutionCache};
use crate::error::ClasspathResult;
use crate::loader::HostLoader;
use crate::naming::NameMapper;
use crate::search::{FileProbe, OsProbe, PathSearch};
use crate::store::CacheStore;
use crate::types::{ClasspathConfig, ResolvedPath};

/// Scope tag set when a resolver is created.
pub const DEFAULT_SCOPE: &str = "default";

/// What happened to the cache artifact at shutdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Persistence is turned off.
    Disabled,

    /// An earlier shutdown already handled the flush.
    AlreadyFlushed,

    /// Nothing new was computed; the artifact was left untouched.
    Clean,

    /// The artifact was rewritten.
    Written { entries: usize },

    /// The write failed. The previous artifact, if any, is still in place.
    Failed,
}

impl fmt::Display for FlushOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::AlreadyFlushed => write!(f, "already-flushed"),
            Self::Clean => write!(f, "clean"),
            Self::Written { entries } => write!(f, "written:{}", entries),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Cache-backed class path resolver.
///
/// One instance per process, shared by reference. Call [`shutdown`] when
/// resolution is over; dropping the resolver flushes as well.
///
/// [`shutdown`]: ClassResolver::shutdown
pub struct ClassResolver {
    /// Configuration.
    config: ClasspathConfig,

    /// Identifier to relative path mapping.
    mapper: NameMapper,

    /// Include path search.
    search: PathSearch,

    /// Artifact store, absent when persistence is disabled.
    store: Option<CacheStore>,

    /// Entries plus the dirty counter.
    cache: Mutex<ResolutionCache>,

    /// Context tag for collaborators.
    scope: RwLock<String>,

    flushed: AtomicBool,
}

impl fmt::Debug for ClassResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassResolver")
            .field("config", &self.config)
            .field("entries", &self.len())
            .field("added", &self.added_count())
            .field("scope", &self.scope())
            .finish_non_exhaustive()
    }
}

impl ClassResolver {
    /// Create a resolver searching the real filesystem.
    pub fn new(config: ClasspathConfig) -> ClasspathResult<Self> {
        Self::with_probe(config, Arc::new(OsProbe))
    }

    /// Create a resolver from environment configuration.
    pub fn from_env() -> ClasspathResult<Self> {
        Self::new(ClasspathConfig::from_env())
    }

    /// Create a resolver with a custom existence probe.
    pub fn with_probe(config: ClasspathConfig, probe: Arc<dyn FileProbe>) -> ClasspathResult<Self> {
        config.validate()?;

        let mapper = NameMapper::new(config.delimiter, config.extension.clone());
        let search = PathSearch::with_probe(config.include_path.clone(), probe);
        let store = if config.no_cache {
            None
        } else {
            Some(CacheStore::from_config(&config))
        };

        let mut cache = ResolutionCache::new();
        if let Some(store) = &store {
            cache.replace_all(store.load());
        }

        info!(
            base_dir = %config.base_dir.display(),
            roots = config.include_path.len(),
            cached = cache.len(),
            persistent = store.is_some(),
            "class resolver ready"
        );

        Ok(Self {
            config,
            mapper,
            search,
            store,
            cache: Mutex::new(cache),
            scope: RwLock::new(DEFAULT_SCOPE.to_string()),
            flushed: AtomicBool::new(false),
        })
    }

    fn cache(&self) -> MutexGuard<'_, ResolutionCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve an identifier to a path relative to the base directory, or a
    /// confirmed miss. Only the first call per identifier touches the
    /// filesystem.
    pub fn resolve(&self, identifier: &str) -> ResolvedPath {
        if let Some(hit) = self.cache().lookup(identifier).cloned() {
            trace!(identifier, resolved = %hit, "class path cache hit");
            return hit;
        }

        let relative = self.mapper.to_relative_path(identifier);
        let resolved = match self.search.find(&relative) {
            Some(full) => ResolvedPath::Found(self.strip_base_dir(&full)),
            None => ResolvedPath::Missing,
        };
        debug!(identifier, candidate = %relative, resolved = %resolved, "resolved class path");

        self.cache().record(identifier, resolved)
    }

    fn strip_base_dir(&self, full: &Path) -> String {
        full.strip_prefix(&self.config.base_dir)
            .unwrap_or(full)
            .to_string_lossy()
            .into_owned()
    }

    /// Absolute location of the file defining `identifier`.
    pub fn full_path(&self, identifier: &str) -> Option<PathBuf> {
        self.resolve(identifier)
            .as_path()
            .map(|path| self.config.base_dir.join(path))
    }

    /// Resolve and hand the file to `loader`.
    ///
    /// Returns `false` on a miss so the host can try its next strategy.
    pub fn autoload<L: HostLoader + ?Sized>(&self, identifier: &str, loader: &L) -> bool {
        match self.full_path(identifier) {
            Some(path) => loader.load(identifier, &path),
            None => false,
        }
    }

    /// Tag the process context. Last writer wins.
    pub fn register_scope(&self, code: impl Into<String>) {
        let code = code.into();
        debug!(scope = %code, "registered class path scope");
        *self.scope.write().unwrap_or_else(PoisonError::into_inner) = code;
    }

    /// Current context tag.
    pub fn scope(&self) -> String {
        self.scope
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Entries computed during this run.
    pub fn added_count(&self) -> usize {
        self.cache().added_count()
    }

    pub fn is_dirty(&self) -> bool {
        self.cache().is_dirty()
    }

    /// Number of cached identifiers, hits and misses alike.
    pub fn len(&self) -> usize {
        self.cache().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache().is_empty()
    }

    /// Copy of the cached entries in identifier order.
    pub fn snapshot(&self) -> CacheMap {
        self.cache().snapshot()
    }

    pub fn config(&self) -> &ClasspathConfig {
        &self.config
    }

    /// Artifact store, if persistence is enabled.
    pub fn store(&self) -> Option<&CacheStore> {
        self.store.as_ref()
    }

    /// Finish resolution and persist new entries.
    pub fn shutdown(self) -> FlushOutcome {
        self.flush_once()
    }

    fn flush_once(&self) -> FlushOutcome {
        if self.flushed.swap(true, Ordering::AcqRel) {
            return FlushOutcome::AlreadyFlushed;
        }
        let Some(store) = &self.store else {
            return FlushOutcome::Disabled;
        };

        let entries = {
            let cache = self.cache();
            if !cache.is_dirty() {
                debug!("class path cache unchanged, skipping save");
                return FlushOutcome::Clean;
            }
            cache.snapshot()
        };

        if store.save(&entries) {
            FlushOutcome::Written {
                entries: entries.len(),
            }
        } else {
            FlushOutcome::Failed
        }
    }
}

impl Drop for ClassResolver {
    fn drop(&mut self) {
        let outcome = self.flush_once();
        trace!(outcome = %outcome, "class resolver dropped");
    }
}
