//! Persisted cache artifact.
//!
//! # Artifact Format
//!
//! ```text
//! # This file is automatically generated by classpath-cache. Don't change anything manually.
//! # Updated: 2026-01-29 10:00:00
//!
//! Mage_Core_Model_App: app/code/core/Mage/Core/Model/App.php
//! Zend_Missing: false
//! ```
//!
//! The header is informational and never parsed back. The body is a YAML
//! mapping in identifier order; `false` marks a confirmed miss.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::cache::{serialize_entries, CacheMap};
use crate::error::{ClasspathError, ClasspathResult};
use crate::types::{ClasspathConfig, DEFAULT_FILE_MODE};

const HEADER_NOTICE: &str =
    "# This file is automatically generated by classpath-cache. Don't change anything manually.";

const TEMP_PREFIX: &str = "classpathcache";

/// Reads and writes the cache artifact.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
    scratch_dir: Option<PathBuf>,
    file_mode: u32,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            scratch_dir: None,
            file_mode: DEFAULT_FILE_MODE,
        }
    }

    pub fn from_config(config: &ClasspathConfig) -> Self {
        Self {
            path: config.cache_file_path(),
            scratch_dir: config.scratch_dir.clone(),
            file_mode: config.file_mode,
        }
    }

    /// Write temporary files to `dir` instead of the artifact's directory.
    ///
    /// The final rename is only atomic when `dir` is on the same filesystem.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }

    /// Artifact location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn artifact_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Load the persisted entries.
    ///
    /// A missing, unreadable or malformed artifact yields an empty map.
    pub fn load(&self) -> CacheMap {
        match self.try_load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unusable class path cache");
                CacheMap::new()
            }
        }
    }

    /// Load the persisted entries, reporting why an existing artifact could
    /// not be used. A missing artifact is not an error.
    pub fn try_load(&self) -> ClasspathResult<CacheMap> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no class path cache artifact");
            return Ok(CacheMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| ClasspathError::Io {
            message: format!("failed to read cache artifact: {}", e),
        })?;

        let entries = parse_artifact(&content)?;
        debug!(path = %self.path.display(), entries = entries.len(), "loaded class path cache");
        Ok(entries)
    }

    /// Persist `entries`, swallowing failures.
    ///
    /// Returns whether the artifact was replaced.
    pub fn save(&self, entries: &CacheMap) -> bool {
        match self.try_save(entries) {
            Ok(()) => {
                info!(path = %self.path.display(), entries = entries.len(), "saved class path cache");
                true
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to save class path cache");
                false
            }
        }
    }

    /// Persist `entries`: write a temp file in the scratch directory, rename
    /// it over the artifact, then try to apply the configured file mode.
    pub fn try_save(&self, entries: &CacheMap) -> ClasspathResult<()> {
        let content = render_artifact(entries, Utc::now())?;

        let artifact_dir = self.artifact_dir();
        fs::create_dir_all(&artifact_dir).map_err(|e| ClasspathError::Io {
            message: format!("failed to create cache directory: {}", e),
        })?;
        let scratch_dir = self.scratch_dir.clone().unwrap_or(artifact_dir);

        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".tmp")
            .tempfile_in(&scratch_dir)
            .map_err(|e| ClasspathError::Io {
                message: format!("failed to create temp file: {}", e),
            })?;

        temp.write_all(content.as_bytes())
            .and_then(|()| temp.flush())
            .map_err(|e| ClasspathError::Io {
                message: format!("failed to write temp file: {}", e),
            })?;

        temp.persist(&self.path).map_err(|e| ClasspathError::Io {
            message: format!("failed to rename temp file: {}", e.error),
        })?;

        self.apply_file_mode();
        Ok(())
    }

    #[cfg(unix)]
    fn apply_file_mode(&self) {
        use std::os::unix::fs::PermissionsExt;

        if let Err(e) = fs::set_permissions(&self.path, fs::Permissions::from_mode(self.file_mode)) {
            debug!(path = %self.path.display(), error = %e, "could not adjust cache file mode");
        }
    }

    #[cfg(not(unix))]
    fn apply_file_mode(&self) {}

    /// Delete the artifact. Running resolvers keep their in-memory entries.
    pub fn clear(&self) -> ClasspathResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| ClasspathError::Io {
                message: format!("failed to remove cache artifact: {}", e),
            })?;
            debug!(path = %self.path.display(), "cleared class path cache");
        }
        Ok(())
    }
}

/// Render the full artifact: header comment plus the serialized entries.
pub(crate) fn render_artifact(entries: &CacheMap, updated: DateTime<Utc>) -> ClasspathResult<String> {
    let body = serialize_entries(entries)?;
    Ok(format!(
        "{}\n# Updated: {}\n\n{}",
        HEADER_NOTICE,
        updated.format("%Y-%m-%d %H:%M:%S"),
        body
    ))
}

pub(crate) fn parse_artifact(content: &str) -> ClasspathResult<CacheMap> {
    let has_body = content
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with('#'));
    if !has_body {
        return Ok(CacheMap::new());
    }
    Ok(serde_yaml::from_str(content)?)
}
