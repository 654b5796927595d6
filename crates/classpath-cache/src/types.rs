//! Core types: resolution outcomes and resolver configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClasspathError, ClasspathResult};

/// Default identifier segment delimiter.
pub const DEFAULT_DELIMITER: char = '_';

/// Default source file extension appended by the name mapper.
pub const DEFAULT_EXTENSION: &str = "php";

/// Cache artifact location relative to the base directory.
pub const DEFAULT_CACHE_SUBPATH: &str = "var/classpathcache.yaml";

/// Permissions applied to the cache artifact after it is written.
pub const DEFAULT_FILE_MODE: u32 = 0o664;

/// Outcome of resolving an identifier.
///
/// Absence from the cache means "not attempted yet"; `Missing` is a confirmed
/// negative that is cached and persisted like any other result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersistedPath", into = "PersistedPath")]
pub enum ResolvedPath {
    /// Path of the defining file, relative to the base directory when the
    /// search root lies under it.
    Found(String),

    /// No search root contains the mapped file.
    Missing,
}

impl ResolvedPath {
    /// Whether a file was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The resolved path, if any.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Found(path) => Some(Path::new(path)),
            Self::Missing => None,
        }
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(path) => write!(f, "{}", path),
            Self::Missing => write!(f, "<missing>"),
        }
    }
}

/// On-disk shape of a cache value: a path string or the literal `false`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum PersistedPath {
    Path(String),
    Flag(bool),
}

impl From<ResolvedPath> for PersistedPath {
    fn from(value: ResolvedPath) -> Self {
        match value {
            ResolvedPath::Found(path) => Self::Path(path),
            ResolvedPath::Missing => Self::Flag(false),
        }
    }
}

impl TryFrom<PersistedPath> for ResolvedPath {
    type Error = String;

    fn try_from(value: PersistedPath) -> Result<Self, Self::Error> {
        match value {
            PersistedPath::Path(path) => Ok(Self::Found(path)),
            PersistedPath::Flag(false) => Ok(Self::Missing),
            PersistedPath::Flag(true) => {
                Err("`true` is not a valid cache value, expected a path or `false`".to_string())
            }
        }
    }
}

/// Resolver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClasspathConfig {
    /// Deployment root. Resolved paths under it are cached relative to it.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Ordered search roots; the first root containing the file wins.
    #[serde(default)]
    pub include_path: Vec<PathBuf>,

    /// Source file extension, without the leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Identifier segment delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Cache artifact override. Defaults to `<base_dir>/var/classpathcache.yaml`.
    #[serde(default)]
    pub cache_file: Option<PathBuf>,

    /// Directory for the temporary file used by saves. Defaults to the
    /// artifact's own directory.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    /// Permissions set on the artifact after a save (unix only).
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,

    /// Skip loading and saving the artifact.
    #[serde(default)]
    pub no_cache: bool,
}

fn default_base_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

fn default_file_mode() -> u32 {
    DEFAULT_FILE_MODE
}

impl Default for ClasspathConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            include_path: Vec::new(),
            extension: default_extension(),
            delimiter: default_delimiter(),
            cache_file: None,
            scratch_dir: None,
            file_mode: default_file_mode(),
            no_cache: false,
        }
    }
}

impl ClasspathConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `CLASSPATH_BASE_DIR` | Base directory |
    /// | `CLASSPATH_INCLUDE_PATH` | Search roots, joined with the platform path-list separator |
    /// | `CLASSPATH_CACHE_FILE` | Cache artifact location |
    /// | `CLASSPATH_SCRATCH_DIR` | Directory for temporary files during saves |
    /// | `CLASSPATH_EXTENSION` | Source file extension |
    /// | `CLASSPATH_NO_CACHE` | Disable the persisted cache (`1` or `true`) |
    pub fn from_env() -> Self {
        Self {
            base_dir: std::env::var_os("CLASSPATH_BASE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_base_dir),
            include_path: std::env::var_os("CLASSPATH_INCLUDE_PATH")
                .map(|v| std::env::split_paths(&v).collect())
                .unwrap_or_default(),
            extension: std::env::var("CLASSPATH_EXTENSION").unwrap_or_else(|_| default_extension()),
            delimiter: default_delimiter(),
            cache_file: std::env::var_os("CLASSPATH_CACHE_FILE").map(PathBuf::from),
            scratch_dir: std::env::var_os("CLASSPATH_SCRATCH_DIR").map(PathBuf::from),
            file_mode: default_file_mode(),
            no_cache: std::env::var("CLASSPATH_NO_CACHE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Set the base directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Replace the search roots.
    pub fn with_include_path<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.include_path = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Set the source file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the identifier delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Override the cache artifact location.
    pub fn with_cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_file = Some(path.into());
        self
    }

    /// Set the scratch directory used while saving.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Skip the persisted cache.
    pub fn no_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }

    /// Effective cache artifact location.
    pub fn cache_file_path(&self) -> PathBuf {
        self.cache_file
            .clone()
            .unwrap_or_else(|| self.base_dir.join(DEFAULT_CACHE_SUBPATH))
    }

    /// Reject settings the name mapper cannot work with.
    pub fn validate(&self) -> ClasspathResult<()> {
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(ClasspathError::Config {
                message: format!(
                    "extension must be non-empty and given without a leading dot: {:?}",
                    self.extension
                ),
            });
        }
        if std::path::is_separator(self.delimiter) {
            return Err(ClasspathError::Config {
                message: format!("delimiter {:?} is a path separator", self.delimiter),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_resolved_path_yaml_values() {
        let found = serde_yaml::to_string(&ResolvedPath::Found("My/Class.php".into())).unwrap();
        assert_eq!(found.trim(), "My/Class.php");

        let missing = serde_yaml::to_string(&ResolvedPath::Missing).unwrap();
        assert_eq!(missing.trim(), "false");
    }

    #[test]
    fn test_path_named_false_stays_a_path() {
        let value = ResolvedPath::Found("false".into());
        let yaml = serde_yaml::to_string(&value).unwrap();
        let back: ResolvedPath = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_true_is_rejected() {
        let result: Result<ResolvedPath, _> = serde_yaml::from_str("true");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_cache_file_under_base_dir() {
        let config = ClasspathConfig::default().with_base_dir("/srv/app");
        assert_eq!(
            config.cache_file_path(),
            PathBuf::from("/srv/app/var/classpathcache.yaml")
        );

        let config = config.with_cache_file("/tmp/other.yaml");
        assert_eq!(config.cache_file_path(), PathBuf::from("/tmp/other.yaml"));
    }

    #[test]
    fn test_validate() {
        assert!(ClasspathConfig::default().validate().is_ok());

        let err = ClasspathConfig::default()
            .with_extension(".php")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ClasspathError::Config { .. }));

        let err = ClasspathConfig::default()
            .with_delimiter('/')
            .validate()
            .unwrap_err();
        assert!(matches!(err, ClasspathError::Config { .. }));
    }

    #[test]
    fn test_config_from_yaml_defaults() {
        let config: ClasspathConfig =
            serde_yaml::from_str("base_dir: /srv/app\ninclude_path: [/srv/app/lib]\n").unwrap();
        assert_eq!(config.extension, "php");
        assert_eq!(config.delimiter, '_');
        assert_eq!(config.file_mode, 0o664);
        assert!(!config.no_cache);
        assert_eq!(config.include_path, vec![PathBuf::from("/srv/app/lib")]);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("CLASSPATH_BASE_DIR", "/srv/app");
        std::env::set_var(
            "CLASSPATH_INCLUDE_PATH",
            std::env::join_paths(["/srv/app/local", "/srv/app/core"]).unwrap(),
        );
        std::env::set_var("CLASSPATH_EXTENSION", "inc");
        std::env::set_var("CLASSPATH_NO_CACHE", "true");

        let config = ClasspathConfig::from_env();

        std::env::remove_var("CLASSPATH_BASE_DIR");
        std::env::remove_var("CLASSPATH_INCLUDE_PATH");
        std::env::remove_var("CLASSPATH_EXTENSION");
        std::env::remove_var("CLASSPATH_NO_CACHE");

        assert_eq!(config.base_dir, PathBuf::from("/srv/app"));
        assert_eq!(
            config.include_path,
            vec![PathBuf::from("/srv/app/local"), PathBuf::from("/srv/app/core")]
        );
        assert_eq!(config.extension, "inc");
        assert!(config.no_cache);
        assert_eq!(config.cache_file, None);
    }

    #[test]
    #[serial]
    fn test_from_env_unset() {
        std::env::remove_var("CLASSPATH_INCLUDE_PATH");
        std::env::remove_var("CLASSPATH_NO_CACHE");
        std::env::remove_var("CLASSPATH_EXTENSION");

        let config = ClasspathConfig::from_env();
        assert!(config.include_path.is_empty());
        assert!(!config.no_cache);
        assert_eq!(config.extension, DEFAULT_EXTENSION);
    }
}
