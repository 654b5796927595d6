//! Cache-backed class path resolution.
//!
//! Maps class identifiers such as `Mage_Core_Model_App` to the source file
//! that defines them, searching an ordered include path, and remembers every
//! answer (misses included) in a cache artifact so later processes skip the
//! directory scans:
//!
//! - Name mapping (`Foo_Bar_Baz` → `Foo/Bar/Baz.php`)
//! - First-match search across include path roots
//! - In-memory memoization with a dirty counter
//! - Atomic, ordered YAML persistence written only when something changed
//!
//! # Quick Start
//!
//! ```no_run
//! use classpath_cache::{ClassResolver, ClasspathConfig, ResolvedPath};
//!
//! # fn example() -> classpath_cache::ClasspathResult<()> {
//! let config = ClasspathConfig::default()
//!     .with_base_dir("/srv/shop")
//!     .with_include_path(["/srv/shop/app/code/local", "/srv/shop/lib"]);
//! let resolver = ClassResolver::new(config)?;
//!
//! if let ResolvedPath::Found(path) = resolver.resolve("Varien_Object") {
//!     println!("Varien_Object lives in {}", path);
//! }
//!
//! // Persist whatever this run learned.
//! resolver.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `CLASSPATH_BASE_DIR` | Base directory (default: current directory) |
//! | `CLASSPATH_INCLUDE_PATH` | Search roots, platform path-list separated |
//! | `CLASSPATH_CACHE_FILE` | Artifact location (default: `<base>/var/classpathcache.yaml`) |
//! | `CLASSPATH_SCRATCH_DIR` | Temp file directory for saves (default: artifact directory) |
//! | `CLASSPATH_EXTENSION` | Source file extension (default: `php`) |
//! | `CLASSPATH_NO_CACHE` | Disable the persisted cache |

pub mod cache;
pub mod error;
pub mod loader;
pub mod naming;
pub mod resolver;
pub mod search;
pub mod store;
pub mod types;

// Re-export main types
pub use cache::{CacheMap, ResolutionCache};
pub use error::{ClasspathError, ClasspathResult};
pub use loader::HostLoader;
pub use naming::NameMapper;
pub use resolver::{ClassResolver, FlushOutcome, DEFAULT_SCOPE};
pub use search::{FileProbe, OsProbe, PathSearch};
pub use store::CacheStore;
pub use types::{
    ClasspathConfig, ResolvedPath, DEFAULT_CACHE_SUBPATH, DEFAULT_DELIMITER, DEFAULT_EXTENSION,
    DEFAULT_FILE_MODE,
};
