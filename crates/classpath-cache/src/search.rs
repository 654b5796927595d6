//! First-match search over the configured include path.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};
use std::sync::Arc;

/// Existence check used by [`PathSearch`].
pub trait FileProbe: Send + Sync {
    /// Whether a filesystem entity exists at `path`.
    fn exists(&self, path: &Path) -> bool;
}

/// Probe backed by `std::fs` metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProbe;

impl FileProbe for OsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Ordered search roots plus the probe used to test candidates.
#[derive(Clone)]
pub struct PathSearch {
    roots: Vec<PathBuf>,
    probe: Arc<dyn FileProbe>,
}

impl fmt::Debug for PathSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathSearch")
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

impl PathSearch {
    /// Search the given roots on the real filesystem.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self::with_probe(roots, Arc::new(OsProbe))
    }

    pub fn with_probe(roots: Vec<PathBuf>, probe: Arc<dyn FileProbe>) -> Self {
        Self { roots, probe }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Return the first `root/relative` that exists, in root order.
    ///
    /// The candidate is a plain concatenation, so a relative path with a
    /// leading separator still stays under its root.
    pub fn find(&self, relative: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .map(|root| candidate(root, relative))
            .find(|path| self.probe.exists(path))
    }
}

fn candidate(root: &Path, relative: &str) -> PathBuf {
    let mut joined = OsString::from(root.as_os_str());
    joined.push(MAIN_SEPARATOR_STR);
    joined.push(relative);
    PathBuf::from(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingProbe {
        probed: Mutex<Vec<PathBuf>>,
    }

    impl FileProbe for RecordingProbe {
        fn exists(&self, path: &Path) -> bool {
            self.probed.lock().unwrap().push(path.to_path_buf());
            false
        }
    }

    fn touch(dir: &Path, relative: &str) {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "<?php\n").unwrap();
    }

    #[test]
    fn test_first_root_wins() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        touch(a.path(), "My/Class.php");
        touch(b.path(), "My/Class.php");

        let search = PathSearch::new(vec![a.path().to_path_buf(), b.path().to_path_buf()]);
        let found = search.find("My/Class.php").unwrap();
        assert_eq!(found, a.path().join("My/Class.php"));
    }

    #[test]
    fn test_falls_through_to_later_root() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        touch(b.path(), "My/Class.php");

        let search = PathSearch::new(vec![a.path().to_path_buf(), b.path().to_path_buf()]);
        assert_eq!(
            search.find("My/Class.php"),
            Some(b.path().join("My/Class.php"))
        );
    }

    #[test]
    fn test_not_found_probes_every_root() {
        let probe = Arc::new(RecordingProbe::default());
        let search = PathSearch::with_probe(
            vec![PathBuf::from("/one"), PathBuf::from("/two"), PathBuf::from("/three")],
            probe.clone(),
        );

        assert_eq!(search.find("Foo.php"), None);
        let probed = probe.probed.lock().unwrap();
        assert_eq!(
            *probed,
            vec![
                PathBuf::from("/one/Foo.php"),
                PathBuf::from("/two/Foo.php"),
                PathBuf::from("/three/Foo.php"),
            ]
        );
    }

    #[test]
    fn test_leading_separator_is_concatenated() {
        let probe = Arc::new(RecordingProbe::default());
        let search = PathSearch::with_probe(vec![PathBuf::from("/lib")], probe.clone());

        search.find("/Foo.php");
        assert_eq!(
            *probe.probed.lock().unwrap(),
            vec![PathBuf::from("/lib//Foo.php")]
        );
    }

    #[test]
    fn test_no_roots() {
        let search = PathSearch::new(Vec::new());
        assert_eq!(search.find("Foo.php"), None);
    }
}
