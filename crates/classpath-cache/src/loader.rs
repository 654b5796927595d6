//! Host loader seam.

use std::path::Path;

/// Loads the source file a resolver found for an identifier.
///
/// What loading means is up to the host; the resolver only hands over the
/// absolute path.
pub trait HostLoader {
    /// Load `path`, which is expected to define `identifier`.
    /// Returns whether the identifier is now available.
    fn load(&self, identifier: &str, path: &Path) -> bool;
}

impl<F> HostLoader for F
where
    F: Fn(&str, &Path) -> bool,
{
    fn load(&self, identifier: &str, path: &Path) -> bool {
        self(identifier, path)
    }
}
