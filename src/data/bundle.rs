use crate::data::CacheError;
use std::path::{Path, PathBuf};

/// The application a file-backed cache is scoped to.
///
/// A bundle names the subdirectory of the user cache directory that its
/// caches write into. The cache root defaults to the platform cache directory
/// (`dirs::cache_dir()`) and can be overridden, which tests rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    identifier: Option<String>,
    cache_root: Option<PathBuf>,
}

impl Bundle {
    /// Creates a bundle with the given identifier, e.g. `com.example.app`
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            cache_root: None,
        }
    }

    /// A bundle with no identifier. Caches built from it are disabled.
    pub fn unidentified() -> Self {
        Self::default()
    }

    /// The bundle of the running program, identified by its executable name.
    pub fn main() -> Self {
        let identifier = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.file_stem().map(|s| s.to_string_lossy().into_owned()));

        Self {
            identifier,
            cache_root: None,
        }
    }

    /// Overrides the directory bundle caches are created under
    pub fn with_cache_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cache_root = Some(root.into());
        self
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Resolves and creates `{cache root}/{identifier}`.
    ///
    /// Creation is idempotent, so any number of caches may share a bundle.
    pub fn cache_directory(&self) -> Result<PathBuf, CacheError> {
        let root = match &self.cache_root {
            Some(root) => root.clone(),
            None => dirs::cache_dir().ok_or_else(|| {
                CacheError::LocationUnavailable("user cache directory cannot be resolved".to_string())
            })?,
        };

        let identifier = self
            .identifier
            .as_deref()
            .filter(|id| is_valid_identifier(id))
            .ok_or_else(|| {
                CacheError::LocationUnavailable(format!(
                    "bundle identifier {:?} is unavailable",
                    self.identifier
                ))
            })?;

        let directory = root.join(identifier);
        std::fs::create_dir_all(&directory).map_err(|e| {
            CacheError::LocationUnavailable(format!(
                "failed to create {}: {}",
                directory.display(),
                e
            ))
        })?;

        Ok(directory)
    }
}

/// An identifier must name exactly one directory below the cache root.
fn is_valid_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier != "."
        && identifier != ".."
        && !identifier.contains(['/', '\\'])
        && Path::new(identifier).components().count() == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cache_directory_created() {
        let root = TempDir::new().unwrap();
        let bundle = Bundle::new("com.example.app").with_cache_root(root.path());

        let directory = bundle.cache_directory().unwrap();
        assert_eq!(directory, root.path().join("com.example.app"));
        assert!(directory.is_dir());

        // Second resolution finds the existing directory
        assert_eq!(bundle.cache_directory().unwrap(), directory);
    }

    #[test]
    fn test_unidentified_bundle_unavailable() {
        let root = TempDir::new().unwrap();
        let bundle = Bundle::unidentified().with_cache_root(root.path());

        assert!(matches!(
            bundle.cache_directory(),
            Err(CacheError::LocationUnavailable(_))
        ));
    }

    #[test]
    fn test_invalid_identifiers_rejected() {
        for id in ["", ".", "..", "a/b", "a\\b", "/abs"] {
            assert!(!is_valid_identifier(id), "{:?} should be rejected", id);
        }
        assert!(is_valid_identifier("com.example.app"));
    }

    #[test]
    fn test_uncreatable_directory_unavailable() {
        let root = TempDir::new().unwrap();
        let blocker = root.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let bundle = Bundle::new("com.example.app").with_cache_root(&blocker);
        assert!(bundle.cache_directory().is_err());
    }

    #[test]
    fn test_main_bundle_has_identifier() {
        assert!(Bundle::main().identifier().is_some());
    }
}
