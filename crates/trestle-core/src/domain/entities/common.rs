use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A path inside the project tree.
///
/// Invariant: never absolute and never climbs out of the project root with
/// `..`. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Create a new relative path.
    ///
    /// # Panics
    /// Panics if the path is absolute or escapes the root. Catalog entries use
    /// this with literals; use `try_new` for runtime input.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        match Self::try_new(path) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    /// Fallible constructor.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
        if path.is_absolute() || escapes {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            });
        }
        Ok(Self(path))
    }

    /// Resolve against a project root.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_accepts_nested() {
        let p = RelativePath::new("config/environments/staging.rb");
        assert_eq!(p.as_path(), Path::new("config/environments/staging.rb"));
    }

    #[test]
    fn try_new_rejects_absolute() {
        assert!(RelativePath::try_new("/etc/passwd").is_err());
    }

    #[test]
    fn try_new_rejects_parent_traversal() {
        assert!(RelativePath::try_new("../outside.rb").is_err());
        assert!(RelativePath::try_new("config/../../outside.rb").is_err());
    }

    #[test]
    #[should_panic]
    fn new_panics_on_absolute() {
        RelativePath::new("/tmp/x");
    }

    #[test]
    fn under_joins_root() {
        let p = RelativePath::new(".env");
        assert_eq!(p.under(Path::new("/work/app")), PathBuf::from("/work/app/.env"));
    }
}
