use relative_path::{RelativePath, RelativePathBuf};
use std::path::{Path, PathBuf};

/* # Why use RelativePathBuf for FilePath?

FilePath wraps RelativePathBuf to enforce that all paths are relative to the
PAL's base directory, not absolute system paths. The compiler prevents
accidentally passing absolute paths, and all PAL operations share the same
relative-to-base semantics.
*/

/// Type-safe wrapper for file paths relative to the PAL base directory.
///
/// # Examples
///
/// ```
/// use stockroom_base::FilePath;
///
/// let store = FilePath::from("items.json");
/// let image = FilePath::from("images").join("cat.jpg");
/// assert_eq!(image.to_string(), "images/cat.jpg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePath(RelativePathBuf);

impl FilePath {
    /// Returns the underlying RelativePath as a reference.
    pub fn as_relative(&self) -> &RelativePath {
        &self.0
    }

    /// Converts to a regular Path for use with std::fs operations.
    /// This returns the relative path portion without a base directory.
    pub fn as_path(&self) -> &Path {
        Path::new(self.0.as_str())
    }

    /// Consumes the FilePath and returns a PathBuf.
    pub fn into_path_buf(self) -> PathBuf {
        PathBuf::from(self.0.as_str())
    }

    /// Joins a path segment onto this path.
    pub fn join(&self, segment: impl AsRef<str>) -> FilePath {
        Self(self.0.join(segment.as_ref()))
    }

    /// Returns the final component of the path, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name()
    }

    /// Returns the file extension, if any, without the leading dot.
    pub fn extension(&self) -> Option<&str> {
        self.0.extension()
    }
}

impl From<&str> for FilePath {
    fn from(s: &str) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<String> for FilePath {
    fn from(s: String) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<RelativePathBuf> for FilePath {
    fn from(p: RelativePathBuf) -> Self {
        Self(p)
    }
}

impl From<&RelativePath> for FilePath {
    fn from(p: &RelativePath) -> Self {
        Self(p.to_relative_path_buf())
    }
}

impl std::fmt::Display for FilePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<RelativePath> for FilePath {
    fn as_ref(&self) -> &RelativePath {
        &self.0
    }
}
