//! Normalized path handling for local and remote paths

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Both sides of a mirror are addressed with this type: local paths are
/// converted to platform-native form only at I/O boundaries, and remote
/// paths are always forward-slash separated on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a relative segment.
    ///
    /// Leading `./` and `/` on the segment are dropped so a repository
    /// relative path always lands underneath `self`.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let mut segment = segment_normalized.as_str();
        while let Some(rest) = segment.strip_prefix("./") {
            segment = rest;
        }
        let segment = segment.trim_start_matches('/');

        let joined = if self.inner.is_empty() {
            segment.to_string()
        } else if segment.is_empty() {
            self.inner.clone()
        } else if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner: joined }
    }

    /// Whether the path is rooted (`/...`).
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/')
    }

    /// Non-empty path segments, in order.
    ///
    /// Empty segments produced by repeated or trailing slashes are skipped.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|s| !s.is_empty())
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) if trimmed.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Every ancestor from the outermost down to `self`.
    ///
    /// `/srv/www/site` yields `/srv`, `/srv/www`, `/srv/www/site`.
    pub fn ancestors_inclusive(&self) -> Vec<Self> {
        let mut current = if self.is_absolute() {
            Self::new("/")
        } else {
            Self::new("")
        };
        let mut chain = Vec::new();
        for segment in self.segments() {
            current = current.join(segment);
            chain.push(current.clone());
        }
        chain
    }

    /// Check if this is a local file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
