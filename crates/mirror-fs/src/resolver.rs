//! Mapping of repository-relative paths onto both sides of the mirror

use crate::{Error, NormalizedPath, Result};

/// Resolves repository-relative paths to absolute local and remote paths.
///
/// Resolved paths are never cached; every change record recomputes them.
#[derive(Debug, Clone)]
pub struct PathResolver {
    local_root: NormalizedPath,
}

impl PathResolver {
    /// Create a resolver rooted at an explicit local directory.
    pub fn new(local_root: impl Into<NormalizedPath>) -> Self {
        Self {
            local_root: local_root.into(),
        }
    }

    /// Create a resolver rooted at the process working directory.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| Error::io(".", e))?;
        let canonical = dunce::canonicalize(&cwd).map_err(|e| Error::io(&cwd, e))?;
        Ok(Self::new(canonical))
    }

    /// The local directory relative paths are resolved against.
    pub fn local_root(&self) -> &NormalizedPath {
        &self.local_root
    }

    /// `local_root / relative_path`
    pub fn to_local_absolute(&self, relative_path: &str) -> NormalizedPath {
        self.local_root.join(relative_path)
    }

    /// `remote_working_dir / relative_path`
    ///
    /// The remote working directory is whatever the connection reports as
    /// its current directory at connect time.
    pub fn to_remote_absolute(
        &self,
        remote_working_dir: &NormalizedPath,
        relative_path: &str,
    ) -> NormalizedPath {
        remote_working_dir.join(relative_path)
    }
}

/// All segments of `path` except the last.
///
/// A rooted single-segment path (`/a.txt`) yields `/`, an unrooted one
/// (`a.txt`) yields `.`. A path without any segment is rejected with
/// [`Error::MalformedPath`] instead of collapsing to an empty path.
pub fn directory_of(path: &NormalizedPath) -> Result<NormalizedPath> {
    let segments: Vec<&str> = path.segments().collect();
    let Some((_file, dirs)) = segments.split_last() else {
        return Err(Error::MalformedPath {
            path: path.as_str().to_string(),
        });
    };

    let joined = dirs.join("/");
    let directory = match (path.is_absolute(), joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    };
    Ok(NormalizedPath::new(directory))
}
