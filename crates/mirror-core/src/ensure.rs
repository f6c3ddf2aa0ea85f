//! Remote directory existence checks

use mirror_fs::NormalizedPath;
use mirror_remote::{RemoteEntry, RemoteFs};

/// Make sure `directory` is usable as a directory on the remote.
///
/// Returns `true` when it already is a directory (nothing is touched) or
/// when it was missing and `create` is set, in which case it is created
/// together with every missing ancestor. Returns `false` when it is
/// missing and `create` is unset, or when it (or an ancestor) exists as
/// something other than a directory. Callers must treat `false` as a
/// failure of whatever wanted to write there.
pub fn ensure<R: RemoteFs + ?Sized>(
    remote: &mut R,
    directory: &NormalizedPath,
    create: bool,
) -> mirror_remote::Result<bool> {
    match remote.stat(directory)? {
        RemoteEntry::Directory => Ok(true),
        RemoteEntry::Other => Ok(false),
        RemoteEntry::Missing if !create => Ok(false),
        RemoteEntry::Missing => match remote.create_dir_all(directory) {
            Ok(()) => Ok(true),
            Err(mirror_remote::Error::NotADirectory { .. }) => Ok(false),
            Err(e) => Err(e),
        },
    }
}
