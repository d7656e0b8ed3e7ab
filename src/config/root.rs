use std::path::{Component, Path, PathBuf};

use crate::Error;

/// Turns the user supplied root into an absolute, normalized directory path.
///
/// Relative paths are resolved against the current working directory and
/// `.`/`..` components are folded lexically. The result must exist and be a
/// directory. Symlinks are only followed as far as `stat` follows them.
pub fn resolve_root(raw: impl AsRef<Path>) -> Result<PathBuf, Error> {
    let raw = raw.as_ref();

    let absolute = std::path::absolute(raw).map_err(|source| Error::PathUnreadable {
        path: raw.to_path_buf(),
        source,
    })?;

    let path = normalize(&absolute);

    let metadata = std::fs::metadata(&path).map_err(|source| Error::PathUnreadable {
        path: path.clone(),
        source,
    })?;

    if !metadata.is_dir() {
        return Err(Error::NotADirectory(path));
    }

    Ok(path)
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            // Popping the root is a no-op, "/.." stays "/".
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    normalized
}
