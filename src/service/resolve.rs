//! Maps request paths onto the served directory.

use std::{
    borrow::Cow,
    ffi::OsStr,
    fs::Metadata,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::fs::File;
use tracing::{debug, info};

use super::{
    error::ResolveError,
    listing::{self, DirectoryListing, Entry},
};

/// A regular file (or anything that is not a directory) ready to be streamed.
#[derive(Debug)]
pub struct OpenFile {
    pub path: PathBuf,
    pub file: File,
    pub metadata: Metadata,
}

/// Outcome of a successful resolution.
#[derive(Debug)]
pub enum Resolution {
    File(OpenFile),
    Directory(DirectoryListing),
}

/// Resolves `request_path` against `root`.
///
/// The path is percent-decoded and normalized in URL space first, so the
/// filesystem path that gets opened is always inside `root` (symlinks found
/// inside the tree are followed like the OS does). Decoded bytes are used as
/// they are, file names do not have to be UTF-8. Directories are read
/// completely and turned into a [`DirectoryListing`].
pub async fn resolve(request_path: &str, root: &Path) -> Result<Resolution, ResolveError> {
    let url_path = normalize(request_path)?;

    let relative = &url_path[1..];
    let path = if relative.is_empty() {
        root.to_path_buf()
    } else {
        let relative = os_str(relative)
            .ok_or_else(|| ResolveError::InvalidPath(String::from(request_path)))?;
        root.join(relative)
    };

    info!("{}", path.display());

    let file = File::open(&path).await.map_err(|err| match err.kind() {
        ErrorKind::NotFound => {
            ResolveError::NotFound(String::from_utf8_lossy(&url_path).into_owned())
        }
        _ => ResolveError::Io(err),
    })?;

    let metadata = file.metadata().await?;

    if !metadata.is_dir() {
        return Ok(Resolution::File(OpenFile {
            path,
            file,
            metadata,
        }));
    }

    drop(file);

    list_directory(&url_path, &path)
        .await
        .map(Resolution::Directory)
}

/// Percent-decodes the request path and folds `.` and `..` segments.
///
/// Returns the decoded path as `/` followed by its segments, without trailing
/// slash. A `..` that would climb above `/` is rejected, and so is a NUL byte.
pub fn normalize(request_path: &str) -> Result<Vec<u8>, ResolveError> {
    let decoded = urlencoding::decode_binary(request_path.as_bytes());

    if decoded.contains(&0) {
        return Err(ResolveError::InvalidPath(String::from(request_path)));
    }

    let mut segments = Vec::new();

    for segment in decoded.split(|byte| *byte == b'/') {
        match segment {
            b"" | b"." => {}
            b".." => {
                if segments.pop().is_none() {
                    return Err(ResolveError::PathTraversal(String::from(request_path)));
                }
            }
            segment => segments.push(segment),
        }
    }

    let mut normalized = vec![b'/'];
    normalized.extend_from_slice(&segments.join(&b'/'));

    Ok(normalized)
}

#[cfg(unix)]
fn os_str(bytes: &[u8]) -> Option<&OsStr> {
    use std::os::unix::ffi::OsStrExt;

    Some(OsStr::from_bytes(bytes))
}

// Elsewhere file names are Unicode, undecodable bytes can't name anything.
#[cfg(not(unix))]
fn os_str(bytes: &[u8]) -> Option<&OsStr> {
    std::str::from_utf8(bytes).ok().map(OsStr::new)
}

#[cfg(unix)]
fn os_bytes(name: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;

    Cow::Borrowed(name.as_bytes())
}

#[cfg(not(unix))]
fn os_bytes(name: &OsStr) -> Cow<'_, [u8]> {
    match name.to_string_lossy() {
        Cow::Borrowed(name) => Cow::Borrowed(name.as_bytes()),
        Cow::Owned(name) => Cow::Owned(name.into_bytes()),
    }
}

async fn list_directory(url_path: &[u8], path: &Path) -> Result<DirectoryListing, ResolveError> {
    let mut reader = tokio::fs::read_dir(path).await?;
    let base = listing::encode_path(url_path);

    let mut directories = Vec::new();
    let mut files = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy().into_owned();
        let location = listing::join_location(&base, &os_bytes(&file_name));

        // Follow symlinks, dangling ones are listed as what they are.
        let metadata = match tokio::fs::metadata(entry.path()).await {
            Ok(metadata) => metadata,
            Err(_) => entry.metadata().await?,
        };

        if metadata.is_dir() {
            directories.push(Entry::Directory { name, location });
        } else {
            files.push(Entry::File {
                name,
                location,
                size: metadata.len(),
            });
        }
    }

    debug!(
        "Listed {}: {} directories, {} files",
        path.display(),
        directories.len(),
        files.len()
    );

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("/"));

    Ok(DirectoryListing {
        name,
        breadcrumbs: listing::breadcrumbs(url_path),
        directories,
        files,
        is_root: url_path == b"/",
    })
}
