use std::io;
use std::path::Path;

use thiserror::Error;
use tokio::fs;

use crate::http::response::StatusCode;

/// A request path resolved against the served root.
#[derive(Debug)]
pub enum Resource {
    /// Regular file opened for reading.
    File {
        file: fs::File,
        size: u64,
        name: String,
    },
    /// Directory with its visible entries in filesystem enumeration order.
    Directory { entries: Vec<String> },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("resource not found")]
    NotFound,
    #[error("resource access forbidden")]
    Forbidden,
    #[error("resource not readable: {0}")]
    Other(io::Error),
}

impl ResolveError {
    fn from_io(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => ResolveError::NotFound,
            io::ErrorKind::PermissionDenied => ResolveError::Forbidden,
            _ => ResolveError::Other(e),
        }
    }

    /// The status code this resolution failure answers with.
    pub fn status(&self) -> StatusCode {
        match self {
            ResolveError::NotFound => StatusCode::NotFound,
            ResolveError::Forbidden => StatusCode::Forbidden,
            ResolveError::Other(_) => StatusCode::InternalServerError,
        }
    }
}

/// Resolve a decoded request path under `root` (itself already canonical).
///
/// The path is treated as relative to the root. The canonicalized result
/// must stay under the root: `..` segments or symlinks escaping it resolve
/// to `Forbidden`.
pub async fn resolve(root: &Path, query_path: &str) -> Result<Resource, ResolveError> {
    let joined = root.join(query_path.trim_start_matches('/'));

    let path = fs::canonicalize(&joined).await.map_err(ResolveError::from_io)?;
    if !path.starts_with(root) {
        return Err(ResolveError::Forbidden);
    }

    let meta = fs::metadata(&path).await.map_err(ResolveError::from_io)?;

    if meta.is_dir() {
        return Ok(Resource::Directory {
            entries: visible_entries(&path).await?,
        });
    }

    let file = fs::File::open(&path).await.map_err(ResolveError::from_io)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Resource::File {
        file,
        size: meta.len(),
        name,
    })
}

/// Immediate entries of `dir`, excluding names starting with `.`, in the
/// order the filesystem enumerates them.
pub async fn visible_entries(dir: &Path) -> Result<Vec<String>, ResolveError> {
    let mut rd = fs::read_dir(dir).await.map_err(ResolveError::from_io)?;
    let mut names = Vec::new();

    while let Some(entry) = rd.next_entry().await.map_err(ResolveError::from_io)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        names.push(name);
    }

    Ok(names)
}
