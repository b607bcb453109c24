//! Resource classification
//!
//! Maps a request path onto the source directory and decides, from metadata
//! alone, which kind of LDP resource it names.

use super::error::ResourceError;
use super::registry::FormatRegistry;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// What a request path points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    Missing,
    Directory,
    /// File whose extension is a registered RDF format (carries the format id)
    RdfFile(String),
    OpaqueFile,
}

/// A classified filesystem entry
#[derive(Debug, Clone)]
pub struct Resource {
    pub path: PathBuf,
    pub kind: ResourceKind,
    /// Size in bytes, zero when missing
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl Resource {
    fn missing(path: PathBuf) -> Self {
        Self {
            path,
            kind: ResourceKind::Missing,
            len: 0,
            modified: None,
        }
    }
}

/// Join a decoded request path onto `root` without leaving it.
///
/// `.` segments are dropped and `..` consumes the previous segment; a `..`
/// with nothing left to consume is a traversal attempt and is rejected
/// rather than clamped to the root.
pub fn resolve_path(root: &Path, request_path: &str) -> Result<PathBuf, ResourceError> {
    if request_path.contains('\0') {
        return Err(ResourceError::NotFound);
    }

    let mut relative = PathBuf::new();
    for component in Path::new(request_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    return Err(ResourceError::Traversal {
                        path: root.join(request_path.trim_start_matches('/')),
                    });
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ResourceError::Traversal {
                    path: PathBuf::from(request_path),
                });
            }
        }
    }

    Ok(root.join(relative))
}

/// Final extension of a file name: the text after the last `.`
pub fn file_extension(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.rsplit_once('.').map(|(_, ext)| ext).filter(|ext| !ext.is_empty())
}

/// Classify `request_path` relative to `root`.
///
/// Symlinks are followed, but an entry whose real location is outside the
/// root is reported as a traversal attempt.
pub async fn classify(
    root: &Path,
    request_path: &str,
    registry: &FormatRegistry,
) -> Result<Resource, ResourceError> {
    let path = resolve_path(root, request_path)?;

    let metadata = match fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) if is_absent(&e) => return Ok(Resource::missing(path)),
        Err(e) => return Err(e.into()),
    };

    let root_canonical = fs::canonicalize(root).await?;
    let canonical = fs::canonicalize(&path).await?;
    if !canonical.starts_with(&root_canonical) {
        return Err(ResourceError::Traversal { path: canonical });
    }

    let kind = if metadata.is_dir() {
        ResourceKind::Directory
    } else if metadata.is_file() {
        match file_extension(&path).and_then(|ext| registry.lookup_by_extension(ext)) {
            Some(format) => ResourceKind::RdfFile(format.format_id.clone()),
            None => ResourceKind::OpaqueFile,
        }
    } else {
        // sockets, fifos and devices are not served
        return Ok(Resource::missing(path));
    };

    Ok(Resource {
        path,
        kind,
        len: metadata.len(),
        modified: metadata.modified().ok(),
    })
}

fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
