//! Error taxonomy for resource resolution and representation building.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while resolving or rendering an LDP resource
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Requested path does not exist under the source directory
    #[error("resource not found")]
    NotFound,

    /// Request path resolves outside the source directory
    #[error("path escapes the source directory: {}", path.display())]
    Traversal { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source file is not valid in its declared RDF format
    #[error("failed to parse {format} source: {message}")]
    Parse { format: String, message: String },

    /// Graph could not be written in the requested format
    #[error("failed to serialize graph as {format}: {message}")]
    Serialize { format: String, message: String },

    /// Format identifier has no RDF syntax behind it
    #[error("unsupported RDF format: {0}")]
    UnknownFormat(String),

    #[error("invalid IRI '{0}'")]
    InvalidIri(String),

    /// Value cannot be carried in an HTTP header
    #[error("invalid header value '{0}'")]
    InvalidHeader(String),

    /// Blocking task running a parse or serialize was cancelled or panicked
    #[error("worker task failed: {0}")]
    Task(String),
}

impl ResourceError {
    /// HTTP status this error is reported with
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotFound | Self::Traversal { .. } => 404,
            _ => 500,
        }
    }

    /// Whether the error is the client's doing rather than a server fault
    pub const fn is_not_found(&self) -> bool {
        self.status() == 404
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ResourceError::NotFound.status(), 404);
        let traversal = ResourceError::Traversal {
            path: PathBuf::from("/etc/passwd"),
        };
        assert_eq!(traversal.status(), 404);
        assert!(traversal.is_not_found());

        let parse = ResourceError::Parse {
            format: "turtle".to_string(),
            message: "unexpected end of file".to_string(),
        };
        assert_eq!(parse.status(), 500);
        assert!(!parse.is_not_found());
        assert_eq!(
            ResourceError::UnknownFormat("yaml".to_string()).status(),
            500
        );
    }

    #[test]
    fn test_io_conversion() {
        let err: ResourceError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, ResourceError::Io(_)));
        assert_eq!(err.status(), 500);
    }
}
