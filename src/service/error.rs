use std::io;

use hyper::StatusCode;

/// Why a request could not be resolved to a file or a directory.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Given file '{0}' doesn't exist.")]
    NotFound(String),

    #[error("Path '{0}' points outside of the served directory.")]
    PathTraversal(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Permission problems, I/O failures and anything else the filesystem
    /// reports. The message is the underlying error text.
    #[error("{0}")]
    Io(#[from] io::Error),
}

impl ResolveError {
    pub fn status(&self) -> StatusCode {
        match self {
            ResolveError::NotFound(_) => StatusCode::NOT_FOUND,
            ResolveError::PathTraversal(_) => StatusCode::FORBIDDEN,
            ResolveError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ResolveError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// What the error page is rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub status_text: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            status_text: String::from(status.canonical_reason().unwrap_or_default()),
            message: message.into(),
        }
    }
}

impl From<&ResolveError> for ErrorResponse {
    fn from(error: &ResolveError) -> Self {
        Self::new(error.status(), error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_path() {
        let error = ErrorResponse::from(&ResolveError::NotFound(String::from("/missing.txt")));

        assert_eq!(error.status, StatusCode::NOT_FOUND);
        assert_eq!(error.status_text, "Not Found");
        assert_eq!(error.message, "Given file '/missing.txt' doesn't exist.");
    }

    #[test]
    fn io_errors_are_internal() {
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let error = ErrorResponse::from(&ResolveError::from(io));

        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.status_text, "Internal Server Error");
        assert_eq!(error.message, "permission denied");
    }

    #[test]
    fn traversal_is_forbidden() {
        let error = ResolveError::PathTraversal(String::from("/../etc"));
        assert_eq!(error.status(), StatusCode::FORBIDDEN);
    }
}
