use std::path::PathBuf;

/// Error type for the webmarks library
///
/// Lookups that miss (`update_*`, `delete_*`) report through `Option`/`bool`
/// rather than this enum; `NotFound` exists for front ends that want to turn
/// such a miss into a message.
#[derive(Debug, thiserror::Error)]
pub enum WebmarksError {
    /// Sniffing found neither the bookmark markup nor a JSON backup
    #[error("Unrecognized import file: expected a Netscape bookmark HTML export or a webmarks JSON backup")]
    UnrecognizedFormat,

    /// Backup payload is malformed
    #[error("Invalid backup: {0}")]
    InvalidBackup(String),

    /// Folder or bookmark id did not resolve
    #[error("{kind} with ID {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// Durable write of the store document failed after all retries
    #[error("Failed to write {path}: {source}")]
    PersistenceWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store document holds entries that cannot be decoded; it is left untouched
    #[error("Store document {path} has unreadable entries: {details}")]
    CorruptStore { path: PathBuf, details: String },

    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing/serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias using WebmarksError
pub type Result<T> = std::result::Result<T, WebmarksError>;

impl WebmarksError {
    pub fn folder_not_found(id: &str) -> Self {
        WebmarksError::NotFound {
            kind: "Folder",
            id: id.to_string(),
        }
    }

    pub fn bookmark_not_found(id: &str) -> Self {
        WebmarksError::NotFound {
            kind: "Bookmark",
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        assert_eq!(
            WebmarksError::bookmark_not_found("abc").to_string(),
            "Bookmark with ID abc not found"
        );
        assert_eq!(
            WebmarksError::folder_not_found("work").to_string(),
            "Folder with ID work not found"
        );
    }

    #[test]
    fn test_persistence_write_keeps_source() {
        use std::error::Error;

        let err = WebmarksError::PersistenceWrite {
            path: PathBuf::from("/tmp/bookmarks.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/bookmarks.json"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_json_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: WebmarksError = parse_err.into();
        assert!(matches!(err, WebmarksError::Json(_)));
    }
}
