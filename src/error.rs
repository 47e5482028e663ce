//! Error types for the uploader.

use std::path::PathBuf;

/// Result type alias for uploader operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A local file could not be read or inspected.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server rejected request ({status}){}", rejection_suffix(.message))]
    Rejected { status: u16, message: Option<String> },

    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    /// The background runtime for network work could not be started.
    #[error("Failed to start async runtime: {0}")]
    Runtime(std::io::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// True when no response was received from the server.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Io { .. } | Error::Runtime(_))
    }
}

fn rejection_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {m}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_includes_server_reason() {
        let err = Error::Rejected {
            status: 400,
            message: Some("Invalid exam year format. Expected 4-digit year".into()),
        };
        assert_eq!(
            err.to_string(),
            "Server rejected request (400): Invalid exam year format. Expected 4-digit year"
        );

        let bare = Error::Rejected {
            status: 502,
            message: None,
        };
        assert_eq!(bare.to_string(), "Server rejected request (502)");
        assert!(!bare.is_transport());
    }

    #[test]
    fn local_read_failures_are_transport_errors() {
        let err = Error::io(
            "/tmp/missing.pdf",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_transport());
        assert!(err.to_string().contains("/tmp/missing.pdf"));
    }
}
