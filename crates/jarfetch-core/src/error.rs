//! Error type shared by every stage of a run.

use std::io;
use std::path::PathBuf;

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse grouping of failures, used for logging only; the process exit code
/// is 1 for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Descriptor or settings are missing, unreadable, or incomplete.
    Configuration,
    /// Network, TLS, HTTP status, or destination I/O failure during download.
    Transfer,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("descriptor file not found: {}", path.display())]
    DescriptorNotFound { path: PathBuf },

    #[error("failed to read descriptor {}: {source}", path.display())]
    DescriptorIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parse error in {}: {source}", path.display())]
    DescriptorParse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("invalid query expression {expr:?}: {reason}")]
    InvalidQuery { expr: String, reason: &'static str },

    #[error("missing configuration: base URL not found in {}", path.display())]
    MissingBaseUrl { path: PathBuf },

    #[error("settings file not found: {}", path.display())]
    SettingsNotFound { path: PathBuf },

    #[error("invalid settings in {}: {message}", path.display())]
    Settings { path: PathBuf, message: String },

    #[error("invalid download URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("refusing non-HTTPS download URL {url}")]
    InsecureScheme { url: String },

    #[error("refusing redirect from {from} to {to}")]
    InsecureRedirect { from: String, to: String },

    #[error("download of {url} failed: {source}")]
    Transfer {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },

    #[error("failed to write {}: {source}", path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::DescriptorNotFound { .. }
            | Error::DescriptorIo { .. }
            | Error::DescriptorParse { .. }
            | Error::InvalidQuery { .. }
            | Error::MissingBaseUrl { .. }
            | Error::SettingsNotFound { .. }
            | Error::Settings { .. }
            | Error::InvalidUrl { .. }
            | Error::InsecureScheme { .. } => ErrorCategory::Configuration,
            Error::InsecureRedirect { .. }
            | Error::Transfer { .. }
            | Error::Http { .. }
            | Error::Destination { .. } => ErrorCategory::Transfer,
        }
    }
}
