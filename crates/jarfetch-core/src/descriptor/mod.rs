//! Build descriptor (`pom.xml`) reader.
//!
//! Pulls the artifact version and the download base URL out of the
//! descriptor. Only the base URL is mandatory; the version is used verbatim,
//! even when empty.

mod query;

pub use query::NodePath;

use crate::config::{BASE_URL_QUERY, VERSION_QUERY};
use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;

/// The two fields a run needs from the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub version: String,
    pub base_url: String,
}

impl Descriptor {
    /// Read and parse the descriptor at `path`. The file is closed before returning.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::DescriptorNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::DescriptorIo {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        Self::parse(&text, path)
    }

    /// Parse descriptor text. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        // Descriptors may carry a DOCTYPE; it is accepted and not validated against.
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options).map_err(|source| {
            Error::DescriptorParse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let version = NodePath::parse(VERSION_QUERY)?.evaluate(&doc);
        let base_url = NodePath::parse(BASE_URL_QUERY)?.evaluate(&doc);
        if base_url.is_empty() {
            return Err(Error::MissingBaseUrl {
                path: path.to_path_buf(),
            });
        }
        tracing::debug!(%version, %base_url, "read descriptor {}", path.display());

        Ok(Self { version, base_url })
    }
}
