pub mod reference;

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

pub use reference::ReferencePage;

/// Document-level classes and stylesheets recovered from the live site.
/// Supplied to the compiler as-is; the compiler has no fallbacks of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveMetadata {
    /// Appended to the `<html>` class list.
    pub html_class: String,
    /// The entire `class` attribute of `<body>`.
    pub body_class: String,
    /// One `<link rel="stylesheet">` per URL, in order.
    pub stylesheet_urls: Vec<String>,
}

#[derive(Debug)]
pub enum MetadataError {
    InvalidBaseUrl { url: String, message: String },
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataError::InvalidBaseUrl { url, message } => {
                write!(f, "invalid base URL '{}': {}", url, message)
            }
        }
    }
}

impl std::error::Error for MetadataError {}

/// Parse the URL that relative stylesheet hrefs are resolved against.
pub fn parse_base_url(url: &str) -> Result<Url, MetadataError> {
    Url::parse(url).map_err(|e| MetadataError::InvalidBaseUrl {
        url: url.to_string(),
        message: e.to_string(),
    })
}
