use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use blocks::metadata::{LiveMetadata, MetadataError, ReferencePage, parse_base_url};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "blocks.toml";

/// Used when neither the flag nor the config names an output file.
pub const DEFAULT_OUTPUT: &str = "index.html";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default output path for `build`.
    pub output: Option<String>,

    /// Metadata used as-is, or as the fallback for anything the reference page lacks.
    pub metadata: LiveMetadata,

    pub reference: ReferenceConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceConfig {
    /// Saved copy of the live page to recover classes and stylesheets from.
    pub path: Option<PathBuf>,

    /// Base URL for resolving relative stylesheet hrefs.
    pub base_url: Option<String>,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct MetadataOverrides {
    pub reference: Option<PathBuf>,
    pub base_url: Option<String>,
    pub html_class: Option<String>,
    pub body_class: Option<String>,
    /// Replaces the stylesheet list when non-empty.
    pub stylesheets: Vec<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, message: String },
    Parse { path: PathBuf, message: String },
    Metadata(MetadataError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, message } => {
                write!(f, "cannot read '{}': {}", path.display(), message)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "invalid config '{}': {}", path.display(), message)
            }
            ConfigError::Metadata(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<MetadataError> for ConfigError {
    fn from(err: MetadataError) -> Self {
        ConfigError::Metadata(err)
    }
}

impl Config {
    /// Load `explicit` if given, otherwise `blocks.toml` when it exists,
    /// otherwise the empty default.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    log::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Config::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
        log::debug!("loaded config from {}", path.display());
        Config::from_toml(&text, &path)
    }

    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Resolve the metadata handed to the compiler.
    ///
    /// The reference page (flag, then config) fills what it can; the config's
    /// `[metadata]` covers the rest; explicit flags win over both.
    pub fn resolve_metadata(&self, overrides: &MetadataOverrides) -> Result<LiveMetadata, ConfigError> {
        let reference_path = overrides
            .reference
            .as_ref()
            .or(self.reference.path.as_ref());

        let mut metadata = match reference_path {
            Some(path) => {
                let markup = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                let base_url = overrides
                    .base_url
                    .as_deref()
                    .or(self.reference.base_url.as_deref())
                    .map(parse_base_url)
                    .transpose()?;
                ReferencePage::extract(&markup, base_url.as_ref()).into_metadata(&self.metadata)
            }
            None => self.metadata.clone(),
        };

        if let Some(class) = &overrides.html_class {
            metadata.html_class = class.clone();
        }
        if let Some(class) = &overrides.body_class {
            metadata.body_class = class.clone();
        }
        if !overrides.stylesheets.is_empty() {
            metadata.stylesheet_urls = overrides.stylesheets.clone();
        }

        Ok(metadata)
    }

    /// The output path: flag, then config, then `index.html`.
    pub fn output_path(&self, flag: Option<&str>) -> String {
        flag.or(self.output.as_deref())
            .unwrap_or(DEFAULT_OUTPUT)
            .to_string()
    }
}
