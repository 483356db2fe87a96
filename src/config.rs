//! Configuration file support
//!
//! A TOML file names the clipboard formats offered to the user and the
//! options applied while formatting. Anything the file leaves out falls back
//! to the built-in defaults.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::{Delimiter, FormatConfig};

/// Errors that can occur when loading or querying the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Unknown format '{0}'")]
    UnknownFormat(String),
}

/// A named template offered as a copy command
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FormatEntry {
    pub label: String,
    pub format: String,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub use_crlf: bool,
    pub delimiter: Delimiter,
    pub max_depth: usize,
    pub formats: Vec<FormatEntry>,
}

/// TOML structure for deserializing configuration
#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct TomlConfig {
    use_crlf: Option<bool>,
    delimiter: Option<Delimiter>,
    max_depth: Option<usize>,
    formats: Option<Vec<FormatEntry>>,
}

/// Built-in configuration with the stock clipboard formats
const DEFAULT_CONFIG: &str = r##"
use-crlf = false
delimiter = "line-break"
max-depth = 32

[[formats]]
label = "URL"
format = "%URL%"

[[formats]]
label = "Title and URL"
format = "%TITLE%%EOL%%URL%"

[[formats]]
label = "HTML Link"
format = '<a title="%HTML_SAFE(%TITLE%)%" href="%HTML_SAFE(%URL%)%">%HTML_SAFE(%TITLE%)%</a>'

[[formats]]
label = "Markdown"
format = '[%MD_SAFE(%TITLE%)%](%URL% "%MD_LINK_TITLE_SAFE(%TITLE%)%")'

[[formats]]
label = "Markdown List"
format = '%TREE_INDENT("  ")%* [%MD_SAFE(%TITLE%)%](%URL% "%MD_LINK_TITLE_SAFE(%TITLE%)%")'
"##;

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string, filling gaps from the defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let defaults = Self::default();

        Ok(Config {
            use_crlf: parsed.use_crlf.unwrap_or(defaults.use_crlf),
            delimiter: parsed.delimiter.unwrap_or(defaults.delimiter),
            max_depth: parsed.max_depth.unwrap_or(defaults.max_depth),
            formats: parsed.formats.unwrap_or(defaults.formats),
        })
    }

    /// Find a format by label (case-insensitive) or by 1-based position
    pub fn format(&self, key: &str) -> Result<&FormatEntry, ConfigError> {
        let by_label = self
            .formats
            .iter()
            .find(|entry| entry.label.eq_ignore_ascii_case(key.trim()));
        let by_index = || {
            key.trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| self.formats.get(i))
        };
        by_label
            .or_else(by_index)
            .ok_or_else(|| ConfigError::UnknownFormat(key.to_string()))
    }

    /// Formatting options derived from this configuration
    pub fn format_config(&self) -> FormatConfig {
        FormatConfig::new()
            .with_crlf(self.use_crlf)
            .with_delimiter(self.delimiter)
            .with_max_depth(self.max_depth)
    }
}

impl Default for Config {
    fn default() -> Self {
        let parsed: TomlConfig =
            toml::from_str(DEFAULT_CONFIG).expect("Default config should be valid TOML");
        Config {
            use_crlf: parsed.use_crlf.unwrap_or(false),
            delimiter: parsed.delimiter.unwrap_or_default(),
            max_depth: parsed.max_depth.unwrap_or(crate::parser::DEFAULT_MAX_DEPTH),
            formats: parsed.formats.unwrap_or_default(),
        }
    }
}
