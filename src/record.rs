//! Tab records and loading them from JSON or TOML files

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading records
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to read records file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse records JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to parse records TOML: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// A browser tab to format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabRecord {
    pub url: String,
    pub title: String,
    /// Name of the contextual identity (container) the tab belongs to
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    /// Number of selected ancestors of this tab in the tree
    #[serde(default)]
    pub indent_level: usize,
}

impl TabRecord {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    pub fn with_indent_level(mut self, level: usize) -> Self {
        self.indent_level = level;
        self
    }
}

/// Top-level shapes accepted for a records file
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonRecords {
    List(Vec<TabRecord>),
    Table { tabs: Vec<TabRecord> },
}

#[derive(Deserialize)]
struct TomlRecords {
    #[serde(default)]
    tabs: Vec<TabRecord>,
}

/// Parse records from JSON: either an array or an object with a `tabs` array
pub fn records_from_json(content: &str) -> Result<Vec<TabRecord>, RecordError> {
    let parsed: JsonRecords = serde_json::from_str(content)?;
    Ok(match parsed {
        JsonRecords::List(tabs) | JsonRecords::Table { tabs } => tabs,
    })
}

/// Parse records from TOML `[[tabs]]` tables
pub fn records_from_toml(content: &str) -> Result<Vec<TabRecord>, RecordError> {
    let parsed: TomlRecords = toml::from_str(content)?;
    Ok(parsed.tabs)
}

/// Load records from a file; `.toml` files are TOML, everything else JSON
pub fn load_records(path: &Path) -> Result<Vec<TabRecord>, RecordError> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => records_from_toml(&content),
        _ => records_from_json(&content),
    }
}
