//! tabclip - Format browser tabs as clipboard text with placeholder templates
//!
//! Templates are plain text with embedded `%NAME(arg1, arg2, ...)%` calls.
//! This library provides the placeholder parser, the built-in functions and
//! record fields, and the pipeline that formats a batch of tabs.
//!
//! # Example
//!
//! ```rust
//! use tabclip::{format_record, FormatConfig, TabRecord};
//!
//! let tab = TabRecord::new("https://example.com/", "Example <Domain>");
//! let text = format_record("%HTML_SAFE(%TITLE%)%", &tab, &FormatConfig::default()).unwrap();
//! assert_eq!(text.plain_text, "Example &lt;Domain&gt;");
//! ```

pub mod config;
pub mod error;
pub mod parser;
pub mod record;
pub mod template;

pub use config::{Config, ConfigError, FormatEntry};
pub use error::{Error, ParseError};
pub use parser::{process, Call, Passthrough, Processor, Resolver};
pub use record::{load_records, RecordError, TabRecord};
pub use template::{BuiltinError, Builtins, ResolutionContext, Timestamps};

use log::{debug, warn};
use serde::Deserialize;

use template::html_safe;

/// Separator placed between the texts of several records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Delimiter {
    /// The configured line ending; also appended after the last record
    #[default]
    LineBreak,
    Space,
    Tab,
}

/// Configuration for formatting records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Use `\r\n` instead of `\n` for line endings
    pub use_crlf: bool,
    /// Separator between records
    pub delimiter: Delimiter,
    /// Maximum nesting depth of placeholders inside arguments
    pub max_depth: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            use_crlf: false,
            delimiter: Delimiter::default(),
            max_depth: parser::DEFAULT_MAX_DEPTH,
        }
    }
}

impl FormatConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable CRLF line endings
    pub fn with_crlf(mut self, use_crlf: bool) -> Self {
        self.use_crlf = use_crlf;
        self
    }

    /// Set the separator between records
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the maximum placeholder nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn eol(&self) -> &'static str {
        if self.use_crlf {
            "\r\n"
        } else {
            "\n"
        }
    }

    fn separator(&self) -> &'static str {
        match self.delimiter {
            Delimiter::LineBreak => self.eol(),
            Delimiter::Space => " ",
            Delimiter::Tab => "\t",
        }
    }

    pub fn processor(&self) -> Processor {
        Processor::new().with_max_depth(self.max_depth)
    }
}

/// Text produced for one record or a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formatted {
    pub plain_text: String,
    /// HTML flavor, present only for templates containing `%RT%`
    pub rich_text: Option<String>,
}

fn is_rich_text(template: &str) -> bool {
    template.to_lowercase().contains("%rt%")
}

/// Format one record, capturing the current time for time placeholders
pub fn format_record(
    template: &str,
    record: &TabRecord,
    config: &FormatConfig,
) -> Result<Formatted, Error> {
    format_record_at(template, record, config, &Timestamps::now())
}

/// Format one record with fixed timestamps
pub fn format_record_at(
    template: &str,
    record: &TabRecord,
    config: &FormatConfig,
    timestamps: &Timestamps,
) -> Result<Formatted, Error> {
    debug!(url = record.url.as_str(); "Formatting record");
    let ctx = ResolutionContext::new(record, config.eol(), timestamps);
    let filled = config.processor().process(template, &ctx)?;

    if !is_rich_text(template) {
        return Ok(Formatted {
            plain_text: filled,
            rich_text: None,
        });
    }

    // A template of only %RT% still yields a usable link
    if filled.trim().is_empty() {
        return Ok(Formatted {
            plain_text: format!("{}<{}>", record.title, record.url),
            rich_text: Some(format!(
                "<a href=\"{}\">{}</a>",
                html_safe(&record.url),
                html_safe(&record.title)
            )),
        });
    }

    Ok(Formatted {
        rich_text: Some(filled.clone()),
        plain_text: filled,
    })
}

/// Format every record and join the results.
///
/// A record whose template fails to expand contributes the error message as
/// its text instead of failing the whole batch.
pub fn format_records(template: &str, records: &[TabRecord], config: &FormatConfig) -> Formatted {
    let timestamps = Timestamps::now();
    let items: Vec<Formatted> = records
        .iter()
        .map(|record| {
            format_record_at(template, record, config, &timestamps).unwrap_or_else(|err| {
                warn!(url = record.url.as_str(), error:% = err; "Failed to format record");
                Formatted {
                    plain_text: err.to_string(),
                    rich_text: None,
                }
            })
        })
        .collect();

    let separator = config.separator();
    let mut plain_text = items
        .iter()
        .map(|item| item.plain_text.as_str())
        .collect::<Vec<_>>()
        .join(separator);
    if config.delimiter == Delimiter::LineBreak && records.len() > 1 {
        plain_text.push_str(separator);
    }

    let rich_text = is_rich_text(template).then(|| {
        items
            .iter()
            .map(|item| item.rich_text.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("<br />")
    });

    Formatted {
        plain_text,
        rich_text,
    }
}

/// Check a template for syntax errors without resolving anything
pub fn check_template(template: &str, config: &FormatConfig) -> Result<(), Error> {
    config.processor().process(template, &Passthrough).map(|_| ())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tabs() -> Vec<TabRecord> {
        vec![
            TabRecord::new("https://a.example/", "A"),
            TabRecord::new("https://b.example/", "B"),
        ]
    }

    #[test]
    fn test_format_single_record() {
        let tab = TabRecord::new("https://a.example/", "A");
        let text = format_record("%TITLE%%EOL%%URL%", &tab, &FormatConfig::default()).unwrap();
        assert_eq!(text.plain_text, "A\nhttps://a.example/");
        assert_eq!(text.rich_text, None);
    }

    #[test]
    fn test_crlf() {
        let tab = TabRecord::new("u", "t");
        let config = FormatConfig::new().with_crlf(true);
        assert_eq!(format_record("%EOL%", &tab, &config).unwrap().plain_text, "\r\n");
    }

    #[test]
    fn test_batch_line_break_adds_trailing_separator() {
        let text = format_records("%URL%", &tabs(), &FormatConfig::default());
        assert_eq!(text.plain_text, "https://a.example/\nhttps://b.example/\n");
    }

    #[test]
    fn test_batch_single_record_has_no_trailing_separator() {
        let text = format_records("%URL%", &tabs()[..1], &FormatConfig::default());
        assert_eq!(text.plain_text, "https://a.example/");
    }

    #[test]
    fn test_batch_space_delimiter() {
        let config = FormatConfig::new().with_delimiter(Delimiter::Space);
        let text = format_records("%TITLE%", &tabs(), &config);
        assert_eq!(text.plain_text, "A B");
    }

    #[test]
    fn test_batch_substitutes_error_message() {
        let config = FormatConfig::new().with_delimiter(Delimiter::Tab);
        let text = format_records("%REPLACE(%URL%)%", &tabs(), &config);
        let message = BuiltinError::MissingPair.to_string();
        assert_eq!(text.plain_text, format!("{}\t{}", message, message));
    }

    #[test]
    fn test_rich_text_template() {
        let text = format_records("%RT%<b>%TITLE%</b>", &tabs(), &FormatConfig::default());
        assert_eq!(text.rich_text.as_deref(), Some("<b>A</b><br /><b>B</b>"));
    }

    #[test]
    fn test_rich_text_fallback_for_blank_result() {
        let tab = TabRecord::new("https://a.example/?x&y", "A & B");
        let text = format_record("%rt%", &tab, &FormatConfig::default()).unwrap();
        assert_eq!(text.plain_text, "A & B<https://a.example/?x&y>");
        assert_eq!(
            text.rich_text.as_deref(),
            Some("<a href=\"https://a.example/?x&amp;y\">A &amp; B</a>")
        );
    }

    #[test]
    fn test_check_template() {
        let config = FormatConfig::default();
        assert!(check_template("%UNKNOWN(a, %URL%)%", &config).is_ok());
        assert!(check_template("%F(\"a)%", &config).is_err());
    }

    #[test]
    fn test_max_depth_from_config() {
        let tab = TabRecord::new("u", "t");
        let config = FormatConfig::new().with_max_depth(0);
        let err = format_record("%HTML_SAFE(%URL%)%", &tab, &config).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::NestingTooDeep { .. })
        ));
    }
}
