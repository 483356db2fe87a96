//! Error types for template processing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::template::BuiltinError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Syntax errors raised while scanning a template.
///
/// The `Display` output is meant for the template author: it names the
/// problem and repeats everything consumed up to the point of failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Missing placeholder name: {consumed}")]
    MissingName { span: Span, consumed: String },

    #[error("Unterminated placeholder: {consumed}")]
    UnterminatedPlaceholder { span: Span, consumed: String },

    #[error("Unterminated arguments for the placeholder \"{name}\": {consumed}")]
    UnterminatedArgs {
        name: String,
        span: Span,
        consumed: String,
    },

    #[error("Unterminated string: {consumed}")]
    UnterminatedString { span: Span, consumed: String },

    #[error("Placeholder nesting exceeds {limit} levels: {consumed}")]
    NestingTooDeep {
        limit: usize,
        span: Span,
        consumed: String,
    },
}

impl ParseError {
    /// Byte range of the offending text in the template
    pub fn span(&self) -> &Span {
        match self {
            ParseError::MissingName { span, .. }
            | ParseError::UnterminatedPlaceholder { span, .. }
            | ParseError::UnterminatedArgs { span, .. }
            | ParseError::UnterminatedString { span, .. }
            | ParseError::NestingTooDeep { span, .. } => span,
        }
    }

    /// Template text consumed before the error was detected
    pub fn consumed(&self) -> &str {
        match self {
            ParseError::MissingName { consumed, .. }
            | ParseError::UnterminatedPlaceholder { consumed, .. }
            | ParseError::UnterminatedArgs { consumed, .. }
            | ParseError::UnterminatedString { consumed, .. }
            | ParseError::NestingTooDeep { consumed, .. } => consumed,
        }
    }

    /// Re-anchor an error raised inside argument text onto the enclosing template.
    pub(crate) fn relocate(mut self, new_span: Span, new_consumed: &str) -> Self {
        match &mut self {
            ParseError::MissingName { span, consumed }
            | ParseError::UnterminatedPlaceholder { span, consumed }
            | ParseError::UnterminatedArgs { span, consumed, .. }
            | ParseError::UnterminatedString { span, consumed }
            | ParseError::NestingTooDeep { span, consumed, .. } => {
                *span = new_span;
                *consumed = new_consumed.to_string();
            }
        }
        self
    }

    fn headline(&self) -> String {
        match self {
            ParseError::MissingName { .. } => "missing placeholder name".to_string(),
            ParseError::UnterminatedPlaceholder { .. } => {
                "placeholder is never closed with '%'".to_string()
            }
            ParseError::UnterminatedArgs { name, .. } => {
                format!("arguments of \"{}\" are never closed with ')'", name)
            }
            ParseError::UnterminatedString { .. } => "quoted string is never closed".to_string(),
            ParseError::NestingTooDeep { limit, .. } => {
                format!("placeholders nested more than {} levels deep", limit)
            }
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = char_span(source, self.span());
        let headline = self.headline();
        let mut buf = Vec::new();

        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&headline)
            .with_label(
                Label::new((filename, span))
                    .with_message(headline.clone())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// ariadne labels count characters, spans here count bytes
fn char_span(source: &str, span: &Span) -> Span {
    let clamp = |offset: usize| {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        source[..offset].chars().count()
    };
    clamp(span.start)..clamp(span.end)
}

/// Errors that can occur while expanding a template
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed template syntax
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A built-in function rejected its arguments
    #[error(transparent)]
    Builtin(#[from] BuiltinError),

    /// A caller-supplied resolver failed
    #[error("failed to resolve placeholder \"{name}\": {message}")]
    Resolve { name: String, message: String },
}

impl Error {
    /// Create a resolver failure for the named placeholder
    pub fn resolve(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolve {
            name: name.into(),
            message: message.into(),
        }
    }

    /// The syntax error, if this is one
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            Error::Parse(err) => Some(err),
            _ => None,
        }
    }
}
