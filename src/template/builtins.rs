//! Record-independent placeholder functions
//!
//! These are plain resolvers over already-expanded arguments; composition
//! such as `%HTML_SAFE(%TITLE%)%` comes entirely from nested argument
//! expansion in the processor.

use fancy_regex::RegexBuilder;
use thiserror::Error;

use super::registry::{Builtin, Function, Registry};
use crate::error::Error;
use crate::parser::{Call, Resolver};

/// Errors raised by built-in functions for bad arguments
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuiltinError {
    #[error("Missing argument: Replacer must take one base text and one or more matcher/replace-text pairs")]
    MissingArgument,

    #[error("Missing matcher/replace-text pair: Replacer must take one base text and one or more matcher/replace-text pairs")]
    MissingPair,

    #[error("Missing replace text for the last matcher: Replacer must take one base text and one or more matcher/replace-text pairs")]
    MissingReplaceText,

    #[error("Invalid matcher \"{pattern}\": {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl Function {
    /// Evaluate the function against a parsed call
    pub fn apply(self, call: &Call<'_>) -> Result<String, Error> {
        let text = match self {
            Function::Replace => replace(call.args)?,
            Function::HtmlSafe => html_safe(call.arg(0)),
            Function::MdSafe => md_safe(call.arg(0)),
            Function::MdLinkTitleSafe => md_link_title_safe(call.arg(0)),
            Function::Any => any(call.args).to_string(),
            Function::Tab => "\t".to_string(),
        };
        Ok(text)
    }
}

/// Resolver exposing only the record-independent functions.
///
/// Every other placeholder is reproduced unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtins;

impl Resolver for Builtins {
    fn resolve(&self, call: &Call<'_>) -> Result<String, Error> {
        match Registry::shared().lookup(call.name) {
            Some(Builtin::Function(function)) => function.apply(call),
            Some(Builtin::Field(_)) | None => Ok(call.passthrough()),
        }
    }
}

/// Apply matcher/replace-text pairs to a base text.
///
/// `args` is `[base, matcher1, replace1, matcher2, replace2, ...]`. Matchers
/// are case-insensitive regular expressions; each pair replaces only the
/// first match in the result of the previous pair.
pub fn replace(args: &[String]) -> Result<String, BuiltinError> {
    match args.len() {
        0 => return Err(BuiltinError::MissingArgument),
        1 | 2 => return Err(BuiltinError::MissingPair),
        n if n % 2 == 0 => return Err(BuiltinError::MissingReplaceText),
        _ => {}
    }

    let mut replaced = args[0].clone();
    for pair in args[1..].chunks_exact(2) {
        let (pattern, replacement) = (&pair[0], &pair[1]);
        let matcher = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|err| BuiltinError::InvalidPattern {
                pattern: pattern.clone(),
                message: err.to_string(),
            })?;
        let replacement = translate_replacement(replacement);
        replaced = matcher
            .try_replacen(&replaced, 1, replacement.as_str())
            .map_err(|err| BuiltinError::InvalidPattern {
                pattern: pattern.clone(),
                message: err.to_string(),
            })?
            .into_owned();
    }
    Ok(replaced)
}

/// Convert `$&`, `$1`, `$<name>` replacement references into `${..}` expansion syntax.
///
/// Group numbers are braced so `$1st` means group 1 followed by "st".
fn translate_replacement(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                chars.next();
                out.push_str("$$");
            }
            Some('&') => {
                chars.next();
                out.push_str("${0}");
            }
            Some(d) if d.is_ascii_digit() => {
                let mut group = String::new();
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    if group.len() == 2 {
                        break;
                    }
                    group.push(d);
                    chars.next();
                }
                out.push_str(&format!("${{{}}}", group));
            }
            Some('<') => {
                let rest: String = chars.clone().skip(1).collect();
                match rest.find('>') {
                    Some(end) if end > 0 => {
                        out.push_str(&format!("${{{}}}", &rest[..end]));
                        for _ in 0..rest[..end].chars().count() + 2 {
                            chars.next();
                        }
                    }
                    _ => out.push_str("$$"),
                }
            }
            _ => out.push_str("$$"),
        }
    }
    out
}

/// Escape text for use inside HTML content or attribute values
pub fn html_safe(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Backslash-escape every ASCII punctuation character Markdown may interpret
pub fn md_safe(text: &str) -> String {
    escape_with_backslash(text, |c| {
        matches!(
            c,
            '-' | '!' | '"' | '#' | '$' | '%' | '&' | '\'' | '(' | ')' | '*' | '+' | ','
                | '.' | '/' | ':' | ';' | '<' | '=' | '>' | '?' | '@' | '^' | '_' | '`'
                | '{' | '|' | '}' | '~' | '[' | '\\' | ']'
        )
    })
}

/// Escape text for use as a Markdown link title (`[x](url "title")`)
pub fn md_link_title_safe(text: &str) -> String {
    escape_with_backslash(text, |c| matches!(c, '"' | '\'' | '(' | ')' | '&' | '\\'))
}

fn escape_with_backslash(text: &str, needs_escape: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if needs_escape(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// First non-empty argument
pub fn any(args: &[String]) -> &str {
    args.iter()
        .map(String::as_str)
        .find(|arg| !arg.is_empty())
        .unwrap_or("")
}
