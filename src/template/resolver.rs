//! Placeholder resolution against a tab record

use chrono::{DateTime, Local, Utc};

use super::builtins::html_safe;
use super::registry::{Builtin, Field, Registry};
use crate::error::Error;
use crate::parser::{Call, Resolver};
use crate::record::TabRecord;

/// Indent unit used by `%TREE_INDENT%` without arguments
const DEFAULT_INDENT: &str = "  ";

/// Times shared by every record of one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamps {
    pub utc: String,
    pub local: String,
}

impl Timestamps {
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            utc: time.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            local: time
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        }
    }
}

/// Everything a template can refer to while formatting one record
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    pub record: &'a TabRecord,
    /// Line ending produced by `%EOL%`
    pub eol: &'a str,
    pub timestamps: &'a Timestamps,
    registry: &'static Registry,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(record: &'a TabRecord, eol: &'a str, timestamps: &'a Timestamps) -> Self {
        Self {
            record,
            eol,
            timestamps,
            registry: Registry::shared(),
        }
    }

    fn apply(&self, builtin: Builtin, call: &Call<'_>) -> Result<String, Error> {
        match builtin {
            Builtin::Function(function) => function.apply(call),
            Builtin::Field(field) => Ok(self.field(field, call)),
        }
    }

    fn field(&self, field: Field, call: &Call<'_>) -> String {
        let record = self.record;
        match field {
            Field::RichText | Field::Ignored => String::new(),
            Field::Eol => self.eol.to_string(),
            Field::Url => record.url.clone(),
            Field::Title => record.title.clone(),
            Field::ContainerName => match &record.container {
                Some(container) => format!("{}{}{}", call.arg(0), container, call.arg(1)),
                None => String::new(),
            },
            Field::ContainerUrl => match &record.container {
                Some(container) => {
                    format!("ext+container:name={}&url={}", container, record.url)
                }
                None => record.url.clone(),
            },
            Field::Author => record.author.clone().unwrap_or_default(),
            Field::Description => record.description.clone().unwrap_or_default(),
            Field::Keywords => record.keywords.clone().unwrap_or_default(),
            Field::UtcTime => self.timestamps.utc.clone(),
            Field::LocalTime => self.timestamps.local.clone(),
            Field::TreeIndent => self.tree_indent(call),
        }
    }

    /// One unit per indent level; unit `i` is the i-th argument (the last
    /// one repeats) and the innermost level comes last.
    fn tree_indent(&self, call: &Call<'_>) -> String {
        let units: Vec<&str> = if !call.args.is_empty() {
            call.args.iter().map(String::as_str).collect()
        } else if !call.raw_args.is_empty() {
            vec![call.raw_args]
        } else {
            vec![DEFAULT_INDENT]
        };

        let mut indent = String::new();
        for level in 0..self.record.indent_level {
            indent.insert_str(0, units[level.min(units.len() - 1)]);
        }
        indent
    }
}

impl Resolver for ResolutionContext<'_> {
    fn resolve(&self, call: &Call<'_>) -> Result<String, Error> {
        if let Some(builtin) = self.registry.lookup(call.name) {
            return self.apply(builtin, call);
        }
        if let Some(builtin) = self.registry.lookup_html_suffixed(call.name) {
            return Ok(html_safe(&self.apply(builtin, call)?));
        }
        Ok(call.passthrough())
    }
}
