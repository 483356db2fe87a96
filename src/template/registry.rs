//! Dispatch table from placeholder names to built-in handlers

use std::collections::HashMap;
use std::sync::OnceLock;

/// Functions whose result depends only on their arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Replace,
    HtmlSafe,
    MdSafe,
    MdLinkTitleSafe,
    Any,
    Tab,
}

/// Placeholders filled from the record being formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `%RT%` marks a rich-text template and expands to nothing
    RichText,
    /// Placeholders of the page context menu; always empty here
    Ignored,
    Eol,
    Url,
    Title,
    ContainerName,
    ContainerUrl,
    Author,
    Description,
    Keywords,
    UtcTime,
    LocalTime,
    TreeIndent,
}

/// Every placeholder name the formatter recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Function(Function),
    Field(Field),
}

impl Builtin {
    pub const ALL: [Builtin; 19] = [
        Builtin::Function(Function::Replace),
        Builtin::Function(Function::HtmlSafe),
        Builtin::Function(Function::MdSafe),
        Builtin::Function(Function::MdLinkTitleSafe),
        Builtin::Function(Function::Any),
        Builtin::Function(Function::Tab),
        Builtin::Field(Field::RichText),
        Builtin::Field(Field::Ignored),
        Builtin::Field(Field::Eol),
        Builtin::Field(Field::Url),
        Builtin::Field(Field::Title),
        Builtin::Field(Field::ContainerName),
        Builtin::Field(Field::ContainerUrl),
        Builtin::Field(Field::Author),
        Builtin::Field(Field::Description),
        Builtin::Field(Field::Keywords),
        Builtin::Field(Field::UtcTime),
        Builtin::Field(Field::LocalTime),
        Builtin::Field(Field::TreeIndent),
    ];

    /// Lower-cased names that select this builtin
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Builtin::Function(Function::Replace) => &["replace"],
            Builtin::Function(Function::HtmlSafe) => &["html", "html_safe"],
            Builtin::Function(Function::MdSafe) => &["md", "md_safe"],
            Builtin::Function(Function::MdLinkTitleSafe) => {
                &["md_link_title", "md_link_title_safe"]
            }
            Builtin::Function(Function::Any) => &["any"],
            Builtin::Function(Function::Tab) => &["tab"],
            Builtin::Field(Field::RichText) => &["rt"],
            Builtin::Field(Field::Ignored) => &["rlink", "sel"],
            Builtin::Field(Field::Eol) => &["eol"],
            Builtin::Field(Field::Url) => &["url"],
            Builtin::Field(Field::Title) => &["title", "text"],
            Builtin::Field(Field::ContainerName) => &["container_name", "container_title"],
            Builtin::Field(Field::ContainerUrl) => &["container_url"],
            Builtin::Field(Field::Author) => &["author"],
            Builtin::Field(Field::Description) => &["desc", "description"],
            Builtin::Field(Field::Keywords) => &["keywords"],
            Builtin::Field(Field::UtcTime) => &["utc_time"],
            Builtin::Field(Field::LocalTime) => &["local_time"],
            Builtin::Field(Field::TreeIndent) => &["tst_indent", "tree_indent"],
        }
    }
}

/// Lookup table from placeholder name to builtin, built once
#[derive(Debug, Clone)]
pub struct Registry {
    by_name: HashMap<&'static str, Builtin>,
}

impl Default for Registry {
    fn default() -> Self {
        let by_name = Builtin::ALL
            .iter()
            .flat_map(|builtin| builtin.aliases().iter().map(move |name| (*name, *builtin)))
            .collect();
        Self { by_name }
    }
}

impl Registry {
    /// Create a registry of every builtin
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry
    pub fn shared() -> &'static Registry {
        static SHARED: OnceLock<Registry> = OnceLock::new();
        SHARED.get_or_init(Registry::new)
    }

    /// Find the builtin for a placeholder name, ignoring case and padding
    pub fn lookup(&self, name: &str) -> Option<Builtin> {
        self.by_name.get(name.trim().to_lowercase().as_str()).copied()
    }

    /// Find the builtin behind a legacy `<NAME>_HTML` / `<NAME>_HTMLIFIED` name
    pub fn lookup_html_suffixed(&self, name: &str) -> Option<Builtin> {
        let lower = name.trim().to_lowercase();
        let base = lower
            .strip_suffix("_htmlified")
            .or_else(|| lower.strip_suffix("_html"))?;
        if base.is_empty() {
            return None;
        }
        self.lookup(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = Registry::new();
        assert_eq!(registry.lookup("URL"), Some(Builtin::Field(Field::Url)));
        assert_eq!(registry.lookup(" Url "), Some(Builtin::Field(Field::Url)));
        assert_eq!(
            registry.lookup("REPLACE"),
            Some(Builtin::Function(Function::Replace))
        );
    }

    #[test]
    fn test_aliases_share_a_builtin() {
        let registry = Registry::new();
        assert_eq!(registry.lookup("desc"), registry.lookup("description"));
        assert_eq!(registry.lookup("html"), registry.lookup("html_safe"));
        assert_eq!(registry.lookup("tst_indent"), registry.lookup("tree_indent"));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(Registry::new().lookup("unknown"), None);
        assert_eq!(Registry::new().lookup(""), None);
    }

    #[test]
    fn test_every_alias_is_unique() {
        let total: usize = Builtin::ALL.iter().map(|b| b.aliases().len()).sum();
        assert_eq!(Registry::new().by_name.len(), total);
    }

    #[test]
    fn test_html_suffixed_lookup() {
        let registry = Registry::new();
        assert_eq!(
            registry.lookup_html_suffixed("TITLE_HTML"),
            Some(Builtin::Field(Field::Title))
        );
        assert_eq!(
            registry.lookup_html_suffixed("author_htmlified"),
            Some(Builtin::Field(Field::Author))
        );
        assert_eq!(registry.lookup_html_suffixed("_HTML"), None);
        assert_eq!(registry.lookup_html_suffixed("TITLE"), None);
    }

    #[test]
    fn test_shared_registry_is_complete() {
        assert_eq!(
            Registry::shared().lookup("md_link_title_safe"),
            Some(Builtin::Function(Function::MdLinkTitleSafe))
        );
    }
}
