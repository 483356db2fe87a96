//! Placeholder vocabulary: built-in functions, record fields and their dispatch
//!
//! The parser knows nothing about these names. Everything here is an
//! ordinary [`Resolver`](crate::parser::Resolver), so built-ins compose by
//! nesting:
//!
//! ```text
//! [%MD_SAFE(%TITLE%)%](%URL% "%MD_LINK_TITLE_SAFE(%TITLE%)%")
//! %REPLACE(%URL%, "\\?.*$", "")%
//! ```

mod builtins;
mod registry;
mod resolver;

pub use builtins::{any, html_safe, md_link_title_safe, md_safe, replace, BuiltinError, Builtins};
pub use registry::{Builtin, Field, Function, Registry};
pub use resolver::{ResolutionContext, Timestamps};
