//! Placeholder call sites and the resolver contract

use crate::error::Error;

/// A fully parsed placeholder, handed to a [`Resolver`]
///
/// `args` are already expanded: nested placeholders inside an argument were
/// resolved before this call was built. `raw_args` is the verbatim source
/// text between the parentheses, for resolvers that split arguments
/// themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call<'a> {
    pub name: &'a str,
    pub raw_args: &'a str,
    pub args: &'a [String],
}

impl<'a> Call<'a> {
    pub fn new(name: &'a str, raw_args: &'a str, args: &'a [String]) -> Self {
        Self {
            name,
            raw_args,
            args,
        }
    }

    /// Argument at `index`, or the empty string when absent
    pub fn arg(&self, index: usize) -> &'a str {
        self.args.get(index).map(String::as_str).unwrap_or("")
    }

    /// Reproduce the placeholder as it was written
    pub fn passthrough(&self) -> String {
        if self.raw_args.is_empty() {
            format!("%{}%", self.name)
        } else {
            format!("%{}({})%", self.name, self.raw_args)
        }
    }
}

/// Turns a placeholder call into replacement text.
///
/// Resolvers should be pure with respect to the template: the processor may
/// call them in any nesting order and never catches their errors.
pub trait Resolver {
    fn resolve(&self, call: &Call<'_>) -> Result<String, Error>;
}

impl<F> Resolver for F
where
    F: Fn(&Call<'_>) -> Result<String, Error>,
{
    fn resolve(&self, call: &Call<'_>) -> Result<String, Error> {
        self(call)
    }
}

/// Resolver that leaves every placeholder untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Resolver for Passthrough {
    fn resolve(&self, call: &Call<'_>) -> Result<String, Error> {
        Ok(call.passthrough())
    }
}
