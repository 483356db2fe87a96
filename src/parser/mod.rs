//! Parser for `%NAME(ARGS)%` placeholder templates

pub mod call;
mod processor;
pub mod scanner;

pub use call::*;
pub use processor::{process, Processor, DEFAULT_MAX_DEPTH};
