//! Placeholder expansion
//!
//! A template is scanned once per nesting level. Text outside placeholders
//! is copied through; each `%NAME(ARGS)%` is parsed, its arguments are
//! expanded recursively (innermost placeholders first), and the finished call
//! is handed to the resolver.

use log::{trace, warn};

use super::call::{Call, Resolver};
use super::scanner::{scan, Quote, Span, Token};
use crate::error::{Error, ParseError};

/// Nesting limit used by [`process`]
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Expands placeholders in templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Processor {
    max_depth: usize,
}

impl Default for Processor {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Processor {
    /// Create a processor with the default nesting limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how deeply placeholders may nest inside arguments.
    ///
    /// Top-level placeholders are at depth 0; `0` therefore forbids nesting.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expand every placeholder in `input` through `resolver`
    pub fn process<R>(&self, input: &str, resolver: &R) -> Result<String, Error>
    where
        R: Resolver + ?Sized,
    {
        self.expand(input, resolver, 0)
    }

    fn expand<R>(&self, input: &str, resolver: &R, depth: usize) -> Result<String, Error>
    where
        R: Resolver + ?Sized,
    {
        Expansion::new(self, resolver, input, depth).run()
    }
}

/// Expand `input` with the default [`Processor`]
pub fn process<R>(input: &str, resolver: &R) -> Result<String, Error>
where
    R: Resolver + ?Sized,
{
    Processor::default().process(input, resolver)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Copying text outside any placeholder
    Literal,
    /// After the opening `%`, collecting the name
    Name,
    /// Inside a parenthesized argument group
    Args,
    /// After a `)`, waiting for the closing `%` or another group
    AfterArgs,
}

/// One argument being collected
#[derive(Debug, Default)]
struct Argument {
    text: String,
    /// Unquoted whitespace, kept only if more bare text follows
    pending_space: String,
    started: bool,
    bare_tail: bool,
}

impl Argument {
    fn push_bare(&mut self, s: &str) {
        if self.bare_tail {
            self.text.push_str(&self.pending_space);
        }
        self.pending_space.clear();
        self.text.push_str(s);
        self.started = true;
        self.bare_tail = true;
    }

    fn push_space(&mut self, s: &str) {
        if self.started {
            self.pending_space.push_str(s);
        }
    }

    fn push_quoted(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// Escaped characters must stay literal when the argument is expanded
    fn push_escaped(&mut self, c: char, quoted: bool) {
        let mut buf = String::with_capacity(2);
        if matches!(c, '%' | '\\') {
            buf.push('\\');
        }
        buf.push(c);
        if quoted {
            self.push_quoted(&buf);
        } else {
            self.push_bare(&buf);
        }
    }

    fn open_quote(&mut self) {
        self.pending_space.clear();
        self.started = true;
        self.bare_tail = false;
    }

    fn close_quote(&mut self) {
        self.bare_tail = false;
    }

    fn is_blank(&self) -> bool {
        !self.started
    }

    fn take(&mut self) -> String {
        std::mem::take(self).text
    }
}

/// The placeholder currently being parsed
#[derive(Debug, Default)]
struct Placeholder {
    start: usize,
    name: String,
    raw_args: String,
    args: Vec<String>,
    group_start: usize,
    group_args: usize,
    argument: Argument,
}

impl Placeholder {
    fn at(start: usize) -> Self {
        Self {
            start,
            ..Self::default()
        }
    }
}

struct Expansion<'a, R: ?Sized> {
    processor: &'a Processor,
    resolver: &'a R,
    input: &'a str,
    depth: usize,
    state: State,
    quote: Option<Quote>,
    output: String,
    call: Placeholder,
}

impl<'a, R> Expansion<'a, R>
where
    R: Resolver + ?Sized,
{
    fn new(processor: &'a Processor, resolver: &'a R, input: &'a str, depth: usize) -> Self {
        Self {
            processor,
            resolver,
            input,
            depth,
            state: State::Literal,
            quote: None,
            output: String::with_capacity(input.len()),
            call: Placeholder::default(),
        }
    }

    fn run(mut self) -> Result<String, Error> {
        for (token, span) in scan(self.input) {
            match self.state {
                State::Literal => self.literal(token, span)?,
                State::Name => self.name(token, span)?,
                State::Args => self.args(token, span)?,
                State::AfterArgs => self.after_args(token, span)?,
            }
        }
        self.finish()
    }

    fn literal(&mut self, token: Token, span: Span) -> Result<(), Error> {
        match token {
            Token::Percent => {
                if self.depth > self.processor.max_depth {
                    return Err(ParseError::NestingTooDeep {
                        limit: self.processor.max_depth,
                        consumed: self.input[..span.end].to_string(),
                        span,
                    }
                    .into());
                }
                self.call = Placeholder::at(span.start);
                self.state = State::Name;
            }
            Token::Escape(c) => self.output.push(c),
            _ => self.output.push_str(&self.input[span]),
        }
        Ok(())
    }

    fn name(&mut self, token: Token, span: Span) -> Result<(), Error> {
        if let Some(quote) = self.quote {
            match token {
                Token::Escape(c) => self.call.name.push(c),
                _ if token.quote() == Some(quote) => self.quote = None,
                _ => self.call.name.push_str(&self.input[span]),
            }
            return Ok(());
        }

        match token {
            Token::Percent => {
                self.require_name(&span)?;
                self.dispatch()?;
            }
            Token::OpenParen => {
                self.require_name(&span)?;
                self.open_group(span.end);
            }
            Token::Escape(c) => self.call.name.push(c),
            Token::SingleQuote | Token::DoubleQuote | Token::BackQuote => {
                self.quote = token.quote();
            }
            _ => self.call.name.push_str(&self.input[span]),
        }
        Ok(())
    }

    fn args(&mut self, token: Token, span: Span) -> Result<(), Error> {
        if let Some(quote) = self.quote {
            match token {
                Token::Escape(c) => self.call.argument.push_escaped(c, true),
                _ if token.quote() == Some(quote) => {
                    self.quote = None;
                    self.call.argument.close_quote();
                }
                _ => self.call.argument.push_quoted(&self.input[span]),
            }
            return Ok(());
        }

        match token {
            Token::SingleQuote | Token::DoubleQuote | Token::BackQuote => {
                self.quote = token.quote();
                self.call.argument.open_quote();
            }
            Token::Comma => self.finish_argument(span.start)?,
            Token::CloseParen => {
                if !self.call.argument.is_blank() || self.call.group_args > 0 {
                    self.finish_argument(span.start)?;
                }
                self.close_group(span.start);
            }
            Token::Escape(c) => self.call.argument.push_escaped(c, false),
            Token::Whitespace => self.call.argument.push_space(&self.input[span]),
            _ => self.call.argument.push_bare(&self.input[span]),
        }
        Ok(())
    }

    fn after_args(&mut self, token: Token, span: Span) -> Result<(), Error> {
        match token {
            Token::Percent => self.dispatch()?,
            Token::OpenParen => self.open_group(span.end),
            Token::Whitespace => {}
            _ => {
                warn!(
                    name = self.call.name.as_str(),
                    text = &self.input[span];
                    "Ignoring text between placeholder arguments and closing '%'"
                );
            }
        }
        Ok(())
    }

    fn require_name(&self, span: &Span) -> Result<(), Error> {
        if self.call.name.is_empty() {
            return Err(ParseError::MissingName {
                span: self.call.start..span.end,
                consumed: self.input[..span.end].to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn open_group(&mut self, start: usize) {
        self.call.group_start = start;
        self.call.group_args = 0;
        self.state = State::Args;
    }

    fn close_group(&mut self, end: usize) {
        let raw = &self.input[self.call.group_start..end];
        if !raw.is_empty() {
            if !self.call.raw_args.is_empty() {
                self.call.raw_args.push_str(", ");
            }
            self.call.raw_args.push_str(raw);
        }
        self.state = State::AfterArgs;
    }

    fn finish_argument(&mut self, end: usize) -> Result<(), Error> {
        let text = self.call.argument.take();
        let value = if text.contains(['%', '\\']) {
            self.processor
                .expand(&text, self.resolver, self.depth + 1)
                .map_err(|err| match err {
                    Error::Parse(err) => {
                        Error::Parse(err.relocate(self.call.start..end, &self.input[..end]))
                    }
                    other => other,
                })?
        } else {
            text
        };
        self.call.args.push(value);
        self.call.group_args += 1;
        Ok(())
    }

    fn dispatch(&mut self) -> Result<(), Error> {
        let call = std::mem::take(&mut self.call);
        trace!(
            name = call.name.as_str(),
            args = call.args.len(),
            depth = self.depth;
            "Resolving placeholder"
        );
        let replaced = self
            .resolver
            .resolve(&Call::new(&call.name, &call.raw_args, &call.args))?;
        self.output.push_str(&replaced);
        self.state = State::Literal;
        Ok(())
    }

    fn finish(self) -> Result<String, Error> {
        let span = self.call.start..self.input.len();
        let consumed = self.input.to_string();

        if self.quote.is_some() {
            return Err(ParseError::UnterminatedString { span, consumed }.into());
        }

        match self.state {
            State::Literal => Ok(self.output),
            State::Args => Err(ParseError::UnterminatedArgs {
                name: self.call.name,
                span,
                consumed,
            }
            .into()),
            State::Name | State::AfterArgs => {
                Err(ParseError::UnterminatedPlaceholder { span, consumed }.into())
            }
        }
    }
}
