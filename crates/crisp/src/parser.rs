//! Syntax analysis: tokens to `Value` forms

use std::vec::IntoIter;

use tracing::trace;

use crate::error::{ParseError, SourceLocation};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::value::Value;

/// Deepest nesting of lists and quotes the reader accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parse exactly one form from `program`.
///
/// Empty input (or input holding only comments) parses to `Value::Void`.
/// Anything after the first complete form is an error.
pub fn parse(program: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(tokenize(program)?);

    let form = match parser.next_form()? {
        Some(form) => form,
        None => return Ok(Value::Void),
    };

    if let Some(extra) = parser.tokens.next() {
        return Err(
            ParseError::new(format!("unexpected `{}` after complete form", extra.kind))
                .with_location(extra.location),
        );
    }

    trace!(form = ?form, "parsed form");
    Ok(form)
}

/// Parse every top-level form in `program`, in source order.
pub fn parse_program(program: &str) -> Result<Vec<Value>, ParseError> {
    let mut parser = Parser::new(tokenize(program)?);
    let mut forms = Vec::new();

    while let Some(form) = parser.next_form()? {
        forms.push(form);
    }

    trace!(count = forms.len(), "parsed program");
    Ok(forms)
}

struct Parser {
    tokens: IntoIter<Token>,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            depth: 0,
        }
    }

    /// Run `read` one nesting level deeper, refusing past the limit.
    fn nested<T>(
        &mut self,
        at: SourceLocation,
        read: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::new(format!(
                "nesting too deep (more than {} levels)",
                MAX_NESTING_DEPTH
            ))
            .with_location(at));
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    /// Read the next complete form, or `None` at end of input.
    fn next_form(&mut self) -> Result<Option<Value>, ParseError> {
        match self.tokens.next() {
            Some(token) => self.form_from(token).map(Some),
            None => Ok(None),
        }
    }

    fn form_from(&mut self, token: Token) -> Result<Value, ParseError> {
        match token.kind {
            TokenKind::LParen => {
                let open = token.location;
                self.nested(open, |parser| parser.parse_list(open))
            }
            TokenKind::RParen => {
                Err(ParseError::new("unexpected `)`").with_location(token.location))
            }
            TokenKind::Quote => match self.nested(token.location, Self::next_form)? {
                Some(quoted) => Ok(Value::list(vec![Value::symbol("quote"), quoted])),
                None => Err(ParseError::new("expected a form after `'`")
                    .with_location(token.location)),
            },
            TokenKind::Integer(n) => Ok(Value::Integer(n)),
            TokenKind::Float(n) => Ok(Value::Float(n)),
            TokenKind::Bool(b) => Ok(Value::Bool(b)),
            TokenKind::Str(s) => Ok(Value::string(s)),
            TokenKind::Symbol(s) => Ok(Value::symbol(s)),
        }
    }

    /// Parse list items up to the matching `)`; the `(` is already consumed.
    fn parse_list(&mut self, open: SourceLocation) -> Result<Value, ParseError> {
        let mut items = Vec::new();

        loop {
            let token = self.tokens.next().ok_or_else(|| {
                ParseError::new("missing closing `)`").with_location(open)
            })?;

            if token.kind == TokenKind::RParen {
                return Ok(Value::list(items));
            }
            items.push(self.form_from(token)?);
        }
    }
}
