//! Lexical analysis: source text to tokens

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::{ParseError, SourceLocation};

/// The kind of a lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `'` quote shorthand
    Quote,
    /// Integer literal
    Integer(i64),
    /// Float literal
    Float(f64),
    /// `true` or `false`
    Bool(bool),
    /// String literal, escapes already resolved
    Str(String),
    /// Any other word
    Symbol(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Quote => write!(f, "'"),
            TokenKind::Integer(n) => write!(f, "{}", n),
            TokenKind::Float(n) => write!(f, "{:?}", n),
            TokenKind::Bool(b) => write!(f, "{}", b),
            TokenKind::Str(s) => write!(f, "{:?}", s),
            TokenKind::Symbol(s) => write!(f, "{}", s),
        }
    }
}

/// A token together with where it starts in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What was scanned
    pub kind: TokenKind,

    /// Line and column of the first character
    pub location: SourceLocation,
}

/// Split `program` into tokens.
///
/// Parentheses always delimit, even without surrounding whitespace, and
/// `;` comments run to the end of the line.
pub fn tokenize(program: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(program).collect()
}

/// Streaming tokenizer that tracks line and column.
struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == ';' {
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn scan_string(&mut self, start: SourceLocation) -> Result<TokenKind, ParseError> {
        // Opening quote
        self.bump();

        let mut value = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(ParseError::new("unterminated string literal").with_location(start))
                }
                Some('"') => return Ok(TokenKind::Str(value)),
                Some('\\') => {
                    let escape_at = self.location();
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some(other) => {
                            return Err(ParseError::new(format!(
                                "unknown escape sequence `\\{}`",
                                other
                            ))
                            .with_location(escape_at))
                        }
                        None => {
                            return Err(
                                ParseError::new("unterminated string literal").with_location(start)
                            )
                        }
                    };
                    value.push(escaped);
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn scan_word(&mut self) -> TokenKind {
        let mut word = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | ';' | '"') {
                break;
            }
            word.push(c);
            self.bump();
        }
        classify_word(word)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_trivia();

        let location = self.location();
        let kind = match *self.chars.peek()? {
            '(' => {
                self.bump();
                TokenKind::LParen
            }
            ')' => {
                self.bump();
                TokenKind::RParen
            }
            '\'' => {
                self.bump();
                TokenKind::Quote
            }
            '"' => match self.scan_string(location) {
                Ok(kind) => kind,
                Err(e) => return Some(Err(e)),
            },
            _ => self.scan_word(),
        };

        Some(Ok(Token { kind, location }))
    }
}

/// Integers first, then floats, then booleans; everything else is a symbol.
fn classify_word(word: String) -> TokenKind {
    if let Ok(n) = word.parse::<i64>() {
        return TokenKind::Integer(n);
    }

    // `f64::from_str` also accepts `inf` and `NaN`; those stay symbols.
    if looks_numeric(&word) {
        if let Ok(n) = word.parse::<f64>() {
            return TokenKind::Float(n);
        }
    }

    match word.as_str() {
        "true" => TokenKind::Bool(true),
        "false" => TokenKind::Bool(false),
        _ => TokenKind::Symbol(word),
    }
}

fn looks_numeric(word: &str) -> bool {
    let digits = word.strip_prefix(['+', '-']).unwrap_or(word);
    let digits = digits.strip_prefix('.').unwrap_or(digits);
    digits.starts_with(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_parens_split_without_whitespace() {
        assert_eq!(
            kinds("(+ 1(f))"),
            vec![
                TokenKind::LParen,
                TokenKind::Symbol("+".to_string()),
                TokenKind::Integer(1),
                TokenKind::LParen,
                TokenKind::Symbol("f".to_string()),
                TokenKind::RParen,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_numbers_and_signs() {
        assert_eq!(
            kinds("-5 - 2.5 -.5 1e3"),
            vec![
                TokenKind::Integer(-5),
                TokenKind::Symbol("-".to_string()),
                TokenKind::Float(2.5),
                TokenKind::Float(-0.5),
                TokenKind::Float(1000.0),
            ]
        );
    }

    #[test]
    fn test_inf_and_nan_are_symbols() {
        assert_eq!(
            kinds("inf NaN"),
            vec![
                TokenKind::Symbol("inf".to_string()),
                TokenKind::Symbol("NaN".to_string()),
            ]
        );
    }

    #[test]
    fn test_booleans() {
        assert_eq!(
            kinds("true false truthy"),
            vec![
                TokenKind::Bool(true),
                TokenKind::Bool(false),
                TokenKind::Symbol("truthy".to_string()),
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\n\"b\"\\""#),
            vec![TokenKind::Str("a\n\"b\"\\".to_string())]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("1 ; ignored (\n2"),
            vec![TokenKind::Integer(1), TokenKind::Integer(2)]
        );
    }

    #[test]
    fn test_quote_token() {
        assert_eq!(
            kinds("'x"),
            vec![TokenKind::Quote, TokenKind::Symbol("x".to_string())]
        );
    }

    #[test]
    fn test_token_locations() {
        let tokens = tokenize("(a\n  b)").unwrap();
        let locations: Vec<_> = tokens
            .iter()
            .map(|t| (t.location.line, t.location.column))
            .collect();
        assert_eq!(locations, vec![(1, 1), (1, 2), (2, 3), (2, 4)]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("  \"abc").unwrap_err();
        assert_eq!(err.location, Some(SourceLocation::new(1, 3)));
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_unknown_escape() {
        let err = tokenize(r#""\q""#).unwrap_err();
        assert!(err.message.contains("\\q"));
    }
}
