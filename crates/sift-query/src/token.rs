//! Tokenizer for search expressions.
//!
//! Scans a query into a flat list of [`Token`]s. Scanning never fails:
//! unknown punctuation is skipped and an unterminated quote degrades to a
//! word holding the rest of the input.
//!
//! | Input | Token |
//! |-------|-------|
//! | `"customer service"` | `Quoted("customer service")` |
//! | `(` / `)` | `Paren` |
//! | `+urgent`, `-draft` | `Word("+urgent")`, `Word("-draft")` (sigil kept) |
//! | bare `+` / `-` | `Modifier` |
//! | `and`, `Or`, `NOT` | `Operator("AND")`, `Operator("OR")`, `Operator("NOT")` |
//! | `Sales_2024` | `Word("Sales_2024")` |

use serde::Serialize;

/// Reserved words, compared case-insensitively.
const OPERATORS: &[&str] = &["AND", "OR", "NOT"];

/// Kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Bare word, possibly with a fused `+`/`-` sigil.
    Word,
    /// Double-quoted exact phrase (quotes stripped).
    Quoted,
    /// `AND`, `OR` or `NOT`, upper-cased.
    Operator,
    /// `(` or `)`.
    Paren,
    /// A `+` or `-` not attached to a word.
    Modifier,
}

/// A single scanned token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Word, text)
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Quoted, text)
    }

    pub fn operator(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Operator, text)
    }

    pub fn paren(c: char) -> Self {
        Token::new(TokenKind::Paren, c)
    }

    /// Returns `true` if this token is the operator keyword `op`.
    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    pub fn is_open_paren(&self) -> bool {
        self.kind == TokenKind::Paren && self.text == "("
    }

    pub fn is_close_paren(&self) -> bool {
        self.kind == TokenKind::Paren && self.text == ")"
    }

    /// Returns `true` for tokens that become a condition (words and phrases).
    pub fn is_term(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::Quoted)
    }
}

/// Scans `input` into tokens.
pub fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input).collect()
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte length of the identifier run at the start of `s`.
fn ident_run_len(s: &str) -> usize {
    s.char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Streaming tokenizer over a query string.
///
/// Looks at most one character past the current position.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// An unterminated quote yields the rest of the input as a word, even
    /// when that rest is blank.
    fn scan_quoted(&mut self, rest: &'a str) -> Token {
        let body = &rest[1..];
        match body.find('"') {
            Some(end) => {
                self.pos += end + 2;
                Token::quoted(&body[..end])
            }
            None => {
                self.pos = self.input.len();
                tracing::debug!(text = body, "unterminated quote, treating remainder as a word");
                Token::word(body)
            }
        }
    }

    fn scan_sigil(&mut self, rest: &'a str, sigil: char) -> Token {
        let run = ident_run_len(&rest[1..]);
        if run > 0 {
            self.pos += 1 + run;
            Token::word(&rest[..1 + run])
        } else {
            self.pos += 1;
            Token::new(TokenKind::Modifier, sigil)
        }
    }

    fn scan_identifier(&mut self, rest: &'a str) -> Token {
        let run = ident_run_len(rest);
        let text = &rest[..run];
        self.pos += run;

        match OPERATORS.iter().find(|op| text.eq_ignore_ascii_case(op)) {
            Some(op) => Token::operator(*op),
            None => Token::word(text),
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let input = self.input;
        loop {
            let rest = &input[self.pos..];
            let c = rest.chars().next()?;

            match c {
                '"' => return Some(self.scan_quoted(rest)),
                '(' | ')' => {
                    self.pos += 1;
                    return Some(Token::paren(c));
                }
                '+' | '-' => return Some(self.scan_sigil(rest, c)),
                c if is_ident_char(c) => return Some(self.scan_identifier(rest)),
                // Whitespace and unrecognised punctuation
                _ => self.pos += c.len_utf8(),
            }
        }
    }
}
