//! Recursive-descent parser from tokens to an [`Expr`] tree.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! Or      := And ( "OR" And )*
//! And     := Primary ( "AND" Primary | Primary )*     -- adjacency is AND
//! Primary := "(" Or ")"?  |  "NOT" Term  |  Term
//! Term    := Word | Quoted
//! ```
//!
//! The parser is lenient about shape: a missing `)` closes at end of input,
//! a stray `)` at top level is dropped, and a bare `+`/`-` between terms is
//! ignored. Hard failures are a missing term where one is required and
//! groups nested deeper than [`MAX_NESTING_DEPTH`].

use crate::error::ParseError;
use crate::expr::{Condition, Expr, Polarity};
use crate::op::LogicalOp;
use crate::token::{Token, TokenKind};

/// Deepest accepted `(` nesting. Recursion depth is proportional to it.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parses a token stream into an expression tree.
pub fn parse(tokens: &[Token]) -> Result<Expr, ParseError> {
    Parser::new(tokens).parse()
}

/// Parser state: the token slice and a cursor into it.
///
/// Each call to [`parse`] owns a fresh parser, so parsing is re-entrant.
#[derive(Debug)]
pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Consumes the whole token stream.
    pub fn parse(mut self) -> Result<Expr, ParseError> {
        let mut parts = vec![self.parse_or()?];
        while let Some(token) = self.peek() {
            if token.is_close_paren() {
                self.pos += 1;
                continue;
            }
            parts.push(self.parse_or()?);
        }
        Ok(Expr::and(parts))
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    /// The connective named by the next token, if it is `AND` or `OR`.
    fn peek_connective(&self) -> Option<LogicalOp> {
        self.peek()
            .filter(|t| t.kind == TokenKind::Operator)
            .and_then(|t| LogicalOp::from_keyword(&t.text))
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut children = vec![self.parse_and()?];
        while self.peek_connective() == Some(LogicalOp::Or) {
            self.pos += 1;
            children.push(self.parse_and()?);
        }
        Ok(Expr::group(LogicalOp::Or, children))
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut children = vec![self.parse_primary()?];
        while let Some(token) = self.peek() {
            let connective = self.peek_connective();
            if connective == Some(LogicalOp::And) {
                self.pos += 1;
                children.push(self.parse_primary()?);
            } else if connective == Some(LogicalOp::Or) || token.is_close_paren() {
                break;
            } else if token.kind == TokenKind::Modifier {
                self.pos += 1;
            } else {
                // Term, "(" or NOT: implicit AND
                children.push(self.parse_primary()?);
            }
        }
        Ok(Expr::group(LogicalOp::And, children))
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.peek() else {
            return Err(ParseError::new(self.pos, "unexpected end of expression"));
        };

        if token.is_open_paren() {
            if self.depth >= MAX_NESTING_DEPTH {
                return Err(ParseError::new(
                    self.pos,
                    format!("groups nested deeper than {MAX_NESTING_DEPTH}"),
                ));
            }
            self.pos += 1;
            self.depth += 1;
            let inner = self.parse_or();
            self.depth -= 1;
            let inner = inner?;
            if self.peek().is_some_and(Token::is_close_paren) {
                self.pos += 1;
            }
            return Ok(inner);
        }

        if token.is_operator("NOT") {
            self.pos += 1;
            return match self.peek() {
                Some(next) if next.is_term() => {
                    self.pos += 1;
                    Ok(term_condition(next).excluded().into())
                }
                _ => Err(ParseError::new(self.pos, "expected term after NOT")),
            };
        }

        if token.is_term() {
            self.pos += 1;
            return Ok(term_condition(token).into());
        }

        Err(ParseError::new(
            self.pos,
            format!("unexpected token '{}'", token.text),
        ))
    }
}

/// Builds a condition from a word or phrase token.
///
/// A leading sigil is split off words only; quoted phrases are literal.
fn term_condition(token: &Token) -> Condition {
    if token.kind == TokenKind::Quoted {
        return Condition::phrase(token.text.as_str());
    }

    let text = token.text.as_str();
    let (polarity, rest) = if let Some(rest) = text.strip_prefix('+') {
        (Polarity::Required, rest)
    } else if let Some(rest) = text.strip_prefix('-') {
        (Polarity::Excluded, rest)
    } else {
        (Polarity::Neutral, text)
    };

    if rest.is_empty() {
        return Condition::term(text);
    }
    Condition::term(rest).with_polarity(polarity)
}
