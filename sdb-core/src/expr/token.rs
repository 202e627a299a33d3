//! Token definitions for debugger expressions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every lexical class the expression language knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    // Operands
    Decimal,  // 42
    Hex,      // 0x2a
    Register, // $pc

    // Arithmetic
    Plus,  // +
    Minus, // binary -
    Star,  // binary *
    Slash, // /

    // Grouping
    LParen, // (
    RParen, // )

    // Comparison
    Eq,  // ==
    Neq, // !=
    Gt,  // >
    Lt,  // <
    Ge,  // >=
    Le,  // <=

    // Logical
    And, // &&
    Or,  // ||

    // Unary forms of - and *
    Neg,   // -
    Deref, // *
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Decimal => "decimal",
            TokenKind::Hex => "hex",
            TokenKind::Register => "register",
            TokenKind::Plus => "+",
            TokenKind::Minus | TokenKind::Neg => "-",
            TokenKind::Star | TokenKind::Deref => "*",
            TokenKind::Slash => "/",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Eq => "==",
            TokenKind::Neq => "!=",
            TokenKind::Gt => ">",
            TokenKind::Lt => "<",
            TokenKind::Ge => ">=",
            TokenKind::Le => "<=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
        }
    }

    /// Literal and register tokens, which evaluate to a value on their own
    pub fn is_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Decimal | TokenKind::Hex | TokenKind::Register
        )
    }

    /// Tokens after which `-` and `*` are binary operators
    pub fn ends_value(&self) -> bool {
        self.is_operand() || *self == TokenKind::RParen
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, TokenKind::Neg | TokenKind::Deref)
    }

    /// Binding rank of an operator; a larger rank binds more loosely.
    ///
    /// Operands and parentheses have no rank.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            TokenKind::Neg | TokenKind::Deref => Some(1),
            TokenKind::And | TokenKind::Or => Some(2),
            TokenKind::Eq
            | TokenKind::Neq
            | TokenKind::Gt
            | TokenKind::Lt
            | TokenKind::Ge
            | TokenKind::Le => Some(3),
            TokenKind::Star | TokenKind::Slash => Some(4),
            TokenKind::Plus | TokenKind::Minus => Some(5),
            TokenKind::Decimal
            | TokenKind::Hex
            | TokenKind::Register
            | TokenKind::LParen
            | TokenKind::RParen => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified slice of the expression text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// Source text; only re-parsed for operand kinds
    pub text: &'src str,
    /// Byte offset into the expression
    pub position: usize,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, position: usize) -> Self {
        Self {
            kind,
            text,
            position,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_operand() {
            f.write_str(self.text)
        } else {
            f.write_str(self.kind.as_str())
        }
    }
}

/// Tokens of one expression, owned by a single evaluation
pub type TokenSequence<'src> = Vec<Token<'src>>;

/// Reconstruct expression text from tokens, one space between each.
pub fn render(tokens: &[Token<'_>]) -> String {
    tokens
        .iter()
        .map(|token| token.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
