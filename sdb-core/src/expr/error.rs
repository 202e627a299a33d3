//! Expression error types

use thiserror::Error;

/// Errors raised while splitting expression text into tokens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("No match at position {position}: '{remaining}'")]
    NoMatch { position: usize, remaining: String },

    #[error("Too many tokens: expression exceeds the limit of {limit}")]
    TooManyTokens { limit: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),

    // Structural errors
    #[error("Empty expression")]
    EmptyRange,

    #[error("Token '{text}' is not a value")]
    NotAValue { text: String },

    #[error("No operator found")]
    NoOperator,

    #[error("Unbalanced parentheses")]
    UnbalancedParens,

    #[error("Operator '{op}' cannot be applied as a unary operator")]
    InvalidUnaryOp { op: String },

    #[error("Operator '{op}' cannot be applied as a binary operator")]
    InvalidBinaryOp { op: String },

    #[error("Expression nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("Invalid integer literal: '{text}'")]
    InvalidLiteral { text: String },

    // Target errors
    #[error("Unknown register: '${name}'")]
    UnknownRegister { name: String },

    #[error("Cannot read memory at 0x{address:x}")]
    BadAddress { address: u64 },

    #[error("Division by zero")]
    DivisionByZero,
}

impl EvalError {
    pub fn not_a_value(text: impl Into<String>) -> Self {
        EvalError::NotAValue { text: text.into() }
    }

    pub fn unknown_register(name: impl Into<String>) -> Self {
        EvalError::UnknownRegister { name: name.into() }
    }

    pub fn invalid_literal(text: impl Into<String>) -> Self {
        EvalError::InvalidLiteral { text: text.into() }
    }
}
