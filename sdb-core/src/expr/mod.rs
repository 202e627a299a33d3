//! Expression evaluation module
//!
//! Lexes and evaluates debugger expressions over machine words.

pub mod error;
pub mod eval;
pub mod lexer;
pub mod token;
pub mod value;


pub use error::{EvalError, LexError};
pub use eval::{evaluate_expression, Evaluator};
pub use lexer::{tokenize, tokenize_with_limit};
pub use token::{render, Token, TokenKind, TokenSequence};
pub use value::{EvalConfig, Word, WordWidth, DEFAULT_MAX_DEPTH};
