//! sdb Core Library
//!
//! Core functionality for the simple debugger's expression command:
//! - Expression lexing with context-sensitive `-` / `*`
//! - Precedence-driven evaluation over machine words
//! - Register and memory capabilities, plus a serializable machine snapshot
//! - JSON-RPC protocol types for `sdb-server`

pub mod expr;
pub mod machine;
pub mod protocol;

pub use expr::{evaluate_expression, tokenize, EvalConfig, EvalError, Evaluator, Word, WordWidth};
pub use machine::{Memory, Registers, Snapshot};
pub use protocol::{Request, Response};
