//! JSON-RPC Protocol definitions
//!
//! Defines the communication protocol between a debugger front end and sdb-server.

use crate::expr::{Token, TokenKind, Word, WordWidth};
use crate::machine::Snapshot;
use serde::{Deserialize, Serialize};

/// Request from the front end to sdb-server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum Request {
    /// Replace the machine image expressions are evaluated against
    #[serde(rename = "load")]
    Load { snapshot: Snapshot },

    /// Evaluate an expression
    #[serde(rename = "eval")]
    Eval { expr: String },

    /// Tokenize an expression without evaluating it
    #[serde(rename = "tokenize")]
    Tokenize { expr: String },

    /// Shutdown the server
    #[serde(rename = "shutdown")]
    Shutdown,
}

/// One lexed token, as reported to the front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl From<&Token<'_>> for TokenInfo {
    fn from(token: &Token<'_>) -> Self {
        Self {
            kind: token.kind,
            text: token.text.to_string(),
            position: token.position,
        }
    }
}

/// Response from sdb-server to the front end
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    EvalResult { value: Word, hex: String },
    Tokens { tokens: Vec<TokenInfo> },
    Success { ok: bool },
    Error { error: String },
}

impl Response {
    pub fn success() -> Self {
        Response::Success { ok: true }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Response::Error { error: msg.into() }
    }

    pub fn eval_result(value: Word, width: WordWidth) -> Self {
        Response::EvalResult {
            value,
            hex: width.hex(value),
        }
    }

    pub fn tokens(tokens: &[Token<'_>]) -> Self {
        Response::Tokens {
            tokens: tokens.iter().map(TokenInfo::from).collect(),
        }
    }
}

/// JSON-RPC message wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcMessage<T> {
    pub jsonrpc: String,
    pub id: Option<u64>,
    #[serde(flatten)]
    pub content: T,
}

impl<T> RpcMessage<T> {
    pub fn new(id: u64, content: T) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(id),
            content,
        }
    }
}
