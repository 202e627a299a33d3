//! Machine word arithmetic
//!
//! Every evaluated value is a signed machine word. Values are kept in an `i64`
//! and re-wrapped to the target width after each operation, so a 4-byte target
//! behaves exactly like 32-bit two's complement arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed machine word produced by evaluation
pub type Word = i64;

/// Native word width of the debugged target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WordWidth {
    /// 32-bit targets (riscv32)
    Four,
    /// 64-bit targets (riscv64)
    #[default]
    Eight,
}

impl WordWidth {
    pub fn bytes(self) -> usize {
        match self {
            WordWidth::Four => 4,
            WordWidth::Eight => 8,
        }
    }

    /// Truncate a value to this width and sign-extend it back.
    pub fn wrap(self, value: i64) -> Word {
        match self {
            WordWidth::Four => value as i32 as i64,
            WordWidth::Eight => value,
        }
    }

    /// Interpret raw bits (from a literal, register or memory) as a word.
    pub fn from_bits(self, bits: u64) -> Word {
        match self {
            WordWidth::Four => bits as u32 as i32 as i64,
            WordWidth::Eight => bits as i64,
        }
    }

    /// Reinterpret a word as an unsigned address of this width.
    pub fn to_bits(self, value: Word) -> u64 {
        match self {
            WordWidth::Four => value as u32 as u64,
            WordWidth::Eight => value as u64,
        }
    }

    /// Render a word in zero-padded hexadecimal, like `0x0000002a`.
    pub fn hex(self, value: Word) -> String {
        format!("{:#0w$x}", self.to_bits(value), w = self.bytes() * 2 + 2)
    }
}

impl TryFrom<u8> for WordWidth {
    type Error = String;

    fn try_from(bytes: u8) -> Result<Self, Self::Error> {
        match bytes {
            4 => Ok(WordWidth::Four),
            8 => Ok(WordWidth::Eight),
            other => Err(format!("unsupported word width: {} (expected 4 or 8)", other)),
        }
    }
}

impl From<WordWidth> for u8 {
    fn from(width: WordWidth) -> Self {
        width.bytes() as u8
    }
}

impl fmt::Display for WordWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-byte", self.bytes())
    }
}

/// Nesting depth allowed before evaluation fails with `TooDeep`
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Evaluation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Width of words read from registers and memory
    pub word_width: WordWidth,
    /// Maximum number of tokens per expression; `None` is unlimited
    pub max_tokens: Option<usize>,
    /// Maximum evaluation recursion depth
    pub max_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self::new(WordWidth::default())
    }
}

impl EvalConfig {
    pub fn new(word_width: WordWidth) -> Self {
        Self {
            word_width,
            max_tokens: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_tokens(mut self, limit: usize) -> Self {
        self.max_tokens = Some(limit);
        self
    }
}
