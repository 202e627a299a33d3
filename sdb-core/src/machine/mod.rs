//! Target machine capabilities
//!
//! The evaluator never owns machine state. It reads registers and memory
//! through the [`Registers`] and [`Memory`] traits, which the debugger
//! implements on top of its CPU model. [`Snapshot`] is a frozen, serializable
//! machine image implementing both, used by the server and by tests.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::expr::{EvalConfig, Evaluator, WordWidth};

/// Register name to value resolution
pub trait Registers {
    /// Look up a register by name, without the `$` sigil.
    fn resolve(&self, name: &str) -> Option<u64>;
}

/// Virtual memory read access
pub trait Memory {
    /// Read one little-endian word of `width` bytes at `address`.
    ///
    /// Returns `None` when any byte of the word is unmapped.
    fn read(&self, address: u64, width: WordWidth) -> Option<u64>;
}

/// A contiguous block of mapped memory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRegion {
    pub base: u64,
    #[serde(default)]
    pub bytes: Vec<u8>,
}

impl MemoryRegion {
    pub fn new(base: u64, bytes: Vec<u8>) -> Self {
        Self { base, bytes }
    }

    fn slice(&self, address: u64, len: usize) -> Option<&[u8]> {
        let offset = usize::try_from(address.checked_sub(self.base)?).ok()?;
        self.bytes.get(offset..offset.checked_add(len)?)
    }
}

/// Frozen machine state: registers, mapped memory and evaluation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub config: EvalConfig,
    #[serde(default)]
    pub registers: BTreeMap<String, u64>,
    #[serde(default)]
    pub memory: Vec<MemoryRegion>,
}

impl Snapshot {
    pub fn new(config: EvalConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Load a snapshot from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        Self::from_json(&data).with_context(|| format!("Invalid snapshot {}", path.display()))
    }

    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).context("Failed to parse snapshot JSON")
    }

    pub fn with_register(mut self, name: impl Into<String>, value: u64) -> Self {
        self.registers.insert(name.into(), value);
        self
    }

    pub fn with_memory(mut self, base: u64, bytes: Vec<u8>) -> Self {
        self.memory.push(MemoryRegion::new(base, bytes));
        self
    }

    /// Store one word at `address` in a new region.
    pub fn with_word(self, address: u64, value: u64) -> Self {
        let width = self.config.word_width.bytes();
        let bytes = value.to_le_bytes()[..width].to_vec();
        self.with_memory(address, bytes)
    }

    /// An evaluator reading this snapshot under its own configuration
    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::with_config(self, self, self.config)
    }
}

impl Registers for Snapshot {
    fn resolve(&self, name: &str) -> Option<u64> {
        self.registers.get(name).copied()
    }
}

impl Memory for Snapshot {
    fn read(&self, address: u64, width: WordWidth) -> Option<u64> {
        let len = width.bytes();
        // Later regions shadow earlier ones
        let bytes = self
            .memory
            .iter()
            .rev()
            .find_map(|region| region.slice(address, len))?;
        let mut word = [0u8; 8];
        word[..len].copy_from_slice(bytes);
        Some(u64::from_le_bytes(word))
    }
}
