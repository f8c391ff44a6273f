//! Machine configuration.

use crate::cpu_6502::Cpu6502;
use crate::memory::{MemoryError, DEFAULT_MEMORY_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid machine: {0}")]
    Memory(#[from] MemoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Address space size in bytes (1..=65536)
    pub memory_size: usize,
    /// Program counter before the first step
    pub initial_pc: u16,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            initial_pc: 0,
        }
    }
}

impl MachineConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Build a CPU with zeroed memory and a fresh clock.
    pub fn build(&self) -> Result<Cpu6502, ConfigError> {
        Cpu6502::with_config(self)
    }
}
