//! General-purpose register file.
//!
//! Eight sixteen-bit registers, R0 through R7, all zero at power-on.

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// The number of general-purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// The register file.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Registers {
    values: [u16; REGISTER_COUNT],
}

impl Registers {
    /// Create a new register file with all values zeroed.
    pub fn new() -> Self {
        Self { values: [0; REGISTER_COUNT] }
    }

    /// Reset all registers to zero.
    pub fn reset(&mut self) {
        self.values = [0; REGISTER_COUNT];
    }

    /// Read a register by index.
    #[inline]
    pub fn read(&self, index: usize) -> Result<u16, RegisterError> {
        self.values
            .get(index)
            .copied()
            .ok_or(RegisterError::IndexOutOfRange(index))
    }

    /// Write a register by index.
    #[inline]
    pub fn write(&mut self, index: usize, value: u16) -> Result<(), RegisterError> {
        let reg = self.values
            .get_mut(index)
            .ok_or(RegisterError::IndexOutOfRange(index))?;
        *reg = value;
        Ok(())
    }

    /// Iterate over `(index, value)` pairs in register order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u16)> + '_ {
        self.values.iter().copied().enumerate()
    }

    /// All register values in index order.
    pub fn as_array(&self) -> &[u16; REGISTER_COUNT] {
        &self.values
    }
}

/// Errors that can occur when accessing the register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("register index {0} out of range (0-{})", REGISTER_COUNT - 1)]
    IndexOutOfRange(usize),
}
