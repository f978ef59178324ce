//! Data transfer unit: LOAD and STORE between memory and registers.

use crate::cpu::{Memory, Registers};
use crate::cpu::memory::MEMORY_SIZE;
use crate::cpu::registers::RegisterError;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// A data transfer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferOp {
    /// R[operand1] := M[operand2]
    Load,
    /// M[operand2] := R[operand1]
    Store,
}

impl TransferOp {
    pub const LOAD: u8 = 0b0101;
    pub const STORE: u8 = 0b0110;

    /// Look up the operation for a 4-bit opcode.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            Self::LOAD => Some(TransferOp::Load),
            Self::STORE => Some(TransferOp::Store),
            _ => None,
        }
    }

    /// The 4-bit opcode for this operation.
    pub fn opcode(self) -> u8 {
        match self {
            TransferOp::Load => Self::LOAD,
            TransferOp::Store => Self::STORE,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            TransferOp::Load => "LOAD",
            TransferOp::Store => "STORE",
        }
    }
}

/// Execute one data transfer.
///
/// The address is checked first, then the opcode. Nothing is written unless
/// every check passes.
pub fn execute(
    mem: &mut Memory,
    regs: &mut Registers,
    opcode: u8,
    register: usize,
    address: usize,
) -> Result<TransferOp, TransferError> {
    if address >= MEMORY_SIZE {
        return Err(TransferError::AddressOutOfBounds(address));
    }

    let op = TransferOp::from_opcode(opcode)
        .ok_or(TransferError::InvalidOpcode(opcode))?;

    match op {
        TransferOp::Load => {
            let value = mem.read(address)
                .map_err(|_| TransferError::AddressOutOfBounds(address))?;
            regs.write(register, value)?;
        }
        TransferOp::Store => {
            let value = regs.read(register)?;
            mem.write(address, value)
                .map_err(|_| TransferError::AddressOutOfBounds(address))?;
        }
    }

    Ok(op)
}

/// Faults raised by the data transfer unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("memory address {0} exceeds memory size {}", MEMORY_SIZE)]
    AddressOutOfBounds(usize),

    #[error("T-bit is 1 but opcode {0:#06b} is not a data transfer operation")]
    InvalidOpcode(u8),

    #[error(transparent)]
    Register(#[from] RegisterError),
}
