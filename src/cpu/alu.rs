//! Arithmetic-logical unit.
//!
//! Operand wiring is asymmetric and easy to get backwards:
//! - the first source comes from `operand2`, either as an immediate (I=1)
//!   or as a register index (I=0)
//! - the second source is always the register named by `operand3`
//! - the result lands in the register named by `operand1`

use crate::cpu::Registers;
use crate::cpu::registers::{RegisterError, REGISTER_COUNT};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// An ALU operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AluOp {
    Add,
    Sub,
    And,
    Or,
    Xor,
}

impl AluOp {
    pub const ADD: u8 = 0b0000;
    pub const SUB: u8 = 0b0001;
    pub const AND: u8 = 0b0010;
    pub const OR: u8 = 0b0011;
    pub const XOR: u8 = 0b0100;

    /// All operations in opcode order.
    pub const ALL: [AluOp; 5] = [AluOp::Add, AluOp::Sub, AluOp::And, AluOp::Or, AluOp::Xor];

    /// Look up the operation for a 4-bit opcode.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            Self::ADD => Some(AluOp::Add),
            Self::SUB => Some(AluOp::Sub),
            Self::AND => Some(AluOp::And),
            Self::OR => Some(AluOp::Or),
            Self::XOR => Some(AluOp::Xor),
            _ => None,
        }
    }

    /// The 4-bit opcode for this operation.
    pub fn opcode(self) -> u8 {
        match self {
            AluOp::Add => Self::ADD,
            AluOp::Sub => Self::SUB,
            AluOp::And => Self::AND,
            AluOp::Or => Self::OR,
            AluOp::Xor => Self::XOR,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Sub => "SUB",
            AluOp::And => "AND",
            AluOp::Or => "OR",
            AluOp::Xor => "XOR",
        }
    }

    /// Apply the operation. ADD and SUB wrap at 16 bits.
    #[inline]
    pub fn apply(self, first: u16, second: u16) -> u16 {
        match self {
            AluOp::Add => first.wrapping_add(second),
            AluOp::Sub => first.wrapping_sub(second),
            AluOp::And => first & second,
            AluOp::Or => first | second,
            AluOp::Xor => first ^ second,
        }
    }
}

/// Execute one ALU instruction and return the operation and its result.
///
/// Operands are resolved before the opcode is checked, so a bad register
/// index is reported even when the opcode is also invalid.
pub fn execute(
    regs: &mut Registers,
    opcode: u8,
    immediate: bool,
    dest: usize,
    operand2: u8,
    operand3: usize,
) -> Result<(AluOp, u16), AluError> {
    let second = regs.read(operand3)?;

    let first = if immediate {
        operand2 as u16
    } else {
        let index = operand2 as usize;
        if index >= REGISTER_COUNT {
            return Err(AluError::RegisterOutOfBounds(operand2));
        }
        regs.read(index)?
    };

    let op = AluOp::from_opcode(opcode)
        .ok_or(AluError::InvalidOpcode(opcode))?;

    let result = op.apply(first, second);
    regs.write(dest, result)?;

    Ok((op, result))
}

/// Faults raised by the ALU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AluError {
    #[error("register index (operand 2) {0} is out of bounds")]
    RegisterOutOfBounds(u8),

    #[error("T-bit is 0 but opcode {0:#06b} is not an ALU operation")]
    InvalidOpcode(u8),

    #[error(transparent)]
    Register(#[from] RegisterError),
}
