//! CPU emulation.
//!
//! This module implements the complete processor:
//! - 512 sixteen-bit memory cells, unused ones holding the `0xFFFF` sentinel
//! - 8 sixteen-bit general-purpose registers
//! - 7 instructions: LOAD/STORE and the five ALU operations

pub mod memory;
pub mod registers;
pub mod decode;
pub mod transfer;
pub mod alu;
pub mod execute;

pub use memory::{Memory, MemoryError, EMPTY, MEMORY_SIZE};
pub use registers::{Registers, RegisterError, REGISTER_COUNT};
pub use decode::{decode, encode, Instruction, InstrClass};
pub use transfer::{TransferOp, TransferError};
pub use alu::{AluOp, AluError};
pub use execute::{Cpu, CpuError, CpuState};
