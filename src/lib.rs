//! # binproc
//!
//! An emulator for a minimal 16-bit fixed-point processor.
//!
//! A program of binary instruction words and a set of initial data cells are
//! loaded into 512 words of memory. The CPU then fetches, decodes and
//! executes instructions against eight registers until it reaches an empty
//! cell, runs off the end of memory, or faults.

pub mod cpu;
pub mod image;
pub mod report;
pub mod disasm;

// Re-export commonly used types
pub use cpu::{Cpu, CpuState, CpuError, Memory, Registers, Instruction, EMPTY, MEMORY_SIZE, REGISTER_COUNT};
pub use image::{boot, DataImage, LoadError, ProgramImage};
pub use report::RegisterReport;
pub use disasm::{disassemble, disassemble_word};
