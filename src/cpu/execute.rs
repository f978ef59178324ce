//! CPU execution engine.
//!
//! Implements the fetch-decode-execute cycle. Execution stops normally when
//! the program counter reaches an [`EMPTY`] cell or runs off the end of
//! memory, and abnormally on the first fault.

use crate::cpu::{Memory, Registers};
use crate::cpu::alu::{self, AluError};
use crate::cpu::decode::{self, InstrClass, Instruction};
use crate::cpu::memory::{MemoryError, EMPTY};
use crate::cpu::transfer::{self, TransferError};
use crate::report::RegisterReport;
use log::{debug, trace, warn};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// CPU is running normally.
    Running,
    /// Reached an empty cell or the end of memory.
    Halted,
    /// An instruction faulted. Terminal.
    Faulted,
}

/// The processor: memory, registers and program counter.
#[derive(Clone, Serialize, Deserialize)]
pub struct Cpu {
    /// General-purpose registers.
    pub regs: Registers,
    /// Main memory.
    pub mem: Memory,
    /// Address of the next instruction.
    pub pc: usize,
    /// Current execution state.
    pub state: CpuState,
    /// Instructions executed so far.
    pub cycles: u64,
}

impl Cpu {
    /// Create a new CPU with empty memory and zeroed registers.
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            pc: 0,
            state: CpuState::Running,
            cycles: 0,
        }
    }

    /// Reset the CPU to its initial state.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.mem.clear();
        self.pc = 0;
        self.state = CpuState::Running;
        self.cycles = 0;
    }

    /// Load a program into memory at address 0.
    pub fn load_program(&mut self, program: &[u16]) -> Result<(), MemoryError> {
        self.mem.load_program(0, program)
    }

    /// Execute a single instruction.
    ///
    /// Returns the instruction that was executed, or `None` if the CPU
    /// halted instead.
    pub fn step(&mut self) -> Result<Option<Instruction>, CpuError> {
        if self.state != CpuState::Running {
            return Err(CpuError::NotRunning(self.state));
        }

        // Fetch; past the end of memory counts as empty
        let address = self.pc;
        let raw = match self.mem.read(address) {
            Ok(word) if word != EMPTY => word,
            _ => {
                debug!("halted at {} after {} instructions", address, self.cycles);
                self.state = CpuState::Halted;
                return Ok(None);
            }
        };

        self.pc += 1;

        let instr = decode::decode(raw);
        trace!("{:03}: {:016b} {:?}", address, raw, instr);

        if let Err(err) = self.execute(address, instr) {
            warn!("{}", err);
            self.state = CpuState::Faulted;
            return Err(err);
        }

        self.cycles += 1;

        Ok(Some(instr))
    }

    /// Run until halt or fault.
    ///
    /// Returns the number of instructions executed.
    pub fn run(&mut self) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;

        while self.state == CpuState::Running {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Run for at most `max_cycles` instructions.
    pub fn run_limited(&mut self, max_cycles: u64) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;
        let limit = self.cycles.saturating_add(max_cycles);

        while self.state == CpuState::Running && self.cycles < limit {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Route a decoded instruction to its execution unit.
    fn execute(&mut self, address: usize, instr: Instruction) -> Result<(), CpuError> {
        match instr.class {
            InstrClass::Transfer => {
                transfer::execute(
                    &mut self.mem,
                    &mut self.regs,
                    instr.opcode,
                    instr.operand1 as usize,
                    instr.operand2 as usize,
                )
                .map_err(|source| CpuError::Transfer { address, source })?;
            }
            InstrClass::Alu => {
                alu::execute(
                    &mut self.regs,
                    instr.opcode,
                    instr.immediate,
                    instr.operand1 as usize,
                    instr.operand2,
                    instr.operand3 as usize,
                )
                .map_err(|source| CpuError::Alu { address, source })?;
            }
        }

        Ok(())
    }

    /// Final register contents. Only available once the CPU has halted.
    pub fn report(&self) -> Option<RegisterReport> {
        self.is_halted().then(|| RegisterReport::new(&self.regs, self.cycles))
    }

    /// Check if the CPU is halted.
    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    /// Check if the CPU is running.
    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }

    /// Check if the CPU stopped on a fault.
    pub fn is_faulted(&self) -> bool {
        self.state == CpuState::Faulted
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("state", &self.state)
            .field("pc", &self.pc)
            .field("cycles", &self.cycles)
            .field("regs", &self.regs)
            .finish()
    }
}

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("CPU not running: {0:?}")]
    NotRunning(CpuState),

    #[error("instruction at address {address}: {source}")]
    Transfer {
        address: usize,
        #[source]
        source: TransferError,
    },

    #[error("instruction at address {address}: {source}")]
    Alu {
        address: usize,
        #[source]
        source: AluError,
    },
}

impl CpuError {
    /// Address of the faulting instruction, if the error came from one.
    pub fn address(&self) -> Option<usize> {
        match self {
            CpuError::NotRunning(_) => None,
            CpuError::Transfer { address, .. } | CpuError::Alu { address, .. } => Some(*address),
        }
    }
}
