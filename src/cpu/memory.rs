//! Main memory.
//!
//! A flat array of 512 sixteen-bit words. Unused cells hold the [`EMPTY`]
//! sentinel, which doubles as the halt marker for the execution engine.

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// The number of memory cells.
pub const MEMORY_SIZE: usize = 512;

/// Value of a cell that holds neither an instruction nor data.
pub const EMPTY: u16 = 0xFFFF;

/// Main memory: 512 sixteen-bit cells.
///
/// Serializes as a flat list of cells; deserializing rejects any other length.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u16>", into = "Vec<u16>")]
pub struct Memory {
    cells: Vec<u16>,
}

impl Memory {
    /// Create a new memory with every cell set to [`EMPTY`].
    pub fn new() -> Self {
        Self {
            cells: vec![EMPTY; MEMORY_SIZE],
        }
    }

    /// Read a cell by address.
    #[inline]
    pub fn read(&self, addr: usize) -> Result<u16, MemoryError> {
        self.cells
            .get(addr)
            .copied()
            .ok_or(MemoryError::AddressOutOfRange(addr))
    }

    /// Write a cell by address.
    #[inline]
    pub fn write(&mut self, addr: usize, value: u16) -> Result<(), MemoryError> {
        let cell = self.cells
            .get_mut(addr)
            .ok_or(MemoryError::AddressOutOfRange(addr))?;
        *cell = value;
        Ok(())
    }

    /// Whether the cell at `addr` holds the sentinel.
    ///
    /// Addresses past the end count as empty.
    pub fn is_empty_at(&self, addr: usize) -> bool {
        self.read(addr).map_or(true, |word| word == EMPTY)
    }

    /// Reset every cell to [`EMPTY`].
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Copy a program into memory starting at the given address.
    pub fn load_program(&mut self, start_addr: usize, program: &[u16]) -> Result<(), MemoryError> {
        if start_addr > MEMORY_SIZE {
            return Err(MemoryError::AddressOutOfRange(start_addr));
        }

        let available = MEMORY_SIZE - start_addr;
        if program.len() > available {
            return Err(MemoryError::ProgramTooLarge {
                size: program.len(),
                available,
            });
        }

        self.cells[start_addr..start_addr + program.len()].copy_from_slice(program);
        Ok(())
    }

    /// Dump memory contents (for debugging).
    pub fn dump(&self, start: usize, count: usize) -> Vec<(usize, u16)> {
        let end = start.saturating_add(count).min(MEMORY_SIZE);
        (start.min(end)..end)
            .map(|i| (i, self.cells[i]))
            .collect()
    }
}

impl TryFrom<Vec<u16>> for Memory {
    type Error = MemoryError;

    fn try_from(cells: Vec<u16>) -> Result<Self, Self::Error> {
        if cells.len() != MEMORY_SIZE {
            return Err(MemoryError::SizeMismatch(cells.len()));
        }
        Ok(Self { cells })
    }
}

impl From<Memory> for Vec<u16> {
    fn from(mem: Memory) -> Self {
        mem.cells
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only count cells that were loaded or written
        let used = self.cells
            .iter()
            .filter(|&&cell| cell != EMPTY)
            .count();

        f.debug_struct("Memory")
            .field("used_cells", &used)
            .field("total_cells", &MEMORY_SIZE)
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Address is outside valid memory range.
    #[error("memory address {0} out of range (0-{})", MEMORY_SIZE - 1)]
    AddressOutOfRange(usize),

    /// Program is too large to fit in memory.
    #[error("program size {size} exceeds available space {available}")]
    ProgramTooLarge { size: usize, available: usize },

    /// A memory image with the wrong number of cells.
    #[error("memory image has {0} cells, expected {}", MEMORY_SIZE)]
    SizeMismatch(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_starts_empty() {
        let mem = Memory::new();
        let cells = mem.dump(0, MEMORY_SIZE);
        assert_eq!(cells.len(), MEMORY_SIZE);
        assert!(cells.iter().all(|&(_, cell)| cell == EMPTY));
    }

    #[test]
    fn test_memory_read_write() {
        let mut mem = Memory::new();
        mem.write(10, 42).unwrap();
        assert_eq!(mem.read(10), Ok(42));
        assert!(!mem.is_empty_at(10));
        assert!(mem.is_empty_at(11));
    }

    #[test]
    fn test_memory_bounds() {
        let mut mem = Memory::new();

        assert!(mem.read(0).is_ok());
        assert!(mem.read(MEMORY_SIZE - 1).is_ok());

        assert_eq!(mem.read(MEMORY_SIZE), Err(MemoryError::AddressOutOfRange(MEMORY_SIZE)));
        assert_eq!(mem.write(MEMORY_SIZE, 1), Err(MemoryError::AddressOutOfRange(MEMORY_SIZE)));
        assert!(mem.is_empty_at(MEMORY_SIZE));
    }

    #[test]
    fn test_load_program() {
        let mut mem = Memory::new();
        mem.load_program(0, &[1, 2, 3]).unwrap();

        assert_eq!(mem.read(0), Ok(1));
        assert_eq!(mem.read(1), Ok(2));
        assert_eq!(mem.read(2), Ok(3));
        assert_eq!(mem.read(3), Ok(EMPTY));
    }

    #[test]
    fn test_load_program_too_large() {
        let mut mem = Memory::new();
        let program = vec![0u16; MEMORY_SIZE + 1];

        let err = mem.load_program(0, &program).unwrap_err();
        assert_eq!(err, MemoryError::ProgramTooLarge { size: MEMORY_SIZE + 1, available: MEMORY_SIZE });

        // A full-size program fits exactly
        mem.load_program(0, &program[..MEMORY_SIZE]).unwrap();
    }

    #[test]
    fn test_clear_and_dump() {
        let mut mem = Memory::new();
        mem.write(5, 9).unwrap();
        assert_eq!(mem.dump(4, 3), vec![(4, EMPTY), (5, 9), (6, EMPTY)]);
        assert_eq!(mem.dump(MEMORY_SIZE - 1, 10).len(), 1);

        mem.clear();
        assert_eq!(mem.read(5), Ok(EMPTY));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut mem = Memory::new();
        mem.load_program(0, &[0x0291, 0xA850]).unwrap();

        let json = serde_json::to_string(&mem).unwrap();
        let restored: Memory = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, mem);
    }

    #[test]
    fn test_deserialize_rejects_wrong_size() {
        assert!(serde_json::from_str::<Memory>("[1,2]").is_err());

        let too_long = serde_json::to_string(&vec![0u16; MEMORY_SIZE + 1]).unwrap();
        assert!(serde_json::from_str::<Memory>(&too_long).is_err());

        assert_eq!(Memory::try_from(vec![7u16; 3]), Err(MemoryError::SizeMismatch(3)));
    }
}
