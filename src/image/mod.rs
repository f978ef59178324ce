//! Program and data files.
//!
//! Both formats are plain text, one binary number per line. Blank lines and
//! lines starting with `;` or `#` are ignored.

pub mod binary;
pub mod program;
pub mod data;

pub use binary::{format_word, parse_word, ParseError};
pub use program::ProgramImage;
pub use data::{DataEntry, DataImage};

use crate::cpu::{Cpu, MemoryError, MEMORY_SIZE};
use log::debug;
use std::path::PathBuf;
use thiserror::Error;

/// Build a CPU with the program at address 0 and the data cells applied on top.
pub fn boot(program: &ProgramImage, data: &DataImage) -> Result<Cpu, LoadError> {
    let mut cpu = Cpu::new();
    cpu.load_program(&program.words)?;
    data.apply(&mut cpu.mem)?;

    debug!("loaded {} program words and {} data cells", program.len(), data.len());
    Ok(cpu)
}

/// Non-blank, non-comment lines with their 1-based line numbers.
///
/// A bare carriage return also ends a line.
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .flat_map(|(index, line)| line.split('\r').map(move |part| (index + 1, part.trim())))
        .filter(|(_, part)| !part.is_empty() && !part.starts_with(';') && !part.starts_with('#'))
}

/// Errors that can occur while loading program or data files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("line {line}: malformed data entry {text:?}, expected `<4-digit address> <value>`")]
    MalformedData { line: usize, text: String },

    #[error("line {line}: memory address {address} exceeds memory size {}", MEMORY_SIZE)]
    AddressOutOfRange { line: usize, address: usize },

    #[error(transparent)]
    Memory(#[from] MemoryError),
}
