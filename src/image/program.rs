//! Program files: one binary instruction word per line.

use crate::cpu::memory::{MemoryError, MEMORY_SIZE};
use crate::image::binary::{format_word, parse_word};
use crate::image::{content_lines, LoadError};
use std::io::Write;
use std::path::Path;

/// Instruction words to be placed in memory from address 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramImage {
    pub words: Vec<u16>,
}

impl ProgramImage {
    pub fn new(words: Vec<u16>) -> Self {
        Self { words }
    }

    /// Parse program text.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let words = content_lines(text)
            .map(|(line, digits)| {
                parse_word(digits).map_err(|source| LoadError::Parse { line, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if words.len() > MEMORY_SIZE {
            return Err(LoadError::Memory(MemoryError::ProgramTooLarge {
                size: words.len(),
                available: MEMORY_SIZE,
            }));
        }

        Ok(Self { words })
    }

    /// Load a program file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        Self::parse(&text)
    }

    /// Save as a program file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LoadError> {
        let path = path.as_ref();
        let io_err = |source| LoadError::Io { path: path.to_path_buf(), source };

        let mut file = std::fs::File::create(path).map_err(io_err)?;
        writeln!(file, "; {} words", self.words.len()).map_err(io_err)?;
        for word in &self.words {
            writeln!(file, "{}", format_word(*word)).map_err(io_err)?;
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
