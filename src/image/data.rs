//! Data files: initial memory contents.
//!
//! Each line holds a 4-digit binary address, one separator character, and a
//! binary value:
//!
//! ```text
//! 1010 0000000000000111
//! ```

use crate::cpu::memory::Memory;
use crate::image::binary::parse_word;
use crate::image::{content_lines, LoadError};
use std::path::Path;

const ADDRESS_DIGITS: usize = 4;

/// A single memory cell to initialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataEntry {
    /// Source line, 1-based.
    pub line: usize,
    pub address: usize,
    pub value: u16,
}

/// Memory cells to overwrite after the program is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataImage {
    pub entries: Vec<DataEntry>,
}

impl DataImage {
    /// Parse data text. Addresses are range-checked by [`DataImage::apply`].
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let entries = content_lines(text)
            .map(|(line, content)| parse_entry(line, content))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    /// Load a data file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        Self::parse(&text)
    }

    /// Write every entry into memory, in file order.
    pub fn apply(&self, mem: &mut Memory) -> Result<(), LoadError> {
        for entry in &self.entries {
            mem.write(entry.address, entry.value)
                .map_err(|_| LoadError::AddressOutOfRange { line: entry.line, address: entry.address })?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entry(line: usize, content: &str) -> Result<DataEntry, LoadError> {
    let malformed = || LoadError::MalformedData { line, text: content.to_string() };

    // The character between address and value is skipped, whatever it is
    let address_digits = content.get(..ADDRESS_DIGITS).ok_or_else(malformed)?;
    let value_digits = content
        .get(ADDRESS_DIGITS..)
        .and_then(|rest| {
            let mut chars = rest.chars();
            chars.next()?;
            Some(chars.as_str().trim())
        })
        .filter(|rest| !rest.is_empty())
        .ok_or_else(malformed)?;

    let address = parse_word(address_digits)
        .map_err(|source| LoadError::Parse { line, source })? as usize;

    let value = parse_word(value_digits)
        .map_err(|source| LoadError::Parse { line, source })?;

    Ok(DataEntry { line, address, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::memory::{EMPTY, MEMORY_SIZE};
    use crate::image::binary::ParseError;
    use std::io::Write;

    #[test]
    fn test_parse_data() {
        let data = DataImage::parse("1010 0000000000000111\n0011 101\n").unwrap();
        assert_eq!(data.entries, vec![
            DataEntry { line: 1, address: 10, value: 7 },
            DataEntry { line: 2, address: 3, value: 5 },
        ]);
    }

    #[test]
    fn test_any_separator() {
        let data = DataImage::parse("0001:1\n0010,11\n").unwrap();
        assert_eq!(data.entries[0].value, 1);
        assert_eq!(data.entries[1].address, 2);
        assert_eq!(data.entries[1].value, 3);
    }

    #[test]
    fn test_malformed_lines() {
        for text in ["101", "1010", "1010 ", "1010 \t"] {
            let err = DataImage::parse(text).unwrap_err();
            assert!(matches!(err, LoadError::MalformedData { line: 1, .. }), "{text:?}: {err}");
        }
    }

    #[test]
    fn test_bad_digits() {
        let err = DataImage::parse("0000 1\n10a0 1\n").unwrap_err();
        match err {
            LoadError::Parse { line, source } => {
                assert_eq!(line, 2);
                assert_eq!(source, ParseError::InvalidDigit { digit: 'a', position: 2 });
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_apply_overwrites_cells() {
        let mut mem = Memory::new();
        mem.load_program(0, &[1, 2, 3]).unwrap();

        DataImage::parse("0001 1111\n0101 1\n0001 10\n").unwrap()
            .apply(&mut mem)
            .unwrap();

        // Later lines win
        assert_eq!(mem.read(1), Ok(2));
        assert_eq!(mem.read(5), Ok(1));
        assert_eq!(mem.read(4), Ok(EMPTY));
    }

    #[test]
    fn test_every_address_fits() {
        let text: String = (0..16).map(|address| format!("{:04b} {:b}\n", address, address + 1)).collect();
        let mut mem = Memory::new();

        DataImage::parse(&text).unwrap().apply(&mut mem).unwrap();

        assert_eq!(mem.read(0), Ok(1));
        assert_eq!(mem.read(15), Ok(16));
    }

    #[test]
    fn test_apply_rejects_out_of_range() {
        let mut mem = Memory::new();
        let data = DataImage {
            entries: vec![DataEntry { line: 4, address: MEMORY_SIZE, value: 1 }],
        };

        let err = data.apply(&mut mem).unwrap_err();

        assert!(matches!(err, LoadError::AddressOutOfRange { line: 4, address } if address == MEMORY_SIZE));
        assert_eq!(mem, Memory::new());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "1111 0000000000101010\r\n").unwrap();
        file.flush().unwrap();

        let data = DataImage::load(file.path()).unwrap();

        assert_eq!(data.entries, vec![DataEntry { line: 1, address: 15, value: 42 }]);
    }
}
