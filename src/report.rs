//! Final register dump.
//!
//! Rendered either as the classic tab-indented table or as JSON.

use crate::cpu::Registers;
use serde::{Serialize, Deserialize};
use std::fmt;

/// One register in the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterValue {
    pub index: usize,
    pub value: u16,
}

/// Register contents after a normal halt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterReport {
    /// Registers in index order.
    pub registers: Vec<RegisterValue>,
    /// Instructions executed.
    pub cycles: u64,
}

impl RegisterReport {
    pub fn new(regs: &Registers, cycles: u64) -> Self {
        Self {
            registers: regs
                .iter()
                .map(|(index, value)| RegisterValue { index, value })
                .collect(),
            cycles,
        }
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RegisterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RULE: &str = "\t--------";

        writeln!(f)?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "\tRn Value")?;
        writeln!(f, "{}", RULE)?;
        for reg in &self.registers {
            writeln!(f, "\tR{} {:5}", reg.index, reg.value)?;
        }
        writeln!(f, "{}", RULE)?;
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_layout() {
        let mut regs = Registers::new();
        regs.write(0, 15).unwrap();
        regs.write(7, 65535).unwrap();

        let table = RegisterReport::new(&regs, 3).to_string();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "\t--------");
        assert_eq!(lines[2], "\tRn Value");
        assert_eq!(lines[4], "\tR0    15");
        assert_eq!(lines[5], "\tR1     0");
        assert_eq!(lines[11], "\tR7 65535");
        assert_eq!(lines[12], "\t--------");
        assert!(table.ends_with("--------\n\n"));
    }

    #[test]
    fn test_json_output() {
        let mut regs = Registers::new();
        regs.write(2, 42).unwrap();

        let json = RegisterReport::new(&regs, 9).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["cycles"], 9);
        assert_eq!(value["registers"].as_array().unwrap().len(), 8);
        assert_eq!(value["registers"][2]["index"], 2);
        assert_eq!(value["registers"][2]["value"], 42);
    }
}
