//! Instruction decoder.
//!
//! Every instruction is a single 16-bit word laid out as follows
//! (bit 15 is the most significant):
//!
//! ```text
//!  15  14..11   10    9..7      6..3      2..0
//! [T] [opcode] [I] [operand1] [operand2] [operand3]
//! ```
//!
//! - `T`: 1 for data transfer (LOAD/STORE), 0 for ALU operations
//! - `I`: ALU only, 1 when operand2 is an immediate value
//! - `operand1`: destination register
//! - `operand2`: ALU first source (register or immediate), or memory address
//! - `operand3`: ALU second source register
//!
//! Decoding never fails. Whether the resulting fields make sense is up to
//! the unit that executes them.

use serde::{Serialize, Deserialize};

const T_SHIFT: u16 = 15;
const OPCODE_SHIFT: u16 = 11;
const OPCODE_MASK: u16 = 0x0F;
const I_SHIFT: u16 = 10;
const OPERAND1_SHIFT: u16 = 7;
const OPERAND1_MASK: u16 = 0x07;
const OPERAND2_SHIFT: u16 = 3;
const OPERAND2_MASK: u16 = 0x0F;
const OPERAND3_MASK: u16 = 0x07;

/// Which execution unit an instruction belongs to, selected by the T-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrClass {
    /// T = 0
    Alu,
    /// T = 1
    Transfer,
}

/// A decoded instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    /// Execution unit (T-bit).
    pub class: InstrClass,
    /// Operation selector, 4 bits.
    pub opcode: u8,
    /// Immediate flag (I-bit). Ignored by data transfer.
    pub immediate: bool,
    /// Destination register index, 3 bits.
    pub operand1: u8,
    /// Register index, immediate, or memory address, 4 bits.
    pub operand2: u8,
    /// Second ALU source register index, 3 bits. Ignored by data transfer.
    pub operand3: u8,
}

impl Instruction {
    /// Build a data transfer instruction.
    pub fn transfer(opcode: u8, register: u8, address: u8) -> Self {
        Self {
            class: InstrClass::Transfer,
            opcode,
            immediate: false,
            operand1: register,
            operand2: address,
            operand3: 0,
        }
    }

    /// Build an ALU instruction.
    ///
    /// `source1` is a register index, or the value itself when `immediate`
    /// is set. `source2` is always a register index.
    pub fn alu(opcode: u8, dest: u8, source1: u8, immediate: bool, source2: u8) -> Self {
        Self {
            class: InstrClass::Alu,
            opcode,
            immediate,
            operand1: dest,
            operand2: source1,
            operand3: source2,
        }
    }
}

/// Split a raw word into its fields.
pub fn decode(word: u16) -> Instruction {
    let class = if (word >> T_SHIFT) & 1 == 1 {
        InstrClass::Transfer
    } else {
        InstrClass::Alu
    };

    Instruction {
        class,
        opcode: ((word >> OPCODE_SHIFT) & OPCODE_MASK) as u8,
        immediate: (word >> I_SHIFT) & 1 == 1,
        operand1: ((word >> OPERAND1_SHIFT) & OPERAND1_MASK) as u8,
        operand2: ((word >> OPERAND2_SHIFT) & OPERAND2_MASK) as u8,
        operand3: (word & OPERAND3_MASK) as u8,
    }
}

/// Pack an instruction back into a word.
///
/// Fields wider than their slot are truncated to the slot width.
pub fn encode(instr: &Instruction) -> u16 {
    let t_bit: u16 = match instr.class {
        InstrClass::Transfer => 1,
        InstrClass::Alu => 0,
    };

    (t_bit << T_SHIFT)
        | ((instr.opcode as u16 & OPCODE_MASK) << OPCODE_SHIFT)
        | ((instr.immediate as u16) << I_SHIFT)
        | ((instr.operand1 as u16 & OPERAND1_MASK) << OPERAND1_SHIFT)
        | ((instr.operand2 as u16 & OPERAND2_MASK) << OPERAND2_SHIFT)
        | (instr.operand3 as u16 & OPERAND3_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::memory::EMPTY;
    use proptest::prelude::*;

    #[test]
    fn test_decode_fields() {
        // T=0 opcode=0000 I=1 op1=010 op2=0101 op3=001
        let instr = decode(0b0_0000_1_010_0101_001);
        assert_eq!(instr.class, InstrClass::Alu);
        assert_eq!(instr.opcode, 0);
        assert!(instr.immediate);
        assert_eq!(instr.operand1, 2);
        assert_eq!(instr.operand2, 5);
        assert_eq!(instr.operand3, 1);
    }

    #[test]
    fn test_decode_transfer() {
        // T=1 opcode=0101 I=0 op1=000 op2=1010 op3=000
        let instr = decode(0b1_0101_0_000_1010_000);
        assert_eq!(instr, Instruction::transfer(0b0101, 0, 10));
    }

    #[test]
    fn test_decode_sentinel() {
        // The sentinel still decodes; the engine just never executes it
        let instr = decode(EMPTY);
        assert_eq!(instr.class, InstrClass::Transfer);
        assert_eq!(instr.opcode, 0x0F);
        assert!(instr.immediate);
        assert_eq!((instr.operand1, instr.operand2, instr.operand3), (7, 15, 7));
    }

    #[test]
    fn test_encode_truncates_wide_fields() {
        let instr = Instruction::alu(0x1F, 9, 0x13, false, 8);
        let decoded = decode(encode(&instr));
        assert_eq!(decoded.opcode, 0x0F);
        assert_eq!(decoded.operand1, 1);
        assert_eq!(decoded.operand2, 3);
        assert_eq!(decoded.operand3, 0);
    }

    proptest! {
        #[test]
        fn decode_is_total_and_deterministic(word in any::<u16>()) {
            let first = decode(word);
            prop_assert_eq!(first, decode(word));
            prop_assert!(first.opcode < 16);
            prop_assert!(first.operand1 < 8);
            prop_assert!(first.operand2 < 16);
            prop_assert!(first.operand3 < 8);
        }

        #[test]
        fn encode_inverts_decode(word in any::<u16>()) {
            prop_assert_eq!(encode(&decode(word)), word);
        }
    }
}
