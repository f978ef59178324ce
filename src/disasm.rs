//! Disassembler.
//!
//! Turns raw instruction words back into readable text.

use crate::cpu::decode::{decode, InstrClass, Instruction};
use crate::cpu::memory::EMPTY;
use crate::cpu::{AluOp, TransferOp, REGISTER_COUNT};
use crate::image::binary::format_word;

/// Disassemble a single word to text.
pub fn disassemble_word(word: u16) -> String {
    if word == EMPTY {
        return "HALT".to_string();
    }
    format_instruction(&decode(word))
}

/// Disassemble a program listing, stopping at the first empty cell.
pub fn disassemble(words: &[u16]) -> String {
    let mut output = String::new();

    for (addr, &word) in words.iter().enumerate() {
        output.push_str(&format!("{:03}: {:<16}  ; {}\n", addr, disassemble_word(word), format_word(word)));
        if word == EMPTY {
            break;
        }
    }

    output
}

/// Format a decoded instruction as text.
pub fn format_instruction(instr: &Instruction) -> String {
    match instr.class {
        InstrClass::Transfer => match TransferOp::from_opcode(instr.opcode) {
            Some(op) => format!("{} R{}, [{}]", op.mnemonic(), instr.operand1, instr.operand2),
            None => format!("??? T=1 op={:04b}", instr.opcode),
        },
        InstrClass::Alu => match AluOp::from_opcode(instr.opcode) {
            Some(op) => format!(
                "{} R{}, {}, R{}",
                op.mnemonic(),
                instr.operand1,
                format_source(instr),
                instr.operand3,
            ),
            None => format!("??? T=0 op={:04b}", instr.opcode),
        },
    }
}

/// First ALU source: `#imm` or a register.
fn format_source(instr: &Instruction) -> String {
    if instr.immediate {
        format!("#{}", instr.operand2)
    } else if (instr.operand2 as usize) < REGISTER_COUNT {
        format!("R{}", instr.operand2)
    } else {
        format!("R{}?", instr.operand2)
    }
}
