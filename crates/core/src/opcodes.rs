//! Opcode dispatch table.
//!
//! Every one of the 256 byte values maps to either `None` (unrecognized) or an
//! `(Operation, AddressMode)` descriptor. New instructions are added here as
//! table entries; `Cpu6502::step` does not change.

use crate::addressing::AddressMode;

/// What an instruction does once its operand is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Load accumulator.
    Lda,
}

impl Operation {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Operation::Lda => "LDA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub operation: Operation,
    pub mode: AddressMode,
    /// Cost before any page-cross penalty.
    pub base_cycles: u8,
}

impl OpcodeEntry {
    /// Entry whose cost is the mode's read cost.
    pub const fn new(operation: Operation, mode: AddressMode) -> Self {
        Self {
            operation,
            mode,
            base_cycles: mode.base_cycles(),
        }
    }

    /// Instruction length including the opcode byte.
    pub const fn size_bytes(&self) -> u16 {
        1 + self.mode.operand_bytes()
    }
}

const fn build_table() -> [Option<OpcodeEntry>; 256] {
    use AddressMode::*;
    use Operation::*;

    let mut table: [Option<OpcodeEntry>; 256] = [None; 256];

    table[0xA9] = Some(OpcodeEntry::new(Lda, Immediate));
    table[0xA5] = Some(OpcodeEntry::new(Lda, ZeroPage));
    table[0xB5] = Some(OpcodeEntry::new(Lda, ZeroPageX));
    table[0xAD] = Some(OpcodeEntry::new(Lda, Absolute));
    table[0xBD] = Some(OpcodeEntry::new(Lda, AbsoluteX));
    table[0xB9] = Some(OpcodeEntry::new(Lda, AbsoluteY));

    table
}

pub static OPCODE_TABLE: [Option<OpcodeEntry>; 256] = build_table();

#[inline]
pub fn lookup(op: u8) -> Option<&'static OpcodeEntry> {
    OPCODE_TABLE[op as usize].as_ref()
}
