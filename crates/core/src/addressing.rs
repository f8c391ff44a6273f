//! Addressing modes and effective-address arithmetic.
//!
//! The CPU owns the fetch side (advancing the program counter); the helpers
//! here are the pure address computations so wraparound and page-crossing
//! rules can be checked without a CPU.

/// How an instruction locates its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    /// `#$nn`: the operand byte is the value.
    Immediate,
    /// `$nn`: address 0x00-0xFF.
    ZeroPage,
    /// `$nn,X`: wraps within the zero page.
    ZeroPageX,
    /// `$nnnn`: little-endian 16-bit address.
    Absolute,
    /// `$nnnn,X`: +1 cycle when the high byte changes.
    AbsoluteX,
    /// `$nnnn,Y`: +1 cycle when the high byte changes.
    AbsoluteY,
    /// `($nn,X)`: pointer read from zero page at operand + X.
    IndirectX,
    /// `($nn),Y`: pointer read from zero page, then + Y. +1 cycle on page cross.
    IndirectY,
}

impl AddressMode {
    pub const ALL: [AddressMode; 8] = [
        AddressMode::Immediate,
        AddressMode::ZeroPage,
        AddressMode::ZeroPageX,
        AddressMode::Absolute,
        AddressMode::AbsoluteX,
        AddressMode::AbsoluteY,
        AddressMode::IndirectX,
        AddressMode::IndirectY,
    ];

    /// Bytes that follow the opcode.
    pub const fn operand_bytes(self) -> u16 {
        match self {
            AddressMode::Immediate
            | AddressMode::ZeroPage
            | AddressMode::ZeroPageX
            | AddressMode::IndirectX
            | AddressMode::IndirectY => 1,
            AddressMode::Absolute | AddressMode::AbsoluteX | AddressMode::AbsoluteY => 2,
        }
    }

    /// Cycle cost of a read through this mode, before any page-cross penalty.
    pub const fn base_cycles(self) -> u8 {
        match self {
            AddressMode::Immediate => 2,
            AddressMode::ZeroPage => 3,
            AddressMode::ZeroPageX => 4,
            AddressMode::Absolute => 4,
            AddressMode::AbsoluteX => 4,
            AddressMode::AbsoluteY => 4,
            AddressMode::IndirectX => 6,
            AddressMode::IndirectY => 5,
        }
    }

    /// Whether crossing a page during indexing costs an extra cycle.
    pub const fn has_page_cross_penalty(self) -> bool {
        matches!(
            self,
            AddressMode::AbsoluteX | AddressMode::AbsoluteY | AddressMode::IndirectY
        )
    }

    /// Extra cycles charged for a resolution that did or did not cross a page.
    pub const fn extra_cycles(self, page_crossed: bool) -> u32 {
        if page_crossed && self.has_page_cross_penalty() {
            1
        } else {
            0
        }
    }
}

/// A resolved operand: a literal, or the address the value lives at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Immediate(u8),
    Address(u16),
}

/// Output of operand resolution.
///
/// Extra cycles are returned here and never charged directly; `step()` adds
/// them to the instruction's cost exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub operand: Operand,
    pub extra_cycles: u32,
}

impl Resolved {
    pub const fn immediate(value: u8) -> Self {
        Self {
            operand: Operand::Immediate(value),
            extra_cycles: 0,
        }
    }

    pub const fn address(addr: u16) -> Self {
        Self {
            operand: Operand::Address(addr),
            extra_cycles: 0,
        }
    }

    pub const fn with_extra(mut self, extra_cycles: u32) -> Self {
        self.extra_cycles = extra_cycles;
        self
    }
}

/// Zero-page base plus an index, wrapped modulo 256.
#[inline]
pub const fn zero_page_indexed(base: u8, index: u8) -> u16 {
    base.wrapping_add(index) as u16
}

/// 16-bit base plus an index. Returns the address and whether the high byte changed.
#[inline]
pub const fn absolute_indexed(base: u16, index: u8) -> (u16, bool) {
    let addr = base.wrapping_add(index as u16);
    (addr, page_crossed(base, addr))
}

#[inline]
pub const fn page_crossed(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}
