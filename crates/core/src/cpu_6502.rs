//! 6502-family CPU core.
//!
//! `step()` runs one fetch-decode-execute cycle: the opcode byte is looked up
//! in `OPCODE_TABLE`, its addressing mode is resolved (advancing the program
//! counter past the operand), the operation is applied, and the total cycle
//! cost is returned and added to the owned `Clock`.

use crate::addressing::{self, AddressMode, Operand, Resolved};
use crate::clock::{Clock, CycleCost};
use crate::config::{ConfigError, MachineConfig};
use crate::logging::{log, LogCategory, LogLevel};
use crate::memory::{Memory, MemoryError};
use crate::opcodes::{self, Operation};
use crate::Cpu;

/// Sign bit of an 8-bit result. The 6502 N flag mirrors bit 7.
pub const NEGATIVE_MASK: u8 = 0x80;

/// Zero and Negative flags.
///
/// Flags are only produced from an instruction result; there is no way to set
/// them independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFlags {
    zero: bool,
    negative: bool,
}

impl StatusFlags {
    pub(crate) fn from_result(v: u8) -> Self {
        Self {
            zero: v == 0,
            negative: v & NEGATIVE_MASK != 0,
        }
    }

    pub fn zero(&self) -> bool {
        self.zero
    }

    pub fn negative(&self) -> bool {
        self.negative
    }

    /// Flags packed in status register layout (N = bit 7, Z = bit 1).
    pub fn bits(&self) -> u8 {
        let mut p = 0;
        if self.negative {
            p |= 0x80;
        }
        if self.zero {
            p |= 0x02;
        }
        p
    }
}

/// CPU registers, flags, address space and cycle accounting.
#[derive(Debug, Clone)]
pub struct Cpu6502 {
    a: u8,
    x: u8,
    y: u8,
    pc: u16,
    flags: StatusFlags,
    memory: Memory,
    clock: Clock,
}

impl Cpu6502 {
    pub fn new(memory: Memory, clock: Clock) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            flags: StatusFlags::default(),
            memory,
            clock,
        }
    }

    /// CPU with zeroed memory of the configured size, a fresh clock and the
    /// configured starting PC.
    pub fn with_config(cfg: &MachineConfig) -> Result<Self, ConfigError> {
        let memory = Memory::new(cfg.memory_size)?;
        let mut cpu = Self::new(memory, Clock::new());
        cpu.set_pc(cfg.initial_pc);
        Ok(cpu)
    }

    pub fn a(&self) -> u8 {
        self.a
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn flags(&self) -> StatusFlags {
        self.flags
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Give back the memory and clock, e.g. to hand the clock to another core.
    pub fn into_parts(self) -> (Memory, Clock) {
        (self.memory, self.clock)
    }

    /// Copy a program or data image into memory. Use before stepping.
    pub fn load(&mut self, offset: u16, bytes: &[u8]) -> Result<(), MemoryError> {
        self.memory.load(offset, bytes)
    }

    /// Set where execution starts. Use before stepping.
    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    /// Seed X and Y before stepping; no instruction loads them yet.
    pub fn set_index_registers(&mut self, x: u8, y: u8) {
        self.x = x;
        self.y = y;
    }

    /// Register, flag and cycle snapshot for debugging front ends.
    pub fn debug_state(&self) -> serde_json::Value {
        serde_json::json!({
            "a": self.a,
            "x": self.x,
            "y": self.y,
            "pc": self.pc,
            "p": self.flags.bits(),
            "zero": self.flags.zero,
            "negative": self.flags.negative,
            "cycles": self.clock.cycles(),
            "memory_size": self.memory.size(),
        })
    }

    #[inline]
    fn read(&self, addr: u16) -> u8 {
        self.memory.read(addr)
    }

    #[inline]
    fn fetch_u8(&mut self) -> u8 {
        let v = self.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        v
    }

    #[inline]
    fn fetch_u16(&mut self) -> u16 {
        let lo = self.fetch_u8() as u16;
        let hi = self.fetch_u8() as u16;
        (hi << 8) | lo
    }

    /// Little-endian pointer stored in the zero page; the high byte wraps to $00.
    fn read_zero_page_u16(&self, zp: u8) -> u16 {
        let lo = self.read(zp as u16) as u16;
        let hi = self.read(zp.wrapping_add(1) as u16) as u16;
        (hi << 8) | lo
    }

    fn indexed(&self, mode: AddressMode, base: u16, index: u8) -> Resolved {
        let (addr, crossed) = addressing::absolute_indexed(base, index);
        let extra = mode.extra_cycles(crossed);
        if extra > 0 {
            log(LogCategory::Cpu, LogLevel::Trace, || {
                format!("{:?}: {:04X}+{:02X} crossed into page {:02X}", mode, base, index, addr >> 8)
            });
        }
        Resolved::address(addr).with_extra(extra)
    }

    /// Consume the operand bytes for `mode` and locate the operand.
    pub(crate) fn resolve(&mut self, mode: AddressMode) -> Resolved {
        match mode {
            AddressMode::Immediate => Resolved::immediate(self.fetch_u8()),
            AddressMode::ZeroPage => Resolved::address(self.fetch_u8() as u16),
            AddressMode::ZeroPageX => {
                let base = self.fetch_u8();
                Resolved::address(addressing::zero_page_indexed(base, self.x))
            }
            AddressMode::Absolute => Resolved::address(self.fetch_u16()),
            AddressMode::AbsoluteX => {
                let base = self.fetch_u16();
                self.indexed(mode, base, self.x)
            }
            AddressMode::AbsoluteY => {
                let base = self.fetch_u16();
                self.indexed(mode, base, self.y)
            }
            AddressMode::IndirectX => {
                let zp = self.fetch_u8().wrapping_add(self.x);
                Resolved::address(self.read_zero_page_u16(zp))
            }
            AddressMode::IndirectY => {
                let zp = self.fetch_u8();
                let base = self.read_zero_page_u16(zp);
                self.indexed(mode, base, self.y)
            }
        }
    }

    fn operand_value(&self, operand: Operand) -> u8 {
        match operand {
            Operand::Immediate(v) => v,
            Operand::Address(addr) => self.read(addr),
        }
    }

    fn execute(&mut self, operation: Operation, operand: Operand) {
        match operation {
            Operation::Lda => {
                self.a = self.operand_value(operand);
                self.flags = StatusFlags::from_result(self.a);
            }
        }
    }

    /// Execute one instruction and return the cycles it used.
    ///
    /// An opcode with no table entry costs nothing and changes nothing except
    /// the program counter, which has already moved past it.
    pub fn step(&mut self) -> CycleCost {
        let op_pc = self.pc;
        let op = self.fetch_u8();

        let Some(entry) = opcodes::lookup(op) else {
            log(LogCategory::Cpu, LogLevel::Warn, || {
                format!(
                    "UNKNOWN OPCODE: pc=0x{:04X} op=0x{:02X} a=0x{:02X} x=0x{:02X} y=0x{:02X}",
                    op_pc, op, self.a, self.x, self.y
                )
            });
            return CycleCost::UNRECOGNIZED;
        };

        let resolved = self.resolve(entry.mode);
        self.execute(entry.operation, resolved.operand);

        let cost = CycleCost::new(u32::from(entry.base_cycles) + resolved.extra_cycles);
        self.clock.pulse(cost.get());

        log(LogCategory::Cpu, LogLevel::Trace, || {
            format!(
                "{:04X}  {} {:?}  a={:02X} p={:02X} cyc={} total={}",
                op_pc,
                entry.operation.mnemonic(),
                entry.mode,
                self.a,
                self.flags.bits(),
                cost.get(),
                self.clock.cycles()
            )
        });
        cost
    }
}

impl Default for Cpu6502 {
    fn default() -> Self {
        Self::new(Memory::default(), Clock::new())
    }
}

impl Cpu for Cpu6502 {
    fn step(&mut self) -> CycleCost {
        Cpu6502::step(self)
    }
}
