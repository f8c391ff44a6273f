//! Cycle accounting.
//!
//! The clock works in reverse: instead of emitting pulses that drive the CPU,
//! the CPU reports how many cycles each instruction used and the clock keeps
//! the running total.

use crate::logging::{log, LogCategory, LogLevel};

/// Number of cycles one instruction consumed.
///
/// A zero cost is reserved for opcodes with no table entry, so callers can
/// tell an unrecognized byte apart from a real instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CycleCost(u32);

impl CycleCost {
    /// Returned by `step()` when the fetched byte has no opcode table entry.
    pub const UNRECOGNIZED: Self = Self(0);

    pub const fn new(cycles: u32) -> Self {
        Self(cycles)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_unrecognized(self) -> bool {
        self.0 == 0
    }
}

impl From<CycleCost> for u32 {
    fn from(cost: CycleCost) -> Self {
        cost.0
    }
}

/// Running total of cycles consumed across instructions.
///
/// The counter saturates at `u64::MAX` rather than wrapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clock {
    cycles: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        log(LogCategory::Clock, LogLevel::Debug, || {
            format!("Clock reset after {} cycles", self.cycles)
        });
        self.cycles = 0;
    }

    /// Add `cycles` to the total. Callers that only need one cycle use `tick`.
    pub fn pulse(&mut self, cycles: u32) {
        let (sum, overflowed) = self.cycles.overflowing_add(u64::from(cycles));
        if overflowed {
            log(LogCategory::Clock, LogLevel::Warn, || {
                "Cycle counter saturated at u64::MAX".to_string()
            });
            self.cycles = u64::MAX;
        } else {
            self.cycles = sum;
        }
    }

    #[inline]
    pub fn tick(&mut self) {
        self.pulse(1);
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}
