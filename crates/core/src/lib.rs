//! Core emulator primitives: cycle accounting and the 6502 execution core.

pub mod addressing;
pub mod clock;
pub mod config;
pub mod cpu_6502;
pub mod logging;
pub mod memory;
pub mod opcodes;

pub use addressing::AddressMode;
pub use clock::{Clock, CycleCost};
pub use config::{ConfigError, MachineConfig};
pub use cpu_6502::{Cpu6502, StatusFlags};
pub use memory::{Memory, MemoryError};

/// A CPU-like component that can be stepped; returns cycles consumed.
pub trait Cpu {
    fn step(&mut self) -> CycleCost;
}

/// Step `cpu` up to `max_steps` times, stopping early on an unrecognized opcode
/// when `stop_on_unknown` is set. Returns the number of steps taken.
pub fn run<C: Cpu>(cpu: &mut C, max_steps: u64, stop_on_unknown: bool) -> u64 {
    let mut steps = 0;
    while steps < max_steps {
        let cost = cpu.step();
        steps += 1;
        if stop_on_unknown && cost.is_unrecognized() {
            break;
        }
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingCpu {
        costs: Vec<u32>,
    }

    impl Cpu for CountingCpu {
        fn step(&mut self) -> CycleCost {
            CycleCost::new(self.costs.pop().unwrap_or(0))
        }
    }

    #[test]
    fn run_stops_at_step_limit() {
        let mut cpu = CountingCpu {
            costs: vec![2; 10],
        };
        assert_eq!(run(&mut cpu, 4, true), 4);
        assert_eq!(cpu.costs.len(), 6);
    }

    #[test]
    fn run_stops_on_unknown_when_asked() {
        let mut cpu = CountingCpu {
            costs: vec![2, 0, 3],
        };
        // pops 3, then 0
        assert_eq!(run(&mut cpu, 10, true), 2);
    }

    #[test]
    fn run_keeps_going_past_unknown_otherwise() {
        let mut cpu = CountingCpu {
            costs: vec![2, 0, 3],
        };
        assert_eq!(run(&mut cpu, 5, false), 5);
    }

    #[test]
    fn cpu6502_runs_through_trait() {
        let mut cpu = Cpu6502::default();
        cpu.load(0, &[0xA9, 0x01, 0xA9, 0x02]).unwrap();
        assert_eq!(run(&mut cpu, 2, true), 2);
        assert_eq!(cpu.a(), 2);
        assert_eq!(cpu.clock().cycles(), 4);
    }
}
