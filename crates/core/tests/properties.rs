//! Property-based tests for stepping invariants.

use emu6502_core::addressing::zero_page_indexed;
use emu6502_core::{Clock, Cpu6502, CycleCost, Memory};
use proptest::prelude::*;

fn cpu_at(pc: u16, program: &[u8]) -> Cpu6502 {
    let mut cpu = Cpu6502::new(Memory::new(0x1_0000).unwrap(), Clock::new());
    cpu.load(pc, program).unwrap();
    cpu.set_pc(pc);
    cpu
}

proptest! {
    #[test]
    fn immediate_load_sets_a_flags_pc_and_cost(v in any::<u8>(), pc in 0u16..0xFF00) {
        let mut cpu = cpu_at(pc, &[0xA9, v]);
        let cost = cpu.step();

        prop_assert_eq!(cpu.a(), v);
        prop_assert_eq!(cpu.flags().zero(), v == 0);
        prop_assert_eq!(cpu.flags().negative(), v & 0x80 != 0);
        prop_assert_eq!(cpu.pc(), pc + 2);
        prop_assert_eq!(cost, CycleCost::new(2));
    }

    #[test]
    fn zero_page_x_never_leaves_zero_page(base in any::<u8>(), x in any::<u8>(), v in any::<u8>()) {
        let mut cpu = cpu_at(0x0400, &[0xB5, base]);
        cpu.set_index_registers(x, 0);
        let effective = (base as u16 + x as u16) % 256;
        // Poison the address a missing wrap would hit.
        let unwrapped = base as u16 + x as u16;
        if unwrapped != effective {
            cpu.load(unwrapped, &[!v]).unwrap();
        }
        cpu.load(effective, &[v]).unwrap();

        prop_assert_eq!(cpu.step(), CycleCost::new(4));
        prop_assert_eq!(cpu.a(), v);
        prop_assert_eq!(zero_page_indexed(base, x), effective);
    }

    #[test]
    fn absolute_x_charges_one_cycle_only_on_page_cross(base in 0x0100u16..0xF000, x in any::<u8>()) {
        let lo = (base & 0xFF) as u8;
        let hi = (base >> 8) as u8;
        let mut cpu = cpu_at(0xF800, &[0xBD, lo, hi]);
        cpu.set_index_registers(x, 0);

        let crossed = (base & 0xFF) + x as u16 > 0xFF;
        let expected = if crossed { 5 } else { 4 };
        prop_assert_eq!(cpu.step(), CycleCost::new(expected));
        prop_assert_eq!(cpu.clock().cycles(), expected as u64);
        prop_assert_eq!(cpu.pc(), 0xF803);
    }

    #[test]
    fn unbound_opcodes_cost_nothing_and_advance_one(op in any::<u8>(), a in any::<u8>()) {
        prop_assume!(!matches!(op, 0xA9 | 0xA5 | 0xB5 | 0xAD | 0xBD | 0xB9));
        let mut cpu = cpu_at(0x0300, &[0xA9, a, op]);
        cpu.step();
        let flags = cpu.flags();

        let cost = cpu.step();

        prop_assert!(cost.is_unrecognized());
        prop_assert_eq!(cpu.pc(), 0x0303);
        prop_assert_eq!(cpu.a(), a);
        prop_assert_eq!(cpu.x(), 0);
        prop_assert_eq!(cpu.y(), 0);
        prop_assert_eq!(cpu.flags(), flags);
        prop_assert_eq!(cpu.clock().cycles(), 2);
    }

    #[test]
    fn clock_reset_then_pulse_is_history_free(history in prop::collection::vec(any::<u32>(), 0..16), n in any::<u32>()) {
        let mut clock = Clock::new();
        for h in history {
            clock.pulse(h);
        }
        clock.reset();
        clock.pulse(n);
        prop_assert_eq!(clock.cycles(), n as u64);
    }
}
