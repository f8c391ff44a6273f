use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use emu6502_core::{Clock, Cpu6502, Memory};

/// A loop of loads touching every bound addressing mode, restarted from $0000.
fn bench_cpu() -> Cpu6502 {
    let mut cpu = Cpu6502::new(Memory::default(), Clock::new());
    cpu.load(
        0x0000,
        &[
            0xA9, 0x42, // LDA #$42
            0xA5, 0x80, // LDA $80
            0xB5, 0x80, // LDA $80,X
            0xAD, 0x00, 0x20, // LDA $2000
            0xBD, 0xF0, 0x20, // LDA $20F0,X (crosses)
            0xB9, 0x00, 0x20, // LDA $2000,Y
        ],
    )
    .expect("program fits");
    cpu.set_index_registers(0x20, 0x10);
    cpu
}

const PROGRAM_LEN: u16 = 15;
const PROGRAM_INSTRUCTIONS: usize = 6;

fn bench_cpu_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_6502_step");

    group.bench_function("single_instruction", |b| {
        b.iter(|| {
            let mut cpu = bench_cpu();
            cpu.step();
            black_box(cpu.a());
        });
    });

    group.finish();
}

fn bench_cpu_multiple_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_6502_multiple_steps");

    for step_count in [10usize, 100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(step_count),
            step_count,
            |b, &count| {
                b.iter(|| {
                    let mut cpu = bench_cpu();
                    for i in 0..count {
                        if i % PROGRAM_INSTRUCTIONS == 0 {
                            cpu.set_pc(0);
                        }
                        cpu.step();
                    }
                    black_box(cpu.clock().cycles());
                });
            },
        );
    }

    group.finish();
}

fn bench_unknown_opcode(c: &mut Criterion) {
    c.bench_function("cpu_6502_unknown_opcode", |b| {
        let mut cpu = bench_cpu();
        b.iter(|| {
            cpu.set_pc(PROGRAM_LEN);
            black_box(cpu.step());
        });
    });
}

criterion_group!(
    benches,
    bench_cpu_step,
    bench_cpu_multiple_steps,
    bench_unknown_opcode
);
criterion_main!(benches);
