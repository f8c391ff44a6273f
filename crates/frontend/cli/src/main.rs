use anyhow::{Context, Result};
use clap::Parser;
use emu6502_core::logging::{LogCategory, LogConfig, LogLevel};
use emu6502_core::opcodes;
use emu6502_core::{Cpu6502, MachineConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "emu6502", about = "Run a raw 6502 program image")]
struct Args {
    /// Raw program image to load
    program: PathBuf,

    /// JSON machine config (memory_size, initial_pc)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address space size in bytes (overrides config)
    #[arg(long, value_parser = parse_number::<usize>)]
    memory_size: Option<usize>,

    /// Where the image is loaded
    #[arg(long, default_value = "0", value_parser = parse_number::<u16>)]
    load_addr: u16,

    /// Initial program counter (defaults to config, then load address)
    #[arg(long, value_parser = parse_number::<u16>)]
    pc: Option<u16>,

    /// Number of instructions to execute
    #[arg(long, default_value_t = 16)]
    steps: u64,

    /// Keep stepping past unrecognized opcodes
    #[arg(long, default_value_t = false)]
    keep_going: bool,

    /// Print one line per executed instruction
    #[arg(long, default_value_t = false)]
    trace: bool,

    /// Core log level for all categories (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", value_parser = parse_level)]
    log_level: LogLevel,

    /// Core log level for the CPU category only
    #[arg(long, value_parser = parse_level)]
    log_cpu: Option<LogLevel>,

    /// Send core log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Maximum core log messages per second per category
    #[arg(long, default_value_t = 60)]
    log_rate: usize,

    /// Write the final register state to this file as JSON
    #[arg(long)]
    dump: Option<PathBuf>,
}

/// Accepts `0x`-prefixed hex, `$`-prefixed hex, or decimal.
fn parse_number<T>(s: &str) -> Result<T, String>
where
    T: TryFrom<u64>,
{
    let s = s.trim();
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix('$'));
    let parsed = match hex {
        Some(digits) => u64::from_str_radix(digits, 16),
        None => s.parse::<u64>(),
    };
    let value = parsed.map_err(|e| format!("invalid number '{}': {}", s, e))?;
    T::try_from(value).map_err(|_| format!("{} is out of range", s))
}

fn parse_level(s: &str) -> Result<LogLevel, String> {
    LogLevel::from_str(s).ok_or_else(|| format!("unknown log level '{}'", s))
}

/// Opcode byte(s) and mnemonic of the instruction at `pc`, e.g. `BD F0 20  LDA`.
fn disassemble_at(cpu: &Cpu6502, pc: u16) -> String {
    let op = cpu.memory().read(pc);
    let Some(entry) = opcodes::lookup(op) else {
        return format!("{:02X}        ???", op);
    };
    let bytes: Vec<String> = (0..entry.size_bytes())
        .map(|i| format!("{:02X}", cpu.memory().read(pc.wrapping_add(i))))
        .collect();
    format!("{:<8}  {}", bytes.join(" "), entry.operation.mnemonic())
}

fn machine_config(args: &Args) -> Result<MachineConfig> {
    let mut cfg = match &args.config {
        Some(path) => MachineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MachineConfig {
            initial_pc: args.load_addr,
            ..MachineConfig::default()
        },
    };
    if let Some(size) = args.memory_size {
        cfg.memory_size = size;
    }
    if let Some(pc) = args.pc {
        cfg.initial_pc = pc;
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let log_config = LogConfig::global();
    log_config.set_global_level(args.log_level);
    if let Some(level) = args.log_cpu {
        log_config.set_level(LogCategory::Cpu, level);
    }
    log_config.set_rate_limit(args.log_rate);
    if let Some(path) = &args.log_file {
        log_config
            .set_log_file(path.clone())
            .with_context(|| format!("opening log file {}", path.display()))?;
    }

    let cfg = machine_config(&args)?;
    let image = fs::read(&args.program)
        .with_context(|| format!("reading {}", args.program.display()))?;

    let mut cpu = cfg.build()?;
    cpu.load(args.load_addr, &image)?;
    log::info!(
        "Loaded {} bytes at {:04X}, memory {} bytes, pc {:04X}",
        image.len(),
        args.load_addr,
        cpu.memory().size(),
        cpu.pc()
    );

    let mut executed = 0u64;
    while executed < args.steps {
        let pc = cpu.pc();
        let listing = if args.trace {
            disassemble_at(&cpu, pc)
        } else {
            String::new()
        };
        let cost = cpu.step();
        executed += 1;

        if args.trace {
            println!(
                "{:04X}  {}  a={:02X} x={:02X} y={:02X} p={:02X}  +{} ({})",
                pc,
                listing,
                cpu.a(),
                cpu.x(),
                cpu.y(),
                cpu.flags().bits(),
                cost.get(),
                cpu.clock().cycles()
            );
        }

        if cost.is_unrecognized() && !args.keep_going {
            log::warn!("Stopped at unrecognized opcode at {:04X}", pc);
            break;
        }
    }

    let state = cpu.debug_state();
    println!("Executed {} instruction(s), {} cycle(s)", executed, cpu.clock().cycles());
    println!("{}", serde_json::to_string_pretty(&state)?);

    if let Some(path) = &args.dump {
        let mut f = File::create(path)?;
        write!(f, "{}", serde_json::to_string_pretty(&state)?)?;
    }

    Ok(())
}
