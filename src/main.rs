//! binproc - CLI Entry Point
//!
//! Commands:
//! - `binproc run` - Load program and data files, run, print registers
//! - `binproc disasm <program>` - Disassemble a program file
//!
//! With no command, `run` is used with the default file names.

use binproc::{boot, disassemble, disassemble_word, Cpu, CpuError, DataImage, LoadError, ProgramImage, RegisterReport};
use binproc::cpu::{InstrClass, Instruction, TransferOp};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::process::ExitCode;

const DEFAULT_PROGRAM: &str = "program.txt";
const DEFAULT_DATA: &str = "data.txt";

#[derive(Parser)]
#[command(name = "binproc")]
#[command(version)]
#[command(about = "Emulator for a minimal 16-bit fixed-point processor")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it halts
    Run {
        /// Program file, one binary instruction per line
        #[arg(short, long, default_value = DEFAULT_PROGRAM)]
        program: String,
        /// Data file, `<address> <value>` per line
        #[arg(short, long, default_value = DEFAULT_DATA)]
        data: String,
        /// Stop after this many instructions
        #[arg(short, long)]
        max_steps: Option<u64>,
        /// Print each instruction as it executes
        #[arg(short, long)]
        trace: bool,
        /// Register dump format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Disassemble a program file
    Disasm {
        /// Path to the program file
        program: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Run { program, data, max_steps, trace, format }) => {
            run_program(&program, &data, max_steps, trace, format)
        }
        Some(Commands::Disasm { program }) => disassemble_file(&program),
        None => run_program(DEFAULT_PROGRAM, DEFAULT_DATA, None, false, Format::Table),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run_program(
    program_path: &str,
    data_path: &str,
    max_steps: Option<u64>,
    trace: bool,
    format: Format,
) -> Result<(), String> {
    let program = ProgramImage::load(program_path).map_err(|e| describe(program_path, e))?;
    let data = DataImage::load(data_path).map_err(|e| describe(data_path, e))?;
    info!("{}: {} words, {}: {} cells", program_path, program.len(), data_path, data.len());

    let mut cpu = boot(&program, &data).map_err(|e| e.to_string())?;

    let limit = max_steps.unwrap_or(u64::MAX);
    let outcome = if trace {
        trace_run(&mut cpu, limit)
    } else {
        cpu.run_limited(limit).map(|_| ())
    };
    outcome.map_err(|e| format!("{}: {}{}", program_path, e, faulting_word(&cpu, &e)))?;

    if cpu.is_running() {
        eprintln!("warning: stopped after {} instructions (--max-steps), pc={}", cpu.cycles, cpu.pc);
    }

    let report = cpu.report().unwrap_or_else(|| RegisterReport::new(&cpu.regs, cpu.cycles));
    match format {
        Format::Table => print!("{}", report),
        Format::Json => {
            let json = report.to_json().map_err(|e| e.to_string())?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// Step one instruction at a time, printing each as it executes.
fn trace_run(cpu: &mut Cpu, limit: u64) -> Result<(), CpuError> {
    while cpu.is_running() && cpu.cycles < limit {
        let pc = cpu.pc;
        let word = cpu.mem.read(pc).unwrap_or(binproc::EMPTY);

        if let Some(instr) = cpu.step()? {
            println!("{:03}: {:<16}  {}", pc, disassemble_word(word), written(cpu, &instr));
        }
    }

    Ok(())
}

/// The location an instruction wrote and its new value: a memory cell for
/// STORE, the destination register otherwise.
fn written(cpu: &Cpu, instr: &Instruction) -> String {
    if instr.class == InstrClass::Transfer && instr.opcode == TransferOp::STORE {
        let address = instr.operand2 as usize;
        let value = cpu.mem.read(address).unwrap_or_default();
        format!("[{}]={}", address, value)
    } else {
        let dest = instr.operand1 as usize;
        let value = cpu.regs.read(dest).unwrap_or_default();
        format!("R{}={}", dest, value)
    }
}

/// The raw word and disassembly of the instruction a fault came from.
fn faulting_word(cpu: &Cpu, err: &CpuError) -> String {
    let cell = err.address().and_then(|address| cpu.mem.dump(address, 1).pop());
    match cell {
        Some((address, word)) => format!("\n  {:03}: {:016b}  {}", address, word, disassemble_word(word)),
        None => String::new(),
    }
}

fn disassemble_file(path: &str) -> Result<(), String> {
    let program = ProgramImage::load(path).map_err(|e| describe(path, e))?;
    print!("{}", disassemble(&program.words));
    Ok(())
}

/// Prefix load errors with the file they came from. I/O errors already name it.
fn describe(path: &str, err: LoadError) -> String {
    match err {
        LoadError::Io { .. } => err.to_string(),
        _ => format!("{}: {}", path, err),
    }
}
