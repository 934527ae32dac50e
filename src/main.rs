//! rv32step CLI - run RV32I+M program images from the command line.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// rv32step - a step-driven RV32I+M machine
#[derive(Parser, Debug)]
#[command(name = "rv32step")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a raw program image
    Run {
        /// Raw little-endian program image, loaded at address 0
        #[arg(required = true)]
        image: PathBuf,

        /// Guest memory size in bytes (hex)
        #[arg(short, long, value_parser = cli::hex_word, default_value = "2000")]
        mem_size: u32,

        /// Initial program counter (hex)
        #[arg(short, long, value_parser = cli::hex_word, default_value = "0")]
        pc: u32,

        /// Initial stack pointer (hex)
        #[arg(short, long, value_parser = cli::hex_word, default_value = "1A40")]
        sp: u32,

        /// Text segment start (hex, default 0)
        #[arg(long, value_parser = cli::hex_word)]
        text_start: Option<u32>,

        /// Text segment end (hex, default: image length)
        #[arg(long, value_parser = cli::hex_word)]
        text_end: Option<u32>,

        /// Maximum instructions to execute (default: 1000000)
        #[arg(long, default_value = "1000000")]
        steps: u64,

        /// Instructions per execution block (default: 1000)
        #[arg(short, long, default_value = "1000")]
        block_size: u32,

        /// Stop when the PC reaches this address (hex)
        #[arg(long, value_parser = cli::hex_word)]
        break_at: Option<u32>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Print each PC and instruction word before it executes
        #[arg(short, long)]
        trace: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            image,
            mem_size,
            pc,
            sp,
            text_start,
            text_end,
            steps,
            block_size,
            break_at,
            format,
            trace,
        } => cli::run::execute(
            image, mem_size, pc, sp, text_start, text_end, steps, block_size, break_at, format,
            trace,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
