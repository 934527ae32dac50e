//! Run command implementation.
//!
//! Drives the machine in blocks of steps, polling the video port after every
//! step the way the on-screen harness would, until a stop condition is hit:
//! step budget, breakpoint, or a machine fault.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use rv32step::hex::format_hex_word;
use rv32step::{BallPosition, EmuError, Vm, REG_NAMES};

use super::{CliError, OutputFormat};

/// Why the run loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StopReason {
    /// The step budget was spent.
    StepBudget,
    /// The PC reached the requested breakpoint.
    Breakpoint(u32),
    /// The machine reported an error.
    Fault(EmuError),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::StepBudget => write!(f, "step budget spent"),
            StopReason::Breakpoint(pc) => {
                write!(f, "breakpoint at {}", format_hex_word(*pc))
            }
            StopReason::Fault(e) => write!(f, "{e}"),
        }
    }
}

/// One register row of the JSON summary.
#[derive(Debug, Serialize)]
struct RegEntry {
    name: &'static str,
    value: String,
}

/// Machine state at the end of a run.
#[derive(Debug, Serialize)]
struct RunSummary {
    steps: u64,
    stop: String,
    pc: String,
    registers: Vec<RegEntry>,
    ball: Option<BallPosition>,
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the image cannot be read or loaded; machine faults
/// during execution are a reported stop reason, not a command failure.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    image_path: PathBuf,
    mem_size: u32,
    pc0: u32,
    sp0: u32,
    text_start: Option<u32>,
    text_end: Option<u32>,
    steps: u64,
    block_size: u32,
    break_at: Option<u32>,
    format: OutputFormat,
    trace: bool,
) -> Result<(), CliError> {
    let image = fs::read(&image_path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", image_path.display())))?;

    // Without an explicit range the whole image is code, like a bare ROM.
    let text_start = text_start.unwrap_or(0);
    #[allow(clippy::cast_possible_truncation)]
    let text_end = text_end.unwrap_or(image.len() as u32);

    let mut vm = Vm::new();
    vm.load(&image, mem_size, pc0, sp0, text_start, text_end)?;

    log::debug!(
        "loaded {} bytes, text [{}, {}), pc {}, sp {}",
        image.len(),
        format_hex_word(text_start),
        format_hex_word(text_end),
        format_hex_word(pc0),
        format_hex_word(sp0),
    );

    let mut executed: u64 = 0;
    let mut last_ball: Option<BallPosition> = None;
    let block_size = u64::from(block_size.max(1));

    let stop = 'run: loop {
        for _ in 0..block_size {
            if executed >= steps {
                break 'run StopReason::StepBudget;
            }
            if break_at == Some(vm.pc()) {
                break 'run StopReason::Breakpoint(vm.pc());
            }

            if trace {
                if let Ok(word) = vm.instruction() {
                    println!("{}: {}", format_hex_word(vm.pc()), format_hex_word(word));
                }
            }

            if let Err(e) = vm.step() {
                break 'run StopReason::Fault(e);
            }
            executed += 1;

            // The guest signals new coordinates through the video port;
            // report them as they arrive, like the on-screen harness does.
            match vm.poll_video() {
                Ok(Some(ball)) => {
                    println!("ball update - left: {}, top: {}", ball.left, ball.top);
                    last_ball = Some(ball);
                }
                Ok(None) => {}
                Err(e) => break 'run StopReason::Fault(e),
            }
        }

        log::debug!(
            "block complete: {executed} steps, pc {}",
            format_hex_word(vm.pc())
        );
    };

    let summary = RunSummary {
        steps: executed,
        stop: stop.to_string(),
        pc: format_hex_word(vm.pc()),
        registers: REG_NAMES
            .iter()
            .zip(vm.registers().iter())
            .map(|(&name, &value)| RegEntry {
                name,
                value: format_hex_word(value),
            })
            .collect(),
        ball: last_ball,
    };

    match format {
        OutputFormat::Text => print_text(&summary),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Print the run summary as a register table.
fn print_text(summary: &RunSummary) {
    println!("stopped after {} steps: {}", summary.steps, summary.stop);
    println!("pc: {}", summary.pc);

    for row in summary.registers.chunks(4) {
        let line = row
            .iter()
            .map(|r| format!("{:>4} {}", r.name, r.value))
            .collect::<Vec<_>>()
            .join("   ");
        println!("{line}");
    }

    if let Some(ball) = summary.ball {
        println!("ball - left: {}, top: {}", ball.left, ball.top);
    }
}
