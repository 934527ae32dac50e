// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! rv32step: a step-driven RV32I+M interpreter.
//!
//! The machine executes the RV32I base integer instruction set plus the M
//! multiply/divide extension over a flat guest address space: a read-only
//! text segment, a writable data/heap/stack region, and a memory-mapped
//! video port the host polls between steps.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Host harness (CLI)           │
//! ├─────────────────────────────────────┤
//! │   Vm facade: load/reset/step/goto   │
//! ├──────────────────┬──────────────────┤
//! │  isa: decode +   │  vm: Cpu, guest  │
//! │  execute         │  Memory, video   │
//! └──────────────────┴──────────────────┘
//! ```
//!
//! A step fetches the word at the PC, decodes it, applies its effect, and
//! stores the executor's next PC. Errors surface to the host as
//! [`EmuError`]; nothing is recovered internally.

pub mod error;
pub mod hex;
pub mod isa;
pub mod vm;

pub use error::{EmuError, EmuResult};
pub use vm::cpu::{REG_NAMES, SP};
pub use vm::video::BallPosition;
pub use vm::{Cpu, Memory, Vm};
