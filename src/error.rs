//! Error types for the RV32I+M machine.

use thiserror::Error;

/// Errors surfaced by the machine and its host-side helpers.
///
/// Nothing is recovered internally: the decoder and executor return these,
/// [`crate::Vm::step`] propagates them, and the host decides what to do.
/// A failed step is not atomic; register and memory writes that preceded the
/// failure stand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmuError {
    /// `step` or `goto` called before `load` bound a memory image.
    #[error("program not loaded")]
    NotLoaded,

    /// Memory access beyond the end of guest memory, or the PC left the
    /// text segment.
    #[error("segmentation fault at {addr:#010x}")]
    SegmentationFault {
        /// The offending address.
        addr: u32,
    },

    /// Store (sb/sh/sw) targeting an address inside the text segment.
    #[error("write into text segment at {addr:#010x}")]
    TextSegmentWrite {
        /// The store's target address.
        addr: u32,
    },

    /// Opcode not part of RV32I+M.
    #[error("illegal opcode in instruction {word:#010x}")]
    IllegalOpcode {
        /// The undecodable instruction word.
        word: u32,
    },

    /// Recognised opcode with an unknown or malformed funct/imm field.
    #[error("illegal function in instruction {word:#010x}")]
    IllegalFunction {
        /// The undecodable instruction word.
        word: u32,
    },

    /// `goto` target outside the text segment.
    #[error("jump target {pc:#010x} outside the text segment")]
    InvalidTarget {
        /// The rejected program counter.
        pc: u32,
    },

    /// Host-side hex parsing overflowed a 32-bit word. Never raised by the
    /// core itself.
    #[error("value overflow parsing {input:?}")]
    ValueOverflow {
        /// The rejected input string.
        input: String,
    },
}

/// Result type for machine operations.
pub type EmuResult<T> = Result<T, EmuError>;
