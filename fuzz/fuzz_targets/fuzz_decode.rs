#![no_main]

//! Decoder fuzzer.
//!
//! Decoding must be total: every 32-bit word either yields an instruction
//! or a typed illegal-opcode/illegal-function error, never a panic.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|word: u32| {
    let _ = rv32step::isa::decode(word);
});
