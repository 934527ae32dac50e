#![no_main]

//! Stepper fuzzer.
//!
//! Runs an arbitrary image from an arbitrary register state and checks the
//! machine's core safety properties: stepping never panics, and no
//! sequence of steps ever modifies a byte of the text segment.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rv32step::Vm;

/// Structured input for machine stepping.
#[derive(Arbitrary, Debug)]
struct StepInput {
    /// Raw program image (also arbitrary data the program may load).
    image: Vec<u8>,
    /// Initial register file.
    regs: [u32; 32],
    /// Steps to attempt.
    steps: u8,
}

fuzz_target!(|input: StepInput| {
    // Cap the image to keep runtime bounded
    let image: Vec<u8> = input.image.into_iter().take(4096).collect();
    let text_end = (image.len() as u32) & !3;
    if text_end == 0 {
        return;
    }

    let mut vm = Vm::new();
    vm.load(&image, 8192, 0, 0x1A40, 0, text_end).unwrap();
    vm.set_registers(input.regs);

    let text_before = vm.memory().unwrap().view(0, text_end).unwrap().to_vec();

    for _ in 0..input.steps.min(64) {
        if vm.step().is_err() {
            break;
        }
        let _ = vm.poll_video();
    }

    // The text segment must be byte-identical no matter what ran
    let text_after = vm.memory().unwrap().view(0, text_end).unwrap();
    assert_eq!(
        text_before, text_after,
        "text segment modified by execution"
    );
});
