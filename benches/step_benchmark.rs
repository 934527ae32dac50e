//! Benchmarks for the RV32I+M machine.

#![allow(missing_docs)] // Benchmark macros generate undocumented functions
#![allow(clippy::unreadable_literal)] // Instruction encodings are standard hex

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rv32step::{isa, Vm};

fn bench_step(c: &mut Criterion) {
    // Fill the text segment with addi x1, x1, 1
    let addi_x1 = 0x00108093u32;
    let image: Vec<u8> = std::iter::repeat(addi_x1)
        .take(65536 / 4)
        .flat_map(u32::to_le_bytes)
        .collect();

    let mut vm = Vm::new();
    vm.load(&image, 65536, 0, 0, 0, 65536).unwrap();

    c.bench_function("step_addi", |b| {
        b.iter(|| {
            vm.goto(0).unwrap();
            for _ in 0..1000 {
                let _ = black_box(vm.step());
            }
        });
    });
}

fn bench_branch_loop(c: &mut Criterion) {
    // lui x2, 1      -> x2 = 4096
    // addi x1, x1, 1
    // blt x1, x2, -4
    let image: Vec<u8> = [0x00001137u32, 0x00108093, 0xFE20CEE3]
        .iter()
        .flat_map(|w| w.to_le_bytes())
        .collect();

    let mut vm = Vm::new();
    vm.load(&image, 4096, 0, 0, 0, 12).unwrap();

    c.bench_function("branch_loop_4k", |b| {
        b.iter(|| {
            vm.reset(0, 0);
            // Runs until the loop falls through and the PC leaves the text
            // segment
            while vm.step().is_ok() {}
            black_box(vm.pc());
        });
    });
}

fn bench_decode(c: &mut Criterion) {
    // Sample instructions
    let instructions = [
        0x00108093u32, // addi x1, x1, 1
        0x002081B3u32, // add x3, x1, x2
        0x00208463u32, // beq x1, x2, 8
        0x0000006Fu32, // jal x0, 0
        0x02A00093u32, // addi x1, x0, 42
    ];

    c.bench_function("decode_1000", |b| {
        b.iter(|| {
            for _ in 0..200 {
                for inst in &instructions {
                    let _ = black_box(isa::decode(*inst));
                }
            }
        });
    });
}

criterion_group!(benches, bench_step, bench_branch_loop, bench_decode);
criterion_main!(benches);
