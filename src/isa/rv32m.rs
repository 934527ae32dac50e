//! RV32M extension: multiply and divide instructions.
//!
//! The cast warnings below are intentionally allowed because RISC-V semantics
//! require deliberate signed/unsigned reinterpretation of 32-bit values.

#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]

use crate::error::{EmuError, EmuResult};
use crate::isa::Instruction;
use crate::vm::cpu::Cpu;

/// Execute an RV32M instruction.
///
/// Returns the absolute next PC on success. Division by zero and overflow
/// never trap; their results follow the RISC-V specification.
///
/// # Errors
///
/// Returns [`EmuError::IllegalFunction`] if the instruction is not an
/// M-extension operation.
#[inline]
pub(crate) fn execute_rv32m(inst: Instruction, cpu: &mut Cpu, pc: u32) -> EmuResult<u32> {
    let next_pc = pc.wrapping_add(4);

    match inst {
        // ==================== Multiplication ====================

        // MUL: Lower 32 bits of signed x signed
        Instruction::Mul { rd, rs1, rs2 } => {
            let a = cpu.read_reg(rs1);
            let b = cpu.read_reg(rs2);
            let result = a.wrapping_mul(b);
            cpu.write_reg(rd, result);
            Ok(next_pc)
        }

        // MULH: Upper 32 bits of signed x signed
        Instruction::Mulh { rd, rs1, rs2 } => {
            let a = cpu.read_reg(rs1) as i32 as i64;
            let b = cpu.read_reg(rs2) as i32 as i64;
            let result = ((a * b) >> 32) as u32;
            cpu.write_reg(rd, result);
            Ok(next_pc)
        }

        // MULHU: Upper 32 bits of unsigned x unsigned
        Instruction::Mulhu { rd, rs1, rs2 } => {
            let a = cpu.read_reg(rs1) as u64;
            let b = cpu.read_reg(rs2) as u64;
            let result = ((a * b) >> 32) as u32;
            cpu.write_reg(rd, result);
            Ok(next_pc)
        }

        // MULHSU: Upper 32 bits of signed x unsigned
        Instruction::Mulhsu { rd, rs1, rs2 } => {
            let a = cpu.read_reg(rs1) as i32 as i64;
            let b = cpu.read_reg(rs2) as u64 as i64;
            let result = ((a * b) >> 32) as u32;
            cpu.write_reg(rd, result);
            Ok(next_pc)
        }

        // ==================== Division ====================
        // Per RISC-V spec:
        // - Division by zero: quotient = all 1s, remainder = dividend
        // - Overflow (MIN / -1): quotient = MIN, remainder = 0

        // DIV: Signed division
        Instruction::Div { rd, rs1, rs2 } => {
            let dividend = cpu.read_reg(rs1) as i32;
            let divisor = cpu.read_reg(rs2) as i32;

            let result = if divisor == 0 {
                u32::MAX
            } else if dividend == i32::MIN && divisor == -1 {
                dividend as u32
            } else {
                (dividend / divisor) as u32
            };

            cpu.write_reg(rd, result);
            Ok(next_pc)
        }

        // DIVU: Unsigned division
        Instruction::Divu { rd, rs1, rs2 } => {
            let dividend = cpu.read_reg(rs1);
            let divisor = cpu.read_reg(rs2);

            let result = if divisor == 0 {
                u32::MAX
            } else {
                dividend / divisor
            };

            cpu.write_reg(rd, result);
            Ok(next_pc)
        }

        // REM: Signed remainder
        Instruction::Rem { rd, rs1, rs2 } => {
            let dividend = cpu.read_reg(rs1) as i32;
            let divisor = cpu.read_reg(rs2) as i32;

            let result = if divisor == 0 {
                dividend as u32
            } else if dividend == i32::MIN && divisor == -1 {
                0
            } else {
                (dividend % divisor) as u32
            };

            cpu.write_reg(rd, result);
            Ok(next_pc)
        }

        // REMU: Unsigned remainder
        Instruction::Remu { rd, rs1, rs2 } => {
            let dividend = cpu.read_reg(rs1);
            let divisor = cpu.read_reg(rs2);

            let result = if divisor == 0 {
                dividend
            } else {
                dividend % divisor
            };

            cpu.write_reg(rd, result);
            Ok(next_pc)
        }

        _ => Err(EmuError::IllegalFunction { word: 0 }),
    }
}
