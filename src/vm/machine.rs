//! The machine facade: load, reset, step, goto, and the host-visible views.

use crate::error::{EmuError, EmuResult};
use crate::isa;
use crate::vm::cpu::Cpu;
use crate::vm::memory::Memory;
use crate::vm::video::{self, BallPosition};

/// An RV32I+M machine.
///
/// Owns the CPU state and (once [`Vm::load`] has been called) the guest
/// memory. The host drives it one [`Vm::step`] at a time and inspects
/// registers, PC, and memory between steps; nothing runs unless the host
/// asks for it.
#[derive(Debug, Clone, Default)]
pub struct Vm {
    cpu: Cpu,
    memory: Option<Memory>,
}

impl Vm {
    /// Create a machine with no program loaded.
    ///
    /// `step` and `goto` return [`EmuError::NotLoaded`] until [`Vm::load`]
    /// binds a memory image.
    #[must_use]
    pub fn new() -> Self {
        Vm {
            cpu: Cpu::new(),
            memory: None,
        }
    }

    /// Bind a program image and initial machine state.
    ///
    /// Allocates `mem_size` bytes of guest memory, copies `image` to
    /// address 0, installs the `[text_start, text_end)` code range, and sets
    /// PC = `pc0`, x2 = `sp0`, every other register 0.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::SegmentationFault`] if the image does not fit in
    /// `mem_size` bytes.
    pub fn load(
        &mut self,
        image: &[u8],
        mem_size: u32,
        pc0: u32,
        sp0: u32,
        text_start: u32,
        text_end: u32,
    ) -> EmuResult<()> {
        let memory = Memory::with_image(image, mem_size, text_start, text_end)?;
        self.memory = Some(memory);
        self.cpu.reset(pc0, sp0);
        Ok(())
    }

    /// Return the machine to its initial state without touching memory.
    ///
    /// All registers become 0, then PC = `pc0` and x2 = `sp0`. Works before
    /// `load` too; it just resets the CPU.
    pub fn reset(&mut self, pc0: u32, sp0: u32) {
        self.cpu.reset(pc0, sp0);
    }

    /// Relocate the PC inside the text segment.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::NotLoaded`] before `load`, and
    /// [`EmuError::InvalidTarget`] if `pc` is outside the text range.
    pub fn goto(&mut self, pc: u32) -> EmuResult<()> {
        let memory = self.memory.as_ref().ok_or(EmuError::NotLoaded)?;

        if pc < memory.text_start() || pc >= memory.text_end() {
            return Err(EmuError::InvalidTarget { pc });
        }

        self.cpu.pc = pc;
        Ok(())
    }

    /// Execute the instruction at the PC.
    ///
    /// Fetches the word at the PC, decodes it, applies its effect, and
    /// stores the executor's next PC. On error the machine is left in
    /// whatever partial state preceded the failure; the host should treat
    /// an errored step as non-atomic.
    ///
    /// # Errors
    ///
    /// [`EmuError::NotLoaded`] before `load`; [`EmuError::SegmentationFault`]
    /// when the PC is outside the text range or a memory access is out of
    /// bounds; [`EmuError::TextSegmentWrite`] for stores into the text
    /// range; [`EmuError::IllegalOpcode`]/[`EmuError::IllegalFunction`] from
    /// the decoder.
    pub fn step(&mut self) -> EmuResult<()> {
        let memory = self.memory.as_mut().ok_or(EmuError::NotLoaded)?;
        let pc = self.cpu.pc;

        if pc < memory.text_start() || pc >= memory.text_end() {
            return Err(EmuError::SegmentationFault { addr: pc });
        }

        let word = memory.fetch(pc)?;
        let inst = isa::decode(word)?;
        self.cpu.pc = isa::execute(inst, &mut self.cpu, memory, pc)?;

        Ok(())
    }

    /// Current program counter.
    #[must_use]
    pub fn pc(&self) -> u32 {
        self.cpu.pc
    }

    /// Read-only view of the register file.
    #[must_use]
    pub fn registers(&self) -> &[u32; 32] {
        self.cpu.registers()
    }

    /// Read one register. x0 always reads 0.
    #[must_use]
    pub fn read_reg(&self, reg: u8) -> u32 {
        self.cpu.read_reg(reg)
    }

    /// Set the entire register file (for testing/differential comparison).
    pub fn set_registers(&mut self, regs: [u32; 32]) {
        self.cpu.set_registers(regs);
    }

    /// The instruction word the PC points at.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::NotLoaded`] before `load`, or
    /// [`EmuError::SegmentationFault`] if the PC is out of bounds.
    pub fn instruction(&self) -> EmuResult<u32> {
        let memory = self.memory.as_ref().ok_or(EmuError::NotLoaded)?;
        memory.fetch(self.cpu.pc)
    }

    /// Read-only view of guest memory for debugger display.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::NotLoaded`] before `load`.
    pub fn memory(&self) -> EmuResult<&Memory> {
        self.memory.as_ref().ok_or(EmuError::NotLoaded)
    }

    /// Whether a program image is bound.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.memory.is_some()
    }

    /// Poll the video port, clearing its update flag.
    ///
    /// Returns the new ball position when the guest has raised the
    /// `to_be_updated` flag since the last poll, `None` otherwise (also for
    /// machines too small to contain the port). Intended to be called by
    /// the host between steps.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::NotLoaded`] before `load`, or
    /// [`EmuError::TextSegmentWrite`] if the port lies inside the text
    /// range (a misconfigured machine).
    pub fn poll_video(&mut self) -> EmuResult<Option<BallPosition>> {
        let memory = self.memory.as_mut().ok_or(EmuError::NotLoaded)?;
        video::poll(memory)
    }
}
