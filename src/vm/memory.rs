//! Guest memory with load/store operations and text-segment protection.
//!
//! The truncation warnings are allowed because this is a 32-bit machine that
//! enforces memory size limits at construction time.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

use crate::error::{EmuError, EmuResult};

/// Guest memory for one machine.
///
/// A flat byte buffer addressed from 0, carrying the half-open
/// `[text_start, text_end)` range that designates code. Stores whose target
/// address lies inside that range are rejected; loads (and instruction
/// fetch) from it are permitted. All multi-byte accesses are little-endian
/// per the RISC-V specification, and natural alignment is not enforced.
#[derive(Debug, Clone)]
pub struct Memory {
    /// Backing storage.
    data: Vec<u8>,

    /// First byte of the text segment.
    text_start: u32,

    /// One past the last byte of the text segment.
    text_end: u32,
}

impl Memory {
    /// Create a zeroed memory of the given size with an empty text range.
    ///
    /// Useful for exercising the executor directly; a machine built through
    /// [`crate::Vm::load`] uses [`Memory::with_image`] instead.
    #[must_use]
    pub fn new(size: u32) -> Self {
        Memory {
            data: vec![0u8; size as usize],
            text_start: 0,
            text_end: 0,
        }
    }

    /// Create a memory of `size` bytes holding `image` at address 0, with
    /// the given text range installed.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::SegmentationFault`] at `size` if the image does
    /// not fit.
    pub fn with_image(
        image: &[u8],
        size: u32,
        text_start: u32,
        text_end: u32,
    ) -> EmuResult<Self> {
        if image.len() > size as usize {
            return Err(EmuError::SegmentationFault { addr: size });
        }

        let mut data = vec![0u8; size as usize];
        data[..image.len()].copy_from_slice(image);

        Ok(Memory {
            data,
            text_start,
            text_end,
        })
    }

    /// Get the size of guest memory in bytes.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }

    /// First byte of the text segment.
    #[must_use]
    pub fn text_start(&self) -> u32 {
        self.text_start
    }

    /// One past the last byte of the text segment.
    #[must_use]
    pub fn text_end(&self) -> u32 {
        self.text_end
    }

    /// Check that `[addr, addr + len)` lies inside guest memory.
    #[inline]
    fn check_bounds(&self, addr: u32, len: u32) -> EmuResult<usize> {
        let end = u64::from(addr) + u64::from(len);

        if end > self.data.len() as u64 {
            return Err(EmuError::SegmentationFault { addr });
        }

        Ok(addr as usize)
    }

    /// Check a store: bounds first, then text-segment protection on the
    /// store's start address.
    #[inline]
    fn check_store(&self, addr: u32, len: u32) -> EmuResult<usize> {
        let offset = self.check_bounds(addr, len)?;

        if addr >= self.text_start && addr < self.text_end {
            return Err(EmuError::TextSegmentWrite { addr });
        }

        Ok(offset)
    }

    /// Load a byte (8-bit) from memory.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::SegmentationFault`] if the address is out of
    /// bounds.
    #[inline]
    pub fn load_u8(&self, addr: u32) -> EmuResult<u8> {
        let offset = self.check_bounds(addr, 1)?;
        Ok(self.data[offset])
    }

    /// Load a halfword (16-bit) from memory, little-endian.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::SegmentationFault`] if the address is out of
    /// bounds.
    #[inline]
    pub fn load_u16(&self, addr: u32) -> EmuResult<u16> {
        let offset = self.check_bounds(addr, 2)?;
        Ok(u16::from_le_bytes([
            self.data[offset],
            self.data[offset + 1],
        ]))
    }

    /// Load a word (32-bit) from memory, little-endian.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::SegmentationFault`] if the address is out of
    /// bounds.
    #[inline]
    pub fn load_u32(&self, addr: u32) -> EmuResult<u32> {
        let offset = self.check_bounds(addr, 4)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[offset..offset + 4]);
        Ok(u32::from_le_bytes(bytes))
    }

    /// Load a byte and sign-extend it to 32 bits.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::SegmentationFault`] if the address is out of
    /// bounds.
    #[inline]
    pub fn load_i8(&self, addr: u32) -> EmuResult<u32> {
        let value = self.load_u8(addr)?;
        Ok((value as i8) as i32 as u32)
    }

    /// Load a halfword and sign-extend it to 32 bits.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::SegmentationFault`] if the address is out of
    /// bounds.
    #[inline]
    pub fn load_i16(&self, addr: u32) -> EmuResult<u32> {
        let value = self.load_u16(addr)?;
        Ok((value as i16) as i32 as u32)
    }

    /// Store a byte (8-bit) to memory.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::SegmentationFault`] if the address is out of
    /// bounds, or [`EmuError::TextSegmentWrite`] if it lies inside the text
    /// segment.
    #[inline]
    pub fn store_u8(&mut self, addr: u32, value: u8) -> EmuResult<()> {
        let offset = self.check_store(addr, 1)?;
        self.data[offset] = value;
        Ok(())
    }

    /// Store a halfword (16-bit) to memory, little-endian.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::SegmentationFault`] if the address is out of
    /// bounds, or [`EmuError::TextSegmentWrite`] if it lies inside the text
    /// segment.
    #[inline]
    pub fn store_u16(&mut self, addr: u32, value: u16) -> EmuResult<()> {
        let offset = self.check_store(addr, 2)?;
        self.data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Store a word (32-bit) to memory, little-endian.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::SegmentationFault`] if the address is out of
    /// bounds, or [`EmuError::TextSegmentWrite`] if it lies inside the text
    /// segment.
    #[inline]
    pub fn store_u32(&mut self, addr: u32, value: u32) -> EmuResult<()> {
        let offset = self.check_store(addr, 4)?;
        self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Fetch an instruction word.
    ///
    /// Identical bounds behaviour to `load_u32`; fetching from the text
    /// segment is of course permitted.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::SegmentationFault`] if the address is out of
    /// bounds.
    #[inline]
    pub fn fetch(&self, addr: u32) -> EmuResult<u32> {
        self.load_u32(addr)
    }

    /// Read-only raw view of `[addr, addr + len)` for debugger display.
    ///
    /// # Errors
    ///
    /// Returns [`EmuError::SegmentationFault`] if the range is out of
    /// bounds.
    #[inline]
    pub fn view(&self, addr: u32, len: u32) -> EmuResult<&[u8]> {
        let offset = self.check_bounds(addr, len)?;
        Ok(&self.data[offset..offset + len as usize])
    }
}
