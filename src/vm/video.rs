//! The memory-mapped video port.
//!
//! Three little-endian halfwords starting at [`PORT_ADDR`]: an update flag
//! and the ball's left/top coordinates. The guest raises the flag after
//! writing new coordinates; the host reads them and clears the flag between
//! steps. To the executor this window is ordinary memory - all traffic goes
//! through the same [`Memory`] accessors as any load or store.

use serde::Serialize;

use crate::error::EmuResult;
use crate::vm::memory::Memory;

/// Guest address of the `to_be_updated` flag (u16).
pub const PORT_ADDR: u32 = 0x1B00;

/// Guest address of the ball's x coordinate (u16).
pub const BALL_LEFT_ADDR: u32 = 0x1B02;

/// Guest address of the ball's y coordinate (u16).
pub const BALL_TOP_ADDR: u32 = 0x1B04;

/// A ball position read from the video port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BallPosition {
    /// X coordinate (pixels from the left edge).
    pub left: u16,
    /// Y coordinate (pixels from the top edge).
    pub top: u16,
}

/// Poll the port: if the update flag is raised, read the coordinates and
/// clear the flag.
///
/// Machines too small to contain the port always report `None`.
pub(crate) fn poll(memory: &mut Memory) -> EmuResult<Option<BallPosition>> {
    if memory.size() < BALL_TOP_ADDR + 2 {
        return Ok(None);
    }

    if memory.load_u16(PORT_ADDR)? == 0 {
        return Ok(None);
    }

    let left = memory.load_u16(BALL_LEFT_ADDR)?;
    let top = memory.load_u16(BALL_TOP_ADDR)?;
    memory.store_u16(PORT_ADDR, 0)?;

    Ok(Some(BallPosition { left, top }))
}
