use thiserror::Error;

use super::BusFault;

/// Failures surfaced by [`Cpu::step`](super::Cpu::step).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CpuError {
    /// One of the opcode holes (D3, DB, DD, E3, E4, EB, EC, ED, F4, FC, FD)
    /// was fetched. Real hardware locks up; the core stops dispatching
    /// until `reset`.
    #[error("invalid opcode 0x{opcode:02X} at 0x{addr:04X}")]
    InvalidOpcode { opcode: u8, addr: u16 },

    #[error(transparent)]
    BusFault(#[from] BusFault),
}
