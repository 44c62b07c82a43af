//! Instruction-level emulation of the Sharp LR35902, the CPU of the
//! original Game Boy.
//!
//! The [`Cpu`] executes one instruction per [`Cpu::step`] against any
//! [`Bus`] implementation and reports the cost in T-cycles. [`FlatMemory`]
//! is a ready-made 64 KiB bus.

pub mod cpu;
pub mod memory;

pub use cpu::{Bus, BusFault, Cpu, CpuConfig, CpuError, Interrupt, RunMode};
pub use memory::FlatMemory;

/// T-cycles per DMG video frame (154 lines of 456 dots).
pub const CYCLES_PER_FRAME: u32 = 70_224;
