//! Sharp LR35902 (DMG Game Boy) CPU core.
//!
//! The core executes one instruction (or one interrupt entry, or one idle
//! HALT/STOP tick) per [`Cpu::step`] call and reports its cost in T-cycles.
//! Everything outside the CPU is reached through the [`Bus`] trait, except
//! IE ($FFFF) and IF ($FF0F), which live in the core's
//! [`InterruptController`].

pub mod alu;
mod bus;
mod cb;
mod config;
mod disasm;
mod error;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod step;
mod table;

#[cfg(test)]
mod tests;

pub use bus::{Bus, BusFault};
pub use config::CpuConfig;
pub use disasm::disassemble;
pub use error::CpuError;
pub use interrupts::{
    IE_ADDR, IF_ADDR, Interrupt, InterruptController, InterruptFlags, RunMode,
};
pub use regs::{Flags, Reg16, Reg8, Registers};
pub use table::{
    CB_PREFIX, Cond, Indirect, Instruction, Op, R16, R16Stack, R8, UNDEFINED_OPCODES,
    base_instruction, cb_instruction,
};

/// LR35902 CPU state.
///
/// The CPU owns no memory; every access goes through the [`Bus`] passed to
/// [`Cpu::step`].
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    pub interrupts: InterruptController,
    config: CpuConfig,
    /// HALT bug latch: the next opcode fetch does not advance PC.
    halt_bug: bool,
    /// Set once an undefined opcode was hit in strict mode; the core stays
    /// dead until [`Cpu::reset`].
    locked: Option<CpuError>,
}

impl Cpu {
    #[inline]
    pub fn config(&self) -> CpuConfig {
        self.config
    }

    #[inline]
    pub fn ime(&self) -> bool {
        self.interrupts.ime()
    }

    #[inline]
    pub fn mode(&self) -> RunMode {
        self.interrupts.mode()
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.interrupts.mode() == RunMode::Halted
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.interrupts.mode() == RunMode::Stopped
    }

    /// The error that locked the core, if any.
    #[inline]
    pub fn locked(&self) -> Option<&CpuError> {
        self.locked.as_ref()
    }

    /// Raise an interrupt request line (sets the matching IF bit).
    pub fn request_interrupt(&mut self, interrupt: Interrupt) {
        self.interrupts.request(interrupt);
    }

    /// Write the IE register.
    pub fn set_interrupt_enable(&mut self, value: u8) {
        self.interrupts.write_ie(value);
    }

    pub fn interrupt_enable(&self) -> u8 {
        self.interrupts.read_ie()
    }

    /// IF as software reads it (upper three bits set).
    pub fn interrupt_flags(&self) -> u8 {
        self.interrupts.read_if()
    }

    /// External wake signal for STOP. Returns whether the core was stopped.
    pub fn wake(&mut self) -> bool {
        let woke = self.interrupts.wake();
        if woke {
            log::debug!("CPU woke from STOP at pc=0x{:04X}", self.regs.pc);
        }
        woke
    }

    /// Register dump, one register pair per line.
    pub fn dump_registers(&self) -> String {
        self.regs.to_string()
    }
}
