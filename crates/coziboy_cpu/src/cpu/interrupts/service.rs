use super::super::{Bus, Cpu};

/// Interrupt entry costs five machine cycles.
pub(in crate::cpu) const INTERRUPT_CYCLES: u32 = 20;

impl Cpu {
    /// Dispatch a maskable interrupt if IME is set and an enabled interrupt
    /// is pending.
    ///
    /// Returns `Some(cycles)` if an interrupt was taken, or `None` otherwise.
    pub(in crate::cpu) fn handle_interrupts<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        if !self.interrupts.ime() {
            return None;
        }
        let interrupt = self.interrupts.next_pending()?;

        // IME and the IF bit are cleared before the push, so a push that
        // lands on IE/IF (SP near the top of memory) sees the new state.
        self.interrupts.acknowledge(interrupt);

        let mut pc = self.regs.pc;
        if self.halt_bug {
            // `EI; HALT` with a request already pending: the interrupt is
            // taken instead of the double fetch, and it returns to the HALT
            // itself.
            self.halt_bug = false;
            pc = pc.wrapping_sub(1);
        }
        self.push_u16(bus, pc);
        self.regs.pc = interrupt.vector();

        log::debug!(
            "CPU interrupt: {:?} vector=0x{:04X} pc=0x{:04X} sp=0x{:04X} IF=0x{:02X} IE=0x{:02X}",
            interrupt,
            interrupt.vector(),
            pc,
            self.regs.sp,
            self.interrupts.read_if(),
            self.interrupts.read_ie(),
        );

        Some(INTERRUPT_CYCLES)
    }
}
