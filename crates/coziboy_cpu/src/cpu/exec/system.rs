use crate::cpu::Cpu;

impl Cpu {
    pub(super) fn exec_halt(&mut self) {
        if !self.interrupts.ime() && !self.interrupts.pending().is_empty() {
            // HALT bug: with IME clear and an interrupt already pending the
            // CPU does not halt, and the next opcode fetch does not
            // increment PC.
            if self.config.halt_bug {
                log::trace!("CPU HALT bug at pc=0x{:04X}", self.regs.pc);
                self.halt_bug = true;
            }
            return;
        }
        self.interrupts.halt();
    }

    pub(super) fn exec_stop(&mut self) {
        // The padding byte has already been fetched as the operand. STOP
        // ignores interrupts and is left only through `Cpu::wake`.
        log::debug!("CPU entering STOP at pc=0x{:04X}", self.regs.pc);
        self.interrupts.stop();
    }

    pub(super) fn exec_di(&mut self) {
        self.interrupts.disable();
    }

    pub(super) fn exec_ei(&mut self) {
        // IME becomes 1 after the *next* instruction completes.
        self.interrupts.schedule_enable();
    }
}
