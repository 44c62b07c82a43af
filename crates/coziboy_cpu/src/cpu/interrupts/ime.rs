use super::InterruptController;

impl InterruptController {
    /// EI: IME becomes 1 after the *next* instruction completes.
    #[inline]
    pub(in crate::cpu) fn schedule_enable(&mut self) {
        self.ime_enable_pending = true;
    }

    /// DI: clear IME synchronously and drop any EI still in flight.
    #[inline]
    pub(in crate::cpu) fn disable(&mut self) {
        self.ime = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
    }

    /// RETI: IME is set immediately, without the EI delay.
    #[inline]
    pub(in crate::cpu) fn enable_now(&mut self) {
        self.ime = true;
    }

    /// Apply delayed IME change requested by EI.
    ///
    /// Called once after every executed instruction.
    #[inline]
    pub(in crate::cpu) fn apply_ime_delay(&mut self) {
        if self.ime_enable_delay {
            // Second step after EI: actually enable IME.
            self.ime = true;
            self.ime_enable_delay = false;
        } else if self.ime_enable_pending {
            // End of EI itself: arm the delayed enable.
            self.ime_enable_pending = false;
            self.ime_enable_delay = true;
        }
    }
}
