use super::{Cpu, CpuConfig, InterruptController, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// A core in the post-boot DMG state with the default configuration.
    pub fn new() -> Self {
        Self::with_config(CpuConfig::default())
    }

    pub fn with_config(config: CpuConfig) -> Self {
        Self {
            regs: Registers::power_on(),
            interrupts: InterruptController::new(),
            config,
            halt_bug: false,
            locked: None,
        }
    }

    /// Reset the CPU to its power-on state.
    ///
    /// Registers take the values the DMG boot ROM leaves behind when it
    /// hands control to cartridge code at 0x0100 (A=01 F=B0 BC=0013
    /// DE=00D8 HL=014D SP=FFFE). IME is clear, the core is RUNNING and any
    /// lock from an invalid opcode is released. Memory behind the bus is
    /// untouched.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.interrupts.reset();
        self.halt_bug = false;
        self.locked = None;
        log::debug!("CPU reset");
    }
}
