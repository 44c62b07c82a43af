use crate::cpu::{Bus, Cpu, Indirect};

impl Cpu {
    /// Resolve an indirect operand to its address, applying the HL
    /// post-increment/decrement for `(HL+)`/`(HL-)`.
    fn indirect_addr(&mut self, ind: Indirect) -> u16 {
        match ind {
            Indirect::BC => self.regs.bc(),
            Indirect::DE => self.regs.de(),
            Indirect::HlInc => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            Indirect::HlDec => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(super) fn exec_ld_indirect_a<B: Bus>(&mut self, bus: &mut B, ind: Indirect) {
        let addr = self.indirect_addr(ind);
        let a = self.regs.a;
        self.write8(bus, addr, a);
    }

    pub(super) fn exec_ld_a_indirect<B: Bus>(&mut self, bus: &mut B, ind: Indirect) {
        let addr = self.indirect_addr(ind);
        self.regs.a = self.read8(bus, addr);
    }

    /// LD (a16),SP: low byte at a16, high byte at a16+1.
    pub(super) fn exec_ld_a16_sp<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let [lo, hi] = self.regs.sp.to_le_bytes();
        self.write8(bus, addr, lo);
        self.write8(bus, addr.wrapping_add(1), hi);
    }

    /// Shared by LDH (a8),A, LD (C),A and LD (a16),A.
    pub(super) fn exec_store_a<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let a = self.regs.a;
        self.write8(bus, addr, a);
    }

    /// Shared by LDH A,(a8), LD A,(C) and LD A,(a16).
    pub(super) fn exec_load_a<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        self.regs.a = self.read8(bus, addr);
    }
}
