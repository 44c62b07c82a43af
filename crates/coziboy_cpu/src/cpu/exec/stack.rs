use crate::cpu::{Bus, Cpu, R16Stack};

impl Cpu {
    pub(super) fn exec_push<B: Bus>(&mut self, bus: &mut B, reg: R16Stack) {
        let value = match reg {
            R16Stack::BC => self.regs.bc(),
            R16Stack::DE => self.regs.de(),
            R16Stack::HL => self.regs.hl(),
            R16Stack::AF => self.regs.af(),
        };
        self.push_u16(bus, value);
    }

    pub(super) fn exec_pop<B: Bus>(&mut self, bus: &mut B, reg: R16Stack) {
        let value = self.pop_u16(bus);
        match reg {
            R16Stack::BC => self.regs.set_bc(value),
            R16Stack::DE => self.regs.set_de(value),
            R16Stack::HL => self.regs.set_hl(value),
            // set_af drops the low nibble of F.
            R16Stack::AF => self.regs.set_af(value),
        }
    }
}
