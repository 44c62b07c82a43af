use crate::cpu::{alu, Bus, Cpu, R16, R8};

impl Cpu {
    pub(super) fn exec_inc8<B: Bus>(&mut self, bus: &mut B, reg: R8) {
        let value = self.read_r8(bus, reg);
        let result = alu::inc8(value, self.regs.f);
        self.regs.f = result.flags;
        self.write_r8(bus, reg, result.value);
    }

    pub(super) fn exec_dec8<B: Bus>(&mut self, bus: &mut B, reg: R8) {
        let value = self.read_r8(bus, reg);
        let result = alu::dec8(value, self.regs.f);
        self.regs.f = result.flags;
        self.write_r8(bus, reg, result.value);
    }

    /// 16-bit INC/DEC never touch the flags.
    pub(super) fn exec_inc16(&mut self, reg: R16) {
        let value = self.read_r16(reg).wrapping_add(1);
        self.write_r16(reg, value);
    }

    pub(super) fn exec_dec16(&mut self, reg: R16) {
        let value = self.read_r16(reg).wrapping_sub(1);
        self.write_r16(reg, value);
    }
}
