use super::alu::{self, ShiftOp};
use super::{Bus, Cpu, R8};

/// CB-prefixed instructions (bit operations, shifts, and rotates).
impl Cpu {
    pub(super) fn exec_cb_shift<B: Bus>(&mut self, bus: &mut B, op: ShiftOp, reg: R8) {
        let value = self.read_r8(bus, reg);
        let result = alu::shift(op, value, self.regs.f);
        self.regs.f = result.flags;
        self.write_r8(bus, reg, result.value);
    }

    /// BIT b,r only reads; (HL) is never written back.
    pub(super) fn exec_cb_bit<B: Bus>(&mut self, bus: &mut B, bit: u8, reg: R8) {
        let value = self.read_r8(bus, reg);
        self.regs.f = alu::bit(bit, value, self.regs.f);
    }

    pub(super) fn exec_cb_res<B: Bus>(&mut self, bus: &mut B, bit: u8, reg: R8) {
        let value = self.read_r8(bus, reg);
        self.write_r8(bus, reg, value & !(1 << bit));
    }

    pub(super) fn exec_cb_set<B: Bus>(&mut self, bus: &mut B, bit: u8, reg: R8) {
        let value = self.read_r8(bus, reg);
        self.write_r8(bus, reg, value | (1 << bit));
    }
}
