use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// Relative jump helper used by JR/JR cc.
    ///
    /// The displacement is a signed 8-bit offset relative to the address
    /// following the operand, which is where PC already points.
    pub(super) fn jr(&mut self, offset: u8) {
        self.regs.pc = self.regs.pc.wrapping_add(offset as i8 as u16);
    }

    /// CALL and RST: push the return address, then jump.
    pub(super) fn call<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = addr;
    }

    pub(super) fn ret<B: Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.pop_u16(bus);
    }

    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) {
        self.ret(bus);
        self.interrupts.enable_now();
    }
}
