use crate::cpu::alu::{self, AluOp, ShiftOp};
use crate::cpu::{Cpu, R16};

impl Cpu {
    pub(super) fn exec_alu(&mut self, op: AluOp, value: u8) {
        let result = alu::alu8(op, self.regs.a, value, self.regs.f);
        self.regs.a = result.value;
        self.regs.f = result.flags;
    }

    pub(super) fn exec_rotate_a(&mut self, op: ShiftOp) {
        let result = alu::rotate_accumulator(op, self.regs.a, self.regs.f);
        self.regs.a = result.value;
        self.regs.f = result.flags;
    }

    pub(super) fn exec_add_hl_rr(&mut self, reg: R16) {
        let value = self.read_r16(reg);
        let (result, flags) = alu::add16_hl(self.regs.hl(), value, self.regs.f);
        self.regs.set_hl(result);
        self.regs.f = flags;
    }

    pub(super) fn exec_add_sp_r8(&mut self, imm: u8) {
        let (result, flags) = alu::add16_signed(self.regs.sp, imm);
        self.regs.sp = result;
        self.regs.f = flags;
    }

    pub(super) fn exec_ld_hl_sp_r8(&mut self, imm: u8) {
        let (result, flags) = alu::add16_signed(self.regs.sp, imm);
        self.regs.set_hl(result);
        self.regs.f = flags;
    }

    pub(super) fn exec_daa(&mut self) {
        let result = alu::daa(self.regs.a, self.regs.f);
        self.regs.a = result.value;
        self.regs.f = result.flags;
    }

    pub(super) fn exec_cpl(&mut self) {
        let result = alu::cpl(self.regs.a, self.regs.f);
        self.regs.a = result.value;
        self.regs.f = result.flags;
    }

    pub(super) fn exec_scf(&mut self) {
        self.regs.f = alu::scf(self.regs.f);
    }

    pub(super) fn exec_ccf(&mut self) {
        self.regs.f = alu::ccf(self.regs.f);
    }
}
