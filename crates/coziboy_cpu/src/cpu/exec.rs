mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::{Bus, Cpu, Instruction, Op};

impl Cpu {
    /// Execute a decoded instruction whose operand bytes have already been
    /// fetched, and return the number of cycles it took.
    ///
    /// `operand` holds the little-endian immediate (zero-extended for one
    /// byte, zero when the instruction has none). Conditional instructions
    /// return `cycles_taken` when their condition holds.
    pub(super) fn execute<B: Bus>(&mut self, bus: &mut B, instr: &Instruction, operand: u16) -> u32 {
        let imm8 = operand as u8;

        match instr.op {
            Op::Nop => {}
            Op::Stop => self.exec_stop(),
            Op::Halt => self.exec_halt(),
            Op::Di => self.exec_di(),
            Op::Ei => self.exec_ei(),

            // Loads.
            Op::LdR16Imm(rr) => self.write_r16(rr, operand),
            Op::LdIndA(ind) => self.exec_ld_indirect_a(bus, ind),
            Op::LdAInd(ind) => self.exec_ld_a_indirect(bus, ind),
            Op::LdImm16Sp => self.exec_ld_a16_sp(bus, operand),
            Op::LdR8Imm(r) => self.write_r8(bus, r, imm8),
            Op::LdR8R8 { dst, src } => {
                let value = self.read_r8(bus, src);
                self.write_r8(bus, dst, value);
            }
            Op::LdhImmA => self.exec_store_a(bus, 0xFF00 | operand),
            Op::LdhAImm => self.exec_load_a(bus, 0xFF00 | operand),
            Op::LdhCA => self.exec_store_a(bus, 0xFF00 | self.regs.c as u16),
            Op::LdhAC => self.exec_load_a(bus, 0xFF00 | self.regs.c as u16),
            Op::LdImm16A => self.exec_store_a(bus, operand),
            Op::LdAImm16 => self.exec_load_a(bus, operand),
            Op::LdHlSpImm => self.exec_ld_hl_sp_r8(imm8),
            Op::LdSpHl => self.regs.sp = self.regs.hl(),

            // 16-bit arithmetic.
            Op::IncR16(rr) => self.exec_inc16(rr),
            Op::DecR16(rr) => self.exec_dec16(rr),
            Op::AddHlR16(rr) => self.exec_add_hl_rr(rr),
            Op::AddSpImm => self.exec_add_sp_r8(imm8),

            // 8-bit arithmetic and logic.
            Op::IncR8(r) => self.exec_inc8(bus, r),
            Op::DecR8(r) => self.exec_dec8(bus, r),
            Op::AluR8 { op, src } => {
                let value = self.read_r8(bus, src);
                self.exec_alu(op, value);
            }
            Op::AluImm(op) => self.exec_alu(op, imm8),
            Op::RotateA(op) => self.exec_rotate_a(op),
            Op::Daa => self.exec_daa(),
            Op::Cpl => self.exec_cpl(),
            Op::Scf => self.exec_scf(),
            Op::Ccf => self.exec_ccf(),

            // Control flow.
            Op::Jr => self.jr(imm8),
            Op::JrCond(cc) => {
                if self.cc_condition(cc) {
                    self.jr(imm8);
                    return instr.cycles_taken;
                }
            }
            Op::Jp => self.regs.pc = operand,
            Op::JpCond(cc) => {
                if self.cc_condition(cc) {
                    self.regs.pc = operand;
                    return instr.cycles_taken;
                }
            }
            Op::JpHl => self.regs.pc = self.regs.hl(),
            Op::Call => self.call(bus, operand),
            Op::CallCond(cc) => {
                if self.cc_condition(cc) {
                    self.call(bus, operand);
                    return instr.cycles_taken;
                }
            }
            Op::Ret => self.ret(bus),
            Op::RetCond(cc) => {
                if self.cc_condition(cc) {
                    self.ret(bus);
                    return instr.cycles_taken;
                }
            }
            Op::Reti => self.exec_reti(bus),
            Op::Rst(target) => self.call(bus, target as u16),

            // Stack.
            Op::Push(rr) => self.exec_push(bus, rr),
            Op::Pop(rr) => self.exec_pop(bus, rr),

            // CB-prefixed bit operations.
            Op::Shift { op, reg } => self.exec_cb_shift(bus, op, reg),
            Op::Bit { bit, reg } => self.exec_cb_bit(bus, bit, reg),
            Op::Res { bit, reg } => self.exec_cb_res(bus, bit, reg),
            Op::Set { bit, reg } => self.exec_cb_set(bus, bit, reg),
        }

        instr.cycles
    }
}
