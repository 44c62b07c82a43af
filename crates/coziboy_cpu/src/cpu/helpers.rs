use super::{Bus, Cond, Cpu, Flags, IE_ADDR, IF_ADDR, R8, R16};

impl Cpu {
    /// Data read as the CPU sees it: IE and IF are answered by the
    /// interrupt controller, everything else by the bus.
    #[inline]
    pub(super) fn read8<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u8 {
        match addr {
            IF_ADDR => self.interrupts.read_if(),
            IE_ADDR => self.interrupts.read_ie(),
            _ => bus.read8(addr),
        }
    }

    #[inline]
    pub(super) fn write8<B: Bus>(&mut self, bus: &mut B, addr: u16, value: u8) {
        match addr {
            IF_ADDR => self.interrupts.write_if(value),
            IE_ADDR => self.interrupts.write_ie(value),
            _ => bus.write8(addr, value),
        }
    }

    /// Read an 8-bit register or (HL).
    #[inline]
    pub(super) fn read_r8<B: Bus>(&mut self, bus: &mut B, reg: R8) -> u8 {
        match reg {
            R8::B => self.regs.b,
            R8::C => self.regs.c,
            R8::D => self.regs.d,
            R8::E => self.regs.e,
            R8::H => self.regs.h,
            R8::L => self.regs.l,
            R8::HlInd => {
                let addr = self.regs.hl();
                self.read8(bus, addr)
            }
            R8::A => self.regs.a,
        }
    }

    /// Write an 8-bit register or (HL). The encoding matches `read_r8`.
    #[inline]
    pub(super) fn write_r8<B: Bus>(&mut self, bus: &mut B, reg: R8, value: u8) {
        match reg {
            R8::B => self.regs.b = value,
            R8::C => self.regs.c = value,
            R8::D => self.regs.d = value,
            R8::E => self.regs.e = value,
            R8::H => self.regs.h = value,
            R8::L => self.regs.l = value,
            R8::HlInd => {
                let addr = self.regs.hl();
                self.write8(bus, addr, value);
            }
            R8::A => self.regs.a = value,
        }
    }

    #[inline]
    pub(super) fn read_r16(&self, reg: R16) -> u16 {
        match reg {
            R16::BC => self.regs.bc(),
            R16::DE => self.regs.de(),
            R16::HL => self.regs.hl(),
            R16::SP => self.regs.sp,
        }
    }

    #[inline]
    pub(super) fn write_r16(&mut self, reg: R16, value: u16) {
        match reg {
            R16::BC => self.regs.set_bc(value),
            R16::DE => self.regs.set_de(value),
            R16::HL => self.regs.set_hl(value),
            R16::SP => self.regs.sp = value,
        }
    }

    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let pc = self.regs.pc;
        let value = self.read8(bus, pc);
        if self.halt_bug {
            // HALT bug: the first opcode fetch after the bug does not
            // increment PC. We consume the bug here.
            self.halt_bug = false;
        } else {
            self.regs.pc = pc.wrapping_add(1);
        }
        value
    }

    /// Fetch `len` operand bytes (0, 1 or 2) as a little-endian value.
    #[inline]
    pub(super) fn fetch_operands<B: Bus>(&mut self, bus: &mut B, len: u8) -> u16 {
        match len {
            0 => 0,
            1 => self.fetch8(bus) as u16,
            _ => {
                let lo = self.fetch8(bus);
                let hi = self.fetch8(bus);
                u16::from_le_bytes([lo, hi])
            }
        }
    }

    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        // Stack grows downward. We want memory[SP] = low, memory[SP+1] = high.
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        let sp = self.regs.sp;
        self.write8(bus, sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        let sp = self.regs.sp;
        self.write8(bus, sp, lo);
    }

    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let sp = self.regs.sp;
        let lo = self.read8(bus, sp);
        let hi = self.read8(bus, sp.wrapping_add(1));
        self.regs.sp = sp.wrapping_add(2);
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    pub(super) fn cc_condition(&self, cc: Cond) -> bool {
        match cc {
            Cond::NZ => !self.regs.flag(Flags::Z),
            Cond::Z => self.regs.flag(Flags::Z),
            Cond::NC => !self.regs.flag(Flags::C),
            Cond::C => self.regs.flag(Flags::C),
        }
    }
}
