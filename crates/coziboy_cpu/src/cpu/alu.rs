//! Flag/ALU engine.
//!
//! Every function here is pure: it takes operands plus the incoming flags
//! and returns the result together with the outgoing flags. Instruction
//! handlers write both back into the register file.

use super::Flags;

/// Result of an 8-bit ALU operation with flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluResult {
    pub value: u8,
    pub flags: Flags,
}

/// The eight accumulator operations encoded in opcodes 0x80–0xBF and in
/// the `op A,d8` immediates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub(crate) const fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }

    /// Mnemonic prefix including the destination where the assembler
    /// syntax spells it out (`ADD A,` but `SUB `).
    pub fn prefix(self) -> &'static str {
        match self {
            AluOp::Add => "ADD A,",
            AluOp::Adc => "ADC A,",
            AluOp::Sub => "SUB ",
            AluOp::Sbc => "SBC A,",
            AluOp::And => "AND ",
            AluOp::Xor => "XOR ",
            AluOp::Or => "OR ",
            AluOp::Cp => "CP ",
        }
    }
}

/// Rotate/shift family shared by the CB table and the accumulator rotates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    pub(crate) const fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => ShiftOp::Rlc,
            1 => ShiftOp::Rrc,
            2 => ShiftOp::Rl,
            3 => ShiftOp::Rr,
            4 => ShiftOp::Sla,
            5 => ShiftOp::Sra,
            6 => ShiftOp::Swap,
            _ => ShiftOp::Srl,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShiftOp::Rlc => "RLC",
            ShiftOp::Rrc => "RRC",
            ShiftOp::Rl => "RL",
            ShiftOp::Rr => "RR",
            ShiftOp::Sla => "SLA",
            ShiftOp::Sra => "SRA",
            ShiftOp::Swap => "SWAP",
            ShiftOp::Srl => "SRL",
        }
    }
}

/// 8-bit ADD/ADC.
pub fn add8(a: u8, b: u8, carry: bool) -> AluResult {
    let c = u8::from(carry);
    let full = u16::from(a) + u16::from(b) + u16::from(c);
    let value = full as u8;

    let mut flags = Flags::empty();
    flags.set(Flags::Z, value == 0);
    flags.set(Flags::H, (a & 0x0F) + (b & 0x0F) + c > 0x0F);
    flags.set(Flags::C, full > 0xFF);
    AluResult { value, flags }
}

/// 8-bit SUB/SBC. H is the borrow into bit 4, C the borrow out of bit 7.
pub fn sub8(a: u8, b: u8, carry: bool) -> AluResult {
    let c = u8::from(carry);
    let full = i16::from(a) - i16::from(b) - i16::from(c);
    let value = full as u8;

    let mut flags = Flags::N;
    flags.set(Flags::Z, value == 0);
    flags.set(Flags::H, (a & 0x0F) < (b & 0x0F) + c);
    flags.set(Flags::C, full < 0);
    AluResult { value, flags }
}

pub fn and8(a: u8, b: u8) -> AluResult {
    let value = a & b;
    let mut flags = Flags::H;
    flags.set(Flags::Z, value == 0);
    AluResult { value, flags }
}

pub fn or8(a: u8, b: u8) -> AluResult {
    let value = a | b;
    AluResult {
        value,
        flags: zero_flag(value),
    }
}

pub fn xor8(a: u8, b: u8) -> AluResult {
    let value = a ^ b;
    AluResult {
        value,
        flags: zero_flag(value),
    }
}

/// Flags of `a - b` without the numeric result.
pub fn cp8(a: u8, b: u8) -> Flags {
    sub8(a, b, false).flags
}

/// Dispatch one of the eight accumulator operations. For `Cp` the
/// returned value is `a` unchanged.
pub fn alu8(op: AluOp, a: u8, b: u8, flags: Flags) -> AluResult {
    let carry = flags.contains(Flags::C);
    match op {
        AluOp::Add => add8(a, b, false),
        AluOp::Adc => add8(a, b, carry),
        AluOp::Sub => sub8(a, b, false),
        AluOp::Sbc => sub8(a, b, carry),
        AluOp::And => and8(a, b),
        AluOp::Xor => xor8(a, b),
        AluOp::Or => or8(a, b),
        AluOp::Cp => AluResult {
            value: a,
            flags: cp8(a, b),
        },
    }
}

/// INC r / INC (HL): Z, N, H updated, C preserved.
pub fn inc8(value: u8, flags: Flags) -> AluResult {
    let result = value.wrapping_add(1);
    let mut out = flags & Flags::C;
    out.set(Flags::Z, result == 0);
    out.set(Flags::H, value & 0x0F == 0x0F);
    AluResult {
        value: result,
        flags: out,
    }
}

/// DEC r / DEC (HL): Z, H updated, N set, C preserved.
pub fn dec8(value: u8, flags: Flags) -> AluResult {
    let result = value.wrapping_sub(1);
    let mut out = (flags & Flags::C) | Flags::N;
    out.set(Flags::Z, result == 0);
    out.set(Flags::H, value & 0x0F == 0);
    AluResult {
        value: result,
        flags: out,
    }
}

/// `ADD HL,rr`: Z preserved, N cleared, H from bit 11, C from bit 15.
pub fn add16_hl(hl: u16, value: u16, flags: Flags) -> (u16, Flags) {
    let mut out = flags & Flags::Z;
    out.set(Flags::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
    out.set(Flags::C, u32::from(hl) + u32::from(value) > 0xFFFF);
    (hl.wrapping_add(value), out)
}

/// Signed 8-bit offset added to a 16-bit base, as used by `ADD SP,r8`
/// and `LD HL,SP+r8`.
///
/// Z and N are cleared. H and C come from the unsigned addition of the
/// low byte (bits 3 and 7), not from the 16-bit result, even when the
/// offset is negative.
pub fn add16_signed(base: u16, imm8: u8) -> (u16, Flags) {
    let offset = imm8 as i8 as i16 as u16;
    let mut flags = Flags::empty();
    flags.set(Flags::H, (base & 0x000F) + (offset & 0x000F) > 0x000F);
    flags.set(Flags::C, (base & 0x00FF) + (offset & 0x00FF) > 0x00FF);
    (base.wrapping_add(offset), flags)
}

/// Decimal adjust accumulator after BCD addition/subtraction.
///
/// Uses C, H, N and A to compute a correction value. Updates A, Z, H, C;
/// leaves N unchanged.
pub fn daa(a: u8, flags: Flags) -> AluResult {
    let mut adjust = 0u8;
    let mut carry = flags.contains(Flags::C);

    let value = if !flags.contains(Flags::N) {
        if flags.contains(Flags::H) || (a & 0x0F) > 0x09 {
            adjust |= 0x06;
        }
        if carry || a > 0x99 {
            adjust |= 0x60;
            carry = true;
        }
        a.wrapping_add(adjust)
    } else {
        if flags.contains(Flags::H) {
            adjust |= 0x06;
        }
        if carry {
            adjust |= 0x60;
        }
        a.wrapping_sub(adjust)
    };

    let mut out = flags & Flags::N;
    out.set(Flags::Z, value == 0);
    out.set(Flags::C, carry);
    AluResult { value, flags: out }
}

/// CPL: complement A, set N and H, keep Z and C.
pub fn cpl(a: u8, flags: Flags) -> AluResult {
    AluResult {
        value: !a,
        flags: flags | Flags::N | Flags::H,
    }
}

/// SCF: set C, clear N and H, keep Z.
pub fn scf(flags: Flags) -> Flags {
    (flags & Flags::Z) | Flags::C
}

/// CCF: toggle C, clear N and H, keep Z.
pub fn ccf(flags: Flags) -> Flags {
    let mut out = flags & Flags::Z;
    out.set(Flags::C, !flags.contains(Flags::C));
    out
}

/// CB-prefixed rotates and shifts. Z from the result, N and H cleared,
/// C receives the bit shifted out (always 0 for SWAP).
pub fn shift(op: ShiftOp, value: u8, flags: Flags) -> AluResult {
    let carry_in = u8::from(flags.contains(Flags::C));
    let (result, carry_out) = match op {
        // Bit 7 to carry and to bit 0.
        ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
        // Bit 0 to carry and to bit 7.
        ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
        // Old carry into bit 0.
        ShiftOp::Rl => ((value << 1) | carry_in, value & 0x80 != 0),
        // Old carry into bit 7.
        ShiftOp::Rr => ((value >> 1) | (carry_in << 7), value & 0x01 != 0),
        ShiftOp::Sla => (value << 1, value & 0x80 != 0),
        // Bit 7 is kept.
        ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
        ShiftOp::Swap => (value.rotate_left(4), false),
        ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
    };

    let mut out = Flags::empty();
    out.set(Flags::Z, result == 0);
    out.set(Flags::C, carry_out);
    AluResult {
        value: result,
        flags: out,
    }
}

/// RLCA/RRCA/RLA/RRA: same data path as the CB forms but Z is always
/// cleared.
pub fn rotate_accumulator(op: ShiftOp, a: u8, flags: Flags) -> AluResult {
    let mut result = shift(op, a, flags);
    result.flags.remove(Flags::Z);
    result
}

/// BIT b,r: Z = !bit, N cleared, H set, C preserved.
pub fn bit(index: u8, value: u8, flags: Flags) -> Flags {
    let mut out = (flags & Flags::C) | Flags::H;
    out.set(Flags::Z, value & (1 << (index & 0x07)) == 0);
    out
}

#[inline]
fn zero_flag(value: u8) -> Flags {
    if value == 0 {
        Flags::Z
    } else {
        Flags::empty()
    }
}
