//! Static instruction tables.
//!
//! Two 256-entry tables describe every opcode: the base table and the one
//! selected by the 0xCB prefix. Each entry is an [`Instruction`] carrying
//! the display mnemonic, the number of operand bytes that follow the
//! opcode, the cycle cost, and a tagged [`Op`] that the execution engine
//! matches on. Both tables are built once on first use and shared.

use std::borrow::Cow;

use lazy_static::lazy_static;

use super::alu::{AluOp, ShiftOp};

/// 8-bit operand encoded in the low/middle three opcode bits:
/// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum R8 {
    B,
    C,
    D,
    E,
    H,
    L,
    HlInd,
    A,
}

impl R8 {
    pub(crate) const fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => R8::B,
            1 => R8::C,
            2 => R8::D,
            3 => R8::E,
            4 => R8::H,
            5 => R8::L,
            6 => R8::HlInd,
            _ => R8::A,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            R8::B => "B",
            R8::C => "C",
            R8::D => "D",
            R8::E => "E",
            R8::H => "H",
            R8::L => "L",
            R8::HlInd => "(HL)",
            R8::A => "A",
        }
    }

    #[inline]
    pub fn is_memory(self) -> bool {
        self == R8::HlInd
    }
}

/// Register pairs used by 16-bit loads and arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum R16 {
    BC,
    DE,
    HL,
    SP,
}

impl R16 {
    const fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => R16::BC,
            1 => R16::DE,
            2 => R16::HL,
            _ => R16::SP,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            R16::BC => "BC",
            R16::DE => "DE",
            R16::HL => "HL",
            R16::SP => "SP",
        }
    }
}

/// Register pairs used by PUSH/POP (AF instead of SP).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum R16Stack {
    BC,
    DE,
    HL,
    AF,
}

impl R16Stack {
    const fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => R16Stack::BC,
            1 => R16Stack::DE,
            2 => R16Stack::HL,
            _ => R16Stack::AF,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            R16Stack::BC => "BC",
            R16Stack::DE => "DE",
            R16Stack::HL => "HL",
            R16Stack::AF => "AF",
        }
    }
}

/// Memory operand of `LD (rr),A` / `LD A,(rr)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indirect {
    BC,
    DE,
    /// (HL), then HL is incremented.
    HlInc,
    /// (HL), then HL is decremented.
    HlDec,
}

impl Indirect {
    const fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Indirect::BC,
            1 => Indirect::DE,
            2 => Indirect::HlInc,
            _ => Indirect::HlDec,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Indirect::BC => "(BC)",
            Indirect::DE => "(DE)",
            Indirect::HlInc => "(HL+)",
            Indirect::HlDec => "(HL-)",
        }
    }
}

/// Branch conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cond {
    NZ,
    Z,
    NC,
    C,
}

impl Cond {
    const fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Cond::NZ,
            1 => Cond::Z,
            2 => Cond::NC,
            _ => Cond::C,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Cond::NZ => "NZ",
            Cond::Z => "Z",
            Cond::NC => "NC",
            Cond::C => "C",
        }
    }
}

/// Decoded operation; the execution engine dispatches on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,

    LdR16Imm(R16),
    LdIndA(Indirect),
    LdAInd(Indirect),
    LdImm16Sp,
    LdR8Imm(R8),
    LdR8R8 { dst: R8, src: R8 },
    LdhImmA,
    LdhAImm,
    LdhCA,
    LdhAC,
    LdImm16A,
    LdAImm16,
    LdHlSpImm,
    LdSpHl,

    IncR16(R16),
    DecR16(R16),
    AddHlR16(R16),
    IncR8(R8),
    DecR8(R8),
    AddSpImm,
    AluR8 { op: AluOp, src: R8 },
    AluImm(AluOp),
    RotateA(ShiftOp),
    Daa,
    Cpl,
    Scf,
    Ccf,

    Jr,
    JrCond(Cond),
    Jp,
    JpCond(Cond),
    JpHl,
    Call,
    CallCond(Cond),
    Ret,
    RetCond(Cond),
    Reti,
    Rst(u8),
    Push(R16Stack),
    Pop(R16Stack),

    Shift { op: ShiftOp, reg: R8 },
    Bit { bit: u8, reg: R8 },
    Res { bit: u8, reg: R8 },
    Set { bit: u8, reg: R8 },
}

/// One opcode table entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Assembly text with operand placeholders (`d8`, `d16`, `a8`, `a16`,
    /// `r8`). Display only.
    pub mnemonic: Cow<'static, str>,
    /// Operand bytes following the opcode (0, 1 or 2).
    pub operand_len: u8,
    /// T-cycles when no branch is taken (the only cost for
    /// unconditional instructions).
    pub cycles: u32,
    /// T-cycles when a conditional branch, call or return is taken.
    pub cycles_taken: u32,
    pub op: Op,
}

impl Instruction {
    fn new(mnemonic: impl Into<Cow<'static, str>>, operand_len: u8, cycles: u32, op: Op) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            operand_len,
            cycles,
            cycles_taken: cycles,
            op,
        }
    }

    fn branch(
        mnemonic: impl Into<Cow<'static, str>>,
        operand_len: u8,
        cycles: u32,
        cycles_taken: u32,
        op: Op,
    ) -> Self {
        Self {
            cycles_taken,
            ..Self::new(mnemonic, operand_len, cycles, op)
        }
    }

    /// Total encoded length including the opcode (and the 0xCB prefix for
    /// CB-table entries).
    pub fn byte_len(&self) -> u8 {
        let prefix = u8::from(matches!(
            self.op,
            Op::Shift { .. } | Op::Bit { .. } | Op::Res { .. } | Op::Set { .. }
        ));
        1 + prefix + self.operand_len
    }
}

/// Prefix byte selecting the CB table. It has no base-table entry of its
/// own: the decoder reads the next byte and looks it up with
/// [`cb_instruction`].
pub const CB_PREFIX: u8 = 0xCB;

/// Opcode holes of the base table.
pub const UNDEFINED_OPCODES: [u8; 11] = [
    0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
];

lazy_static! {
    static ref BASE_TABLE: [Option<Instruction>; 256] =
        std::array::from_fn(|opcode| decode_base(opcode as u8));
    static ref CB_TABLE: [Instruction; 256] =
        std::array::from_fn(|opcode| decode_cb(opcode as u8));
}

/// Descriptor for an unprefixed opcode. `None` for the opcode holes and for
/// [`CB_PREFIX`], which callers resolve before the lookup.
pub fn base_instruction(opcode: u8) -> Option<&'static Instruction> {
    BASE_TABLE[opcode as usize].as_ref()
}

/// Descriptor for the byte following a 0xCB prefix. Every slot is defined.
pub fn cb_instruction(opcode: u8) -> &'static Instruction {
    &CB_TABLE[opcode as usize]
}

fn decode_base(opcode: u8) -> Option<Instruction> {
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = (opcode >> 4) & 0x03;

    let instr = match opcode {
        0x00 => Instruction::new("NOP", 0, 4, Op::Nop),
        // STOP is encoded as 10 00; the second byte is fetched and ignored.
        0x10 => Instruction::new("STOP 0", 1, 4, Op::Stop),
        0x76 => Instruction::new("HALT", 0, 4, Op::Halt),
        0xF3 => Instruction::new("DI", 0, 4, Op::Di),
        0xFB => Instruction::new("EI", 0, 4, Op::Ei),

        // 16-bit immediate loads.
        0x01 | 0x11 | 0x21 | 0x31 => {
            let rr = R16::from_index(p);
            Instruction::new(format!("LD {},d16", rr.name()), 2, 12, Op::LdR16Imm(rr))
        }

        // LD (BC/DE/HL±),A
        0x02 | 0x12 | 0x22 | 0x32 => {
            let ind = Indirect::from_index(p);
            Instruction::new(format!("LD {},A", ind.name()), 0, 8, Op::LdIndA(ind))
        }

        // LD A,(BC/DE/HL±)
        0x0A | 0x1A | 0x2A | 0x3A => {
            let ind = Indirect::from_index(p);
            Instruction::new(format!("LD A,{}", ind.name()), 0, 8, Op::LdAInd(ind))
        }

        0x03 | 0x13 | 0x23 | 0x33 => {
            let rr = R16::from_index(p);
            Instruction::new(format!("INC {}", rr.name()), 0, 8, Op::IncR16(rr))
        }

        0x0B | 0x1B | 0x2B | 0x3B => {
            let rr = R16::from_index(p);
            Instruction::new(format!("DEC {}", rr.name()), 0, 8, Op::DecR16(rr))
        }

        0x09 | 0x19 | 0x29 | 0x39 => {
            let rr = R16::from_index(p);
            Instruction::new(format!("ADD HL,{}", rr.name()), 0, 8, Op::AddHlR16(rr))
        }

        // INC r / DEC r / LD r,d8
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
            let r = R8::from_index(y);
            let cycles = if r.is_memory() { 12 } else { 4 };
            Instruction::new(format!("INC {}", r.name()), 0, cycles, Op::IncR8(r))
        }
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
            let r = R8::from_index(y);
            let cycles = if r.is_memory() { 12 } else { 4 };
            Instruction::new(format!("DEC {}", r.name()), 0, cycles, Op::DecR8(r))
        }
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
            let r = R8::from_index(y);
            let cycles = if r.is_memory() { 12 } else { 8 };
            Instruction::new(format!("LD {},d8", r.name()), 1, cycles, Op::LdR8Imm(r))
        }

        0x07 => Instruction::new("RLCA", 0, 4, Op::RotateA(ShiftOp::Rlc)),
        0x0F => Instruction::new("RRCA", 0, 4, Op::RotateA(ShiftOp::Rrc)),
        0x17 => Instruction::new("RLA", 0, 4, Op::RotateA(ShiftOp::Rl)),
        0x1F => Instruction::new("RRA", 0, 4, Op::RotateA(ShiftOp::Rr)),
        0x27 => Instruction::new("DAA", 0, 4, Op::Daa),
        0x2F => Instruction::new("CPL", 0, 4, Op::Cpl),
        0x37 => Instruction::new("SCF", 0, 4, Op::Scf),
        0x3F => Instruction::new("CCF", 0, 4, Op::Ccf),

        0x08 => Instruction::new("LD (a16),SP", 2, 20, Op::LdImm16Sp),

        0x18 => Instruction::new("JR r8", 1, 12, Op::Jr),
        0x20 | 0x28 | 0x30 | 0x38 => {
            let cc = Cond::from_index(y);
            Instruction::branch(format!("JR {},r8", cc.name()), 1, 8, 12, Op::JrCond(cc))
        }

        // 8-bit register/memory transfers (0x76 is HALT, matched above).
        0x40..=0x7F => {
            let dst = R8::from_index(y);
            let src = R8::from_index(z);
            let cycles = if dst.is_memory() || src.is_memory() { 8 } else { 4 };
            Instruction::new(
                format!("LD {},{}", dst.name(), src.name()),
                0,
                cycles,
                Op::LdR8R8 { dst, src },
            )
        }

        // ADD/ADC/SUB/SBC/AND/XOR/OR/CP r
        0x80..=0xBF => {
            let op = AluOp::from_index(y);
            let src = R8::from_index(z);
            let cycles = if src.is_memory() { 8 } else { 4 };
            Instruction::new(
                format!("{}{}", op.prefix(), src.name()),
                0,
                cycles,
                Op::AluR8 { op, src },
            )
        }

        // ADD/ADC/SUB/SBC/AND/XOR/OR/CP d8
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
            let op = AluOp::from_index(y);
            Instruction::new(format!("{}d8", op.prefix()), 1, 8, Op::AluImm(op))
        }

        0xC0 | 0xC8 | 0xD0 | 0xD8 => {
            let cc = Cond::from_index(y);
            Instruction::branch(format!("RET {}", cc.name()), 0, 8, 20, Op::RetCond(cc))
        }
        0xC2 | 0xCA | 0xD2 | 0xDA => {
            let cc = Cond::from_index(y);
            Instruction::branch(format!("JP {},a16", cc.name()), 2, 12, 16, Op::JpCond(cc))
        }
        0xC4 | 0xCC | 0xD4 | 0xDC => {
            let cc = Cond::from_index(y);
            Instruction::branch(format!("CALL {},a16", cc.name()), 2, 12, 24, Op::CallCond(cc))
        }

        0xC1 | 0xD1 | 0xE1 | 0xF1 => {
            let rr = R16Stack::from_index(p);
            Instruction::new(format!("POP {}", rr.name()), 0, 12, Op::Pop(rr))
        }
        0xC5 | 0xD5 | 0xE5 | 0xF5 => {
            let rr = R16Stack::from_index(p);
            Instruction::new(format!("PUSH {}", rr.name()), 0, 16, Op::Push(rr))
        }

        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            let target = opcode & 0x38;
            Instruction::new(format!("RST {target:02X}H"), 0, 16, Op::Rst(target))
        }

        0xC3 => Instruction::new("JP a16", 2, 16, Op::Jp),
        0xC9 => Instruction::new("RET", 0, 16, Op::Ret),
        0xCD => Instruction::new("CALL a16", 2, 24, Op::Call),
        0xD9 => Instruction::new("RETI", 0, 16, Op::Reti),
        0xE9 => Instruction::new("JP (HL)", 0, 4, Op::JpHl),

        0xE0 => Instruction::new("LDH (a8),A", 1, 12, Op::LdhImmA),
        0xF0 => Instruction::new("LDH A,(a8)", 1, 12, Op::LdhAImm),
        0xE2 => Instruction::new("LD (C),A", 0, 8, Op::LdhCA),
        0xF2 => Instruction::new("LD A,(C)", 0, 8, Op::LdhAC),
        0xEA => Instruction::new("LD (a16),A", 2, 16, Op::LdImm16A),
        0xFA => Instruction::new("LD A,(a16)", 2, 16, Op::LdAImm16),

        0xE8 => Instruction::new("ADD SP,r8", 1, 16, Op::AddSpImm),
        0xF8 => Instruction::new("LD HL,SP+r8", 1, 12, Op::LdHlSpImm),
        0xF9 => Instruction::new("LD SP,HL", 0, 8, Op::LdSpHl),

        // CB prefix, and the holes D3, DB, DD, E3, E4, EB, EC, ED, F4, FC, FD.
        _ => return None,
    };

    Some(instr)
}

fn decode_cb(opcode: u8) -> Instruction {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let reg = R8::from_index(opcode & 0x07);
    let name = reg.name();
    // Costs include the prefix fetch.
    let (fast, slow) = match x {
        1 => (8, 12),
        _ => (8, 16),
    };
    let cycles = if reg.is_memory() { slow } else { fast };

    match x {
        0 => {
            let op = ShiftOp::from_index(y);
            Instruction::new(format!("{} {name}", op.name()), 0, cycles, Op::Shift { op, reg })
        }
        1 => Instruction::new(format!("BIT {y},{name}"), 0, cycles, Op::Bit { bit: y, reg }),
        2 => Instruction::new(format!("RES {y},{name}"), 0, cycles, Op::Res { bit: y, reg }),
        _ => Instruction::new(format!("SET {y},{name}"), 0, cycles, Op::Set { bit: y, reg }),
    }
}
