//! Instruction rendering for tracing and debuggers.

use super::{base_instruction, cb_instruction, Bus, Instruction, CB_PREFIX};

impl Instruction {
    /// The mnemonic with its placeholder replaced by the operand value.
    ///
    /// `d16`/`a16` render as `0x1234`, `d8`/`a8` as `0x12` and the signed
    /// displacement `r8` as a decimal with explicit sign (`JR -2`,
    /// `LD HL,SP+5`).
    pub fn render(&self, operand: u16) -> String {
        let text = self.mnemonic.as_ref();
        let imm8 = operand as u8;

        if text.contains("16") {
            return text
                .replace("d16", &format!("0x{operand:04X}"))
                .replace("a16", &format!("0x{operand:04X}"));
        }
        if text.contains("SP+r8") {
            return text.replace("SP+r8", &format!("SP{:+}", imm8 as i8));
        }
        if text.contains("r8") {
            return text.replace("r8", &format!("{:+}", imm8 as i8));
        }
        text.replace("d8", &format!("0x{imm8:02X}"))
            .replace("a8", &format!("0x{imm8:02X}"))
    }
}

/// Disassemble the instruction at `addr`.
///
/// Returns the rendered text and the encoded length in bytes. Opcode holes
/// render as `UNDEFINED` with length 1. Reads go straight to the bus, so
/// callers should avoid addresses with read side effects.
pub fn disassemble<B: Bus>(bus: &mut B, addr: u16) -> (String, u16) {
    let opcode = bus.read8(addr);
    let (instr, operand_addr) = if opcode == CB_PREFIX {
        let cb = bus.read8(addr.wrapping_add(1));
        (Some(cb_instruction(cb)), addr.wrapping_add(2))
    } else {
        (base_instruction(opcode), addr.wrapping_add(1))
    };

    let Some(instr) = instr else {
        return ("UNDEFINED".to_string(), 1);
    };

    let operand = match instr.operand_len {
        0 => 0,
        1 => bus.read8(operand_addr) as u16,
        _ => bus.read16(operand_addr),
    };
    (instr.render(operand), instr.byte_len() as u16)
}
