use super::interrupts::RunMode;
use super::{base_instruction, cb_instruction, Bus, Cpu, CpuError, CB_PREFIX};

/// Cost of an idle HALT/STOP tick and of a skipped opcode hole.
const IDLE_CYCLES: u32 = 4;

impl Cpu {
    /// Execute a single instruction (or interrupt entry, or idle tick) and
    /// return the number of T-cycles taken.
    ///
    /// Once an undefined opcode has been hit in strict mode every further
    /// call returns the same [`CpuError::InvalidOpcode`] until [`Cpu::reset`].
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        if let Some(err) = &self.locked {
            return Err(err.clone());
        }

        let cycles = self.step_inner(bus)?;

        bus.tick(cycles);
        if let Some(fault) = bus.take_fault() {
            log::error!("CPU bus fault: {fault} (pc=0x{:04X})", self.regs.pc);
            return Err(fault.into());
        }
        Ok(cycles)
    }

    fn step_inner<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        match self.interrupts.mode() {
            // STOP ignores interrupts entirely; only `wake` ends it.
            RunMode::Stopped => return Ok(IDLE_CYCLES),
            RunMode::Halted => {
                if self.interrupts.pending().is_empty() {
                    return Ok(IDLE_CYCLES);
                }
                // Any enabled request ends HALT, with or without IME.
                self.interrupts.resume();
            }
            RunMode::Running => {}
        }

        if let Some(cycles) = self.handle_interrupts(bus) {
            return Ok(cycles);
        }

        let opcode_addr = self.regs.pc;
        let halt_bug = self.halt_bug;
        let opcode = self.fetch8(bus);
        let instr = if opcode == CB_PREFIX {
            Some(cb_instruction(self.fetch8(bus)))
        } else {
            base_instruction(opcode)
        };

        let Some(instr) = instr else {
            // Leave the registers as they were before the fetch.
            self.regs.pc = opcode_addr;
            self.halt_bug = halt_bug;
            return self.invalid_opcode(opcode, opcode_addr);
        };

        let operand = self.fetch_operands(bus, instr.operand_len);
        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "0x{:04X}: {} (AF=0x{:04X} BC=0x{:04X} DE=0x{:04X} HL=0x{:04X} SP=0x{:04X})",
                opcode_addr,
                instr.render(operand),
                self.regs.af(),
                self.regs.bc(),
                self.regs.de(),
                self.regs.hl(),
                self.regs.sp,
            );
        }

        let cycles = self.execute(bus, instr, operand);
        self.interrupts.apply_ime_delay();
        Ok(cycles)
    }

    fn invalid_opcode(&mut self, opcode: u8, addr: u16) -> Result<u32, CpuError> {
        if !self.config.strict_opcodes {
            log::warn!("CPU skipping invalid opcode 0x{opcode:02X} at PC=0x{addr:04X}");
            // Under the HALT bug the hole byte is read again on the next step.
            self.regs.pc = if std::mem::take(&mut self.halt_bug) {
                addr
            } else {
                addr.wrapping_add(1)
            };
            self.interrupts.apply_ime_delay();
            return Ok(IDLE_CYCLES);
        }

        // Opcode holes hard-lock the CPU until power-off. We keep the error
        // and hand it back from every further `step` until `reset`.
        log::error!(
            "CPU locked: invalid opcode 0x{opcode:02X} at PC=0x{pc:04X} (SP=0x{sp:04X} AF=0x{af:04X} BC=0x{bc:04X} DE=0x{de:04X} HL=0x{hl:04X})",
            pc = addr,
            sp = self.regs.sp,
            af = self.regs.af(),
            bc = self.regs.bc(),
            de = self.regs.de(),
            hl = self.regs.hl(),
        );
        let err = CpuError::InvalidOpcode { opcode, addr };
        self.locked = Some(err.clone());
        Err(err)
    }
}
