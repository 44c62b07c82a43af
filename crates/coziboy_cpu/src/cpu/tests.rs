use super::*;

struct TestBus {
    memory: [u8; 0x10000],
    ticks: u32,
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
            ticks: 0,
        }
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }

    fn tick(&mut self, cycles: u32) {
        self.ticks += cycles;
    }
}

/// Bus that reports a fault for any write into 0x0000–0x7FFF.
#[derive(Default)]
struct RomBus {
    inner: TestBus,
    fault: Option<BusFault>,
}

impl Bus for RomBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.inner.read8(addr)
    }

    fn write8(&mut self, addr: u16, value: u8) {
        if addr < 0x8000 {
            self.fault = Some(BusFault {
                addr,
                reason: "write to ROM".to_string(),
            });
            return;
        }
        self.inner.write8(addr, value);
    }

    fn take_fault(&mut self) -> Option<BusFault> {
        self.fault.take()
    }
}

const START: u16 = 0x0100;

/// CPU at the post-boot state with `program` placed at 0x0100.
fn setup(program: &[u8]) -> (Cpu, TestBus) {
    let mut bus = TestBus::default();
    let start = START as usize;
    bus.memory[start..start + program.len()].copy_from_slice(program);
    (Cpu::new(), bus)
}

fn step(cpu: &mut Cpu, bus: &mut TestBus) -> u32 {
    cpu.step(bus).unwrap()
}

fn run(cpu: &mut Cpu, bus: &mut TestBus, steps: usize) -> u32 {
    (0..steps).map(|_| step(cpu, bus)).sum()
}

#[test]
fn ld_bc_d16_loads_pair_in_twelve_cycles() {
    let (mut cpu, mut bus) = setup(&[0x01, 0x34, 0x12]);
    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cycles, 12);
    assert_eq!(cpu.regs.bc(), 0x1234);
    assert_eq!(cpu.regs.b, 0x12);
    assert_eq!(cpu.regs.c, 0x34);
    assert_eq!(cpu.regs.pc, 0x0103);
    assert_eq!(bus.ticks, 12);
}

#[test]
fn reset_restores_power_on_dump() {
    let (mut cpu, mut bus) = setup(&[0x3E, 0x42, 0x06, 0x99, 0xFB, 0x00]);
    run(&mut cpu, &mut bus, 3);
    cpu.set_interrupt_enable(0x04);
    cpu.request_interrupt(Interrupt::Timer);

    cpu.reset();
    assert_eq!(
        cpu.dump_registers(),
        "A: 0x01  F: 0xB0\nB: 0x00  C: 0x13\nD: 0x00  E: 0xD8\nH: 0x01  L: 0x4D\nSP: 0xFFFE\nPC: 0x0100"
    );
    assert!(!cpu.ime());
    assert_eq!(cpu.mode(), RunMode::Running);
    assert_eq!(cpu.interrupt_enable(), 0);
    assert_eq!(cpu.interrupt_flags(), 0xE0);
    // Memory is untouched.
    assert_eq!(bus.memory[0x0101], 0x42);
}

#[test]
fn daa_after_bcd_add() {
    // LD A,0x09; ADD A,0x15; DAA
    let (mut cpu, mut bus) = setup(&[0x3E, 0x09, 0xC6, 0x15, 0x27]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.regs.a, 0x1E);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x24);
    assert!(!cpu.regs.flag(Flags::Z));
    assert!(!cpu.regs.flag(Flags::H));
    assert!(!cpu.regs.flag(Flags::C));
}

#[test]
fn daa_after_bcd_subtract() {
    // LD A,0x10; SUB 0x01; DAA  => 0x09
    let (mut cpu, mut bus) = setup(&[0x3E, 0x10, 0xD6, 0x01, 0x27]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.regs.a, 0x09);
    assert!(cpu.regs.flag(Flags::N));
    assert!(!cpu.regs.flag(Flags::C));
}

#[test]
fn push_bc_pop_de_round_trips() {
    // LD BC,0xBEEF; PUSH BC; POP DE
    let (mut cpu, mut bus) = setup(&[0x01, 0xEF, 0xBE, 0xC5, 0xD1]);
    step(&mut cpu, &mut bus);
    let sp = cpu.regs.sp;

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.sp, sp.wrapping_sub(2));
    assert_eq!(bus.memory[0xFFFD], 0xBE);
    assert_eq!(bus.memory[0xFFFC], 0xEF);

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.sp, sp);
    assert_eq!(cpu.regs.de(), 0xBEEF);
}

#[test]
fn pop_af_masks_low_nibble() {
    // LD BC,0x12FF; PUSH BC; POP AF
    let (mut cpu, mut bus) = setup(&[0x01, 0xFF, 0x12, 0xC5, 0xF1]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.regs.a, 0x12);
    assert_eq!(cpu.regs.f(), 0xF0);
    assert_eq!(cpu.regs.af(), 0x12F0);
}

#[test]
fn jr_minus_two_loops_on_itself() {
    let mut bus = TestBus::default();
    bus.memory[0x0150] = 0x18;
    bus.memory[0x0151] = 0xFE;
    let mut cpu = Cpu::new();
    cpu.regs.pc = 0x0150;

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.pc, 0x0150);
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.pc, 0x0150);
}

#[test]
fn conditional_branches_report_taken_and_not_taken_costs() {
    // Power-on F has Z set.
    // JR NZ,+2 (not taken); JR Z,+0 (taken)
    let (mut cpu, mut bus) = setup(&[0x20, 0x02, 0x28, 0x00]);
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.pc, 0x0102);
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.pc, 0x0104);

    // JP NZ,a16 (not taken); JP Z,0x0200 (taken)
    let (mut cpu, mut bus) = setup(&[0xC2, 0x00, 0x02, 0xCA, 0x00, 0x02]);
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0200);

    // CALL NZ,a16 (not taken); CALL Z,0x0200 (taken)
    let (mut cpu, mut bus) = setup(&[0xC4, 0x00, 0x02, 0xCC, 0x00, 0x02]);
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(step(&mut cpu, &mut bus), 24);
    assert_eq!(cpu.regs.pc, 0x0200);
    assert_eq!(cpu.regs.sp, 0xFFFC);

    // RET NZ (not taken) at 0x0200; RET Z (taken) back to 0x0106.
    bus.memory[0x0200] = 0xC0;
    bus.memory[0x0201] = 0xC8;
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(step(&mut cpu, &mut bus), 20);
    assert_eq!(cpu.regs.pc, 0x0106);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn call_and_rst_push_return_address() {
    // CALL 0x0200; at 0x0200: RST 08H; at 0x0008: RET; RET
    let (mut cpu, mut bus) = setup(&[0xCD, 0x00, 0x02]);
    bus.memory[0x0200] = 0xCF;
    bus.memory[0x0008] = 0xC9;
    bus.memory[0x0201] = 0xC9;

    assert_eq!(step(&mut cpu, &mut bus), 24);
    assert_eq!(cpu.regs.pc, 0x0200);
    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0008);
    assert_eq!(cpu.regs.sp, 0xFFFA);

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0201);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc, 0x0103);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn ld_hl_increment_and_decrement() {
    // LD HL,0xC000; LD A,0x5A; LD (HL+),A; LD (HL-),A; LD A,(HL-)
    let (mut cpu, mut bus) = setup(&[0x21, 0x00, 0xC0, 0x3E, 0x5A, 0x22, 0x32, 0x3A]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(bus.memory[0xC000], 0x5A);
    assert_eq!(cpu.regs.hl(), 0xC001);

    step(&mut cpu, &mut bus);
    assert_eq!(bus.memory[0xC001], 0x5A);
    assert_eq!(cpu.regs.hl(), 0xC000);

    cpu.regs.a = 0;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x5A);
    assert_eq!(cpu.regs.hl(), 0xBFFF);
}

#[test]
fn ld_a16_sp_stores_little_endian() {
    let (mut cpu, mut bus) = setup(&[0x08, 0x00, 0xC1]);
    assert_eq!(step(&mut cpu, &mut bus), 20);
    assert_eq!(bus.memory[0xC100], 0xFE);
    assert_eq!(bus.memory[0xC101], 0xFF);
}

#[test]
fn add_sp_and_ld_hl_sp_use_low_byte_flags() {
    // LD SP,0x00FF; ADD SP,+1
    let (mut cpu, mut bus) = setup(&[0x31, 0xFF, 0x00, 0xE8, 0x01, 0xF8, 0xFF]);
    step(&mut cpu, &mut bus);
    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.sp, 0x0100);
    assert_eq!(cpu.regs.f, Flags::H | Flags::C);

    // LD HL,SP-1
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.hl(), 0x00FF);
    assert_eq!(cpu.regs.f, Flags::empty());
}

#[test]
fn inc_dec_preserve_carry() {
    // SCF; LD B,0xFF; INC B; DEC B
    let (mut cpu, mut bus) = setup(&[0x37, 0x06, 0xFF, 0x04, 0x05]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.regs.b, 0x00);
    assert_eq!(cpu.regs.f, Flags::Z | Flags::H | Flags::C);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.b, 0xFF);
    assert_eq!(cpu.regs.f, Flags::N | Flags::H | Flags::C);
}

#[test]
fn inc_hl_indirect_costs_twelve() {
    // LD HL,0xC000; INC (HL)
    let (mut cpu, mut bus) = setup(&[0x21, 0x00, 0xC0, 0x34]);
    bus.memory[0xC000] = 0x0F;
    step(&mut cpu, &mut bus);
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(bus.memory[0xC000], 0x10);
    assert!(cpu.regs.flag(Flags::H));
}

#[test]
fn sixteen_bit_inc_dec_leave_flags_alone() {
    // LD DE,0xFFFF; INC DE; DEC SP
    let (mut cpu, mut bus) = setup(&[0x11, 0xFF, 0xFF, 0x13, 0x3B]);
    let flags = cpu.regs.f;
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.regs.de(), 0x0000);
    assert_eq!(cpu.regs.sp, 0xFFFD);
    assert_eq!(cpu.regs.f, flags);
}

#[test]
fn add_hl_keeps_zero_flag() {
    // LD HL,0x0FFF; LD BC,0x0001; ADD HL,BC
    let (mut cpu, mut bus) = setup(&[0x21, 0xFF, 0x0F, 0x01, 0x01, 0x00, 0x09]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.regs.hl(), 0x1000);
    // Z was set at power-on and survives.
    assert_eq!(cpu.regs.f, Flags::Z | Flags::H);
}

#[test]
fn alu_register_group_and_compare() {
    // LD A,0x3C; LD B,0x3C; CP B; XOR A; OR 0x80; AND 0x0F
    let (mut cpu, mut bus) = setup(&[0x3E, 0x3C, 0x06, 0x3C, 0xB8, 0xAF, 0xF6, 0x80, 0xE6, 0x0F]);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.regs.a, 0x3C);
    assert_eq!(cpu.regs.f, Flags::Z | Flags::N);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0);
    assert_eq!(cpu.regs.f, Flags::Z);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x80);
    assert_eq!(cpu.regs.f, Flags::empty());

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0);
    assert_eq!(cpu.regs.f, Flags::Z | Flags::H);
}

#[test]
fn rotate_accumulator_clears_zero() {
    // XOR A; RLCA
    let (mut cpu, mut bus) = setup(&[0xAF, 0x07]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.regs.a, 0);
    assert_eq!(cpu.regs.f, Flags::empty());
}

#[test]
fn cb_operations_on_hl_indirect() {
    // LD HL,0xC000; SET 3,(HL); BIT 3,(HL); RES 3,(HL); BIT 3,(HL); SWAP (HL)
    let program = [
        0x21, 0x00, 0xC0, 0xCB, 0xDE, 0xCB, 0x5E, 0xCB, 0x9E, 0xCB, 0x5E, 0xCB, 0x36,
    ];
    let (mut cpu, mut bus) = setup(&program);
    bus.memory[0xC000] = 0x10;
    step(&mut cpu, &mut bus);

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(bus.memory[0xC000], 0x18);

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert!(!cpu.regs.flag(Flags::Z));
    assert!(cpu.regs.flag(Flags::H));

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(bus.memory[0xC000], 0x10);

    step(&mut cpu, &mut bus);
    assert!(cpu.regs.flag(Flags::Z));

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(bus.memory[0xC000], 0x01);
    assert_eq!(cpu.regs.f, Flags::empty());
    assert_eq!(cpu.regs.pc, 0x010D);
}

#[test]
fn cb_register_shift() {
    // LD B,0x81; SRL B; RR B
    let (mut cpu, mut bus) = setup(&[0x06, 0x81, 0xCB, 0x38, 0xCB, 0x18]);
    step(&mut cpu, &mut bus);
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.b, 0x40);
    assert!(cpu.regs.flag(Flags::C));

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.b, 0xA0);
    assert!(!cpu.regs.flag(Flags::C));
}

#[test]
fn f_low_nibble_stays_clear() {
    // A mix of flag-producing instructions; F must never show bits 0-3.
    let program = [
        0x3E, 0xFF, // LD A,0xFF
        0xC6, 0x01, // ADD A,0x01
        0xDE, 0x0F, // SBC A,0x0F
        0x27, // DAA
        0x2F, // CPL
        0x3F, // CCF
        0xE8, 0x81, // ADD SP,-127
        0xCB, 0x37, // SWAP A
    ];
    let (mut cpu, mut bus) = setup(&program);
    for _ in 0..8 {
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.regs.f() & 0x0F, 0);
        assert_eq!(cpu.regs.af() & 0x000F, 0);
    }
}

#[test]
fn ei_takes_effect_after_following_instruction() {
    // EI; NOP; NOP
    let (mut cpu, mut bus) = setup(&[0xFB, 0x00, 0x00]);
    step(&mut cpu, &mut bus);
    assert!(!cpu.ime());
    step(&mut cpu, &mut bus);
    assert!(cpu.ime());
}

#[test]
fn ei_then_di_never_dispatches() {
    // EI; DI; NOP
    let (mut cpu, mut bus) = setup(&[0xFB, 0xF3, 0x00]);
    cpu.set_interrupt_enable(0x01);
    cpu.request_interrupt(Interrupt::VBlank);

    run(&mut cpu, &mut bus, 3);
    assert!(!cpu.ime());
    assert_eq!(cpu.regs.pc, 0x0103);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(cpu.interrupt_flags(), 0xE1);
}

#[test]
fn di_clears_ime_immediately() {
    // EI; NOP; DI
    let (mut cpu, mut bus) = setup(&[0xFB, 0x00, 0xF3]);
    run(&mut cpu, &mut bus, 2);
    assert!(cpu.ime());
    step(&mut cpu, &mut bus);
    assert!(!cpu.ime());
}

#[test]
fn interrupt_dispatch_pushes_pc_and_jumps_to_vector() {
    // EI; NOP; NOP
    let (mut cpu, mut bus) = setup(&[0xFB, 0x00, 0x00]);
    cpu.set_interrupt_enable(0x1F);
    cpu.request_interrupt(Interrupt::Timer);
    cpu.request_interrupt(Interrupt::Joypad);

    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.regs.pc, 0x0102);

    assert_eq!(step(&mut cpu, &mut bus), 20);
    assert_eq!(cpu.regs.pc, 0x0050);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.memory[0xFFFC], 0x02);
    assert_eq!(bus.memory[0xFFFD], 0x01);
    assert!(!cpu.ime());
    // Timer bit cleared, Joypad still requested.
    assert_eq!(cpu.interrupt_flags(), 0xE0 | 0x10);
}

#[test]
fn reti_returns_and_enables_immediately() {
    let (mut cpu, mut bus) = setup(&[0xFB, 0x00, 0x00]);
    bus.memory[0x0040] = 0xD9; // RETI
    cpu.set_interrupt_enable(0x01);
    cpu.request_interrupt(Interrupt::VBlank);

    run(&mut cpu, &mut bus, 2);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc, 0x0040);

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0102);
    assert!(cpu.ime());
}

#[test]
fn software_reaches_ie_and_if() {
    // LD A,0x05; LD (0xFFFF),A; LDH A,(0x0F)
    let (mut cpu, mut bus) = setup(&[0x3E, 0x05, 0xEA, 0xFF, 0xFF, 0xF0, 0x0F]);
    cpu.request_interrupt(Interrupt::Serial);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.interrupt_enable(), 0x05);
    assert_eq!(bus.memory[0xFFFF], 0);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0xE8);
}

#[test]
fn halt_waits_for_enabled_interrupt_without_ime() {
    // HALT; INC A
    let (mut cpu, mut bus) = setup(&[0x76, 0x3C]);
    cpu.set_interrupt_enable(0x04);

    step(&mut cpu, &mut bus);
    assert!(cpu.is_halted());
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0101);

    // A request that is not enabled does not wake the core.
    cpu.request_interrupt(Interrupt::VBlank);
    step(&mut cpu, &mut bus);
    assert!(cpu.is_halted());

    // IME is off: the core resumes after HALT without dispatching.
    cpu.request_interrupt(Interrupt::Timer);
    let a = cpu.regs.a;
    step(&mut cpu, &mut bus);
    assert!(!cpu.is_halted());
    assert_eq!(cpu.regs.a, a.wrapping_add(1));
    assert_eq!(cpu.regs.pc, 0x0102);
}

#[test]
fn halt_with_ime_dispatches_on_wake() {
    // EI; HALT
    let (mut cpu, mut bus) = setup(&[0xFB, 0x76]);
    cpu.set_interrupt_enable(0x01);
    run(&mut cpu, &mut bus, 2);
    assert!(cpu.is_halted());
    assert!(cpu.ime());

    cpu.request_interrupt(Interrupt::VBlank);
    assert_eq!(step(&mut cpu, &mut bus), 20);
    assert_eq!(cpu.regs.pc, 0x0040);
    assert_eq!(cpu.mode(), RunMode::Running);
    // Return address is the instruction after HALT.
    assert_eq!(bus.memory[0xFFFC], 0x02);
}

#[test]
fn halt_bug_reads_next_byte_twice() {
    // HALT; INC A; NOP
    let (mut cpu, mut bus) = setup(&[0x76, 0x3C, 0x00]);
    cpu.set_interrupt_enable(0x01);
    cpu.request_interrupt(Interrupt::VBlank);
    let a = cpu.regs.a;

    step(&mut cpu, &mut bus);
    assert!(!cpu.is_halted());
    assert_eq!(cpu.regs.pc, 0x0101);

    // INC A executes twice: the first fetch does not advance PC.
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc, 0x0101);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc, 0x0102);
    assert_eq!(cpu.regs.a, a.wrapping_add(2));
}

#[test]
fn ei_halt_with_pending_interrupt_enters_handler_cleanly() {
    // EI; HALT; NOP with JP 0x1234 at the VBlank vector.
    let (mut cpu, mut bus) = setup(&[0xFB, 0x76, 0x00]);
    bus.memory[0x0040..0x0043].copy_from_slice(&[0xC3, 0x34, 0x12]);
    cpu.set_interrupt_enable(0x01);
    cpu.request_interrupt(Interrupt::VBlank);

    run(&mut cpu, &mut bus, 2);
    assert!(cpu.ime());
    assert!(!cpu.is_halted());

    assert_eq!(step(&mut cpu, &mut bus), 20);
    assert_eq!(cpu.regs.pc, 0x0040);
    // Returns to the HALT, not past it.
    assert_eq!(bus.memory[0xFFFC], 0x01);
    assert_eq!(bus.memory[0xFFFD], 0x01);

    // The handler's first instruction is fetched normally.
    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x1234);
}

#[test]
fn halt_bug_can_be_disabled() {
    let (_, mut bus) = setup(&[0x76, 0x3C, 0x00]);
    let mut cpu = Cpu::with_config(CpuConfig::builder().halt_bug(false).build());
    cpu.set_interrupt_enable(0x01);
    cpu.request_interrupt(Interrupt::VBlank);
    let a = cpu.regs.a;

    run(&mut cpu, &mut bus, 2);
    assert!(!cpu.is_halted());
    assert_eq!(cpu.regs.pc, 0x0102);
    assert_eq!(cpu.regs.a, a.wrapping_add(1));
}

#[test]
fn stop_idles_until_wake() {
    // STOP 0; INC A
    let (mut cpu, mut bus) = setup(&[0x10, 0x00, 0x3C]);
    cpu.set_interrupt_enable(0x1F);
    step(&mut cpu, &mut bus);
    assert!(cpu.is_stopped());
    assert_eq!(cpu.regs.pc, 0x0102);

    // Interrupts do not end STOP.
    cpu.request_interrupt(Interrupt::Joypad);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert!(cpu.is_stopped());
    assert_eq!(cpu.regs.pc, 0x0102);

    assert!(cpu.wake());
    assert!(!cpu.wake());
    let a = cpu.regs.a;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, a.wrapping_add(1));
}

#[test]
fn invalid_opcode_locks_core_and_keeps_registers() {
    let (mut cpu, mut bus) = setup(&[0xDD]);
    let before = cpu.regs;

    let err = cpu.step(&mut bus).unwrap_err();
    assert_eq!(
        err,
        CpuError::InvalidOpcode {
            opcode: 0xDD,
            addr: 0x0100
        }
    );
    assert_eq!(cpu.regs, before);
    assert_eq!(cpu.locked(), Some(&err));

    // Still locked, and nothing else gets fetched.
    bus.memory[0x0100] = 0x00;
    assert_eq!(cpu.step(&mut bus), Err(err));
    assert_eq!(cpu.regs, before);

    cpu.reset();
    assert!(cpu.locked().is_none());
    assert_eq!(cpu.step(&mut bus), Ok(4));
}

#[test]
fn every_hole_is_rejected() {
    for &opcode in UNDEFINED_OPCODES.iter() {
        let (mut cpu, mut bus) = setup(&[opcode]);
        assert_eq!(
            cpu.step(&mut bus),
            Err(CpuError::InvalidOpcode {
                opcode,
                addr: START
            }),
            "opcode {opcode:#04x}"
        );
    }
}

#[test]
fn lenient_mode_skips_holes() {
    // 0xFD; INC A
    let (_, mut bus) = setup(&[0xFD, 0x3C]);
    let mut cpu = Cpu::with_config(CpuConfig::builder().strict_opcodes(false).build());
    let a = cpu.regs.a;

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0101);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, a.wrapping_add(1));
}

#[test]
fn lenient_hole_under_halt_bug_repeats_the_hole() {
    // HALT (bug); 0xFD; INC A
    let (_, mut bus) = setup(&[0x76, 0xFD, 0x3C]);
    let mut cpu = Cpu::with_config(CpuConfig::builder().strict_opcodes(false).build());
    cpu.set_interrupt_enable(0x01);
    cpu.request_interrupt(Interrupt::VBlank);
    let a = cpu.regs.a;

    step(&mut cpu, &mut bus);
    assert!(!cpu.is_halted());

    // The hole is read twice; INC A runs once.
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0101);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0102);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc, 0x0103);
    assert_eq!(cpu.regs.a, a.wrapping_add(1));
}

#[test]
fn bus_fault_is_propagated() {
    let mut bus = RomBus::default();
    // LD HL,0x2000; LD (HL),A
    bus.inner.memory[0x0100..0x0104].copy_from_slice(&[0x21, 0x00, 0x20, 0x77]);
    let mut cpu = Cpu::new();

    assert_eq!(cpu.step(&mut bus), Ok(12));
    let err = cpu.step(&mut bus).unwrap_err();
    assert_eq!(
        err,
        CpuError::BusFault(BusFault {
            addr: 0x2000,
            reason: "write to ROM".to_string(),
        })
    );
    assert_eq!(err.to_string(), "bus fault at 0x2000: write to ROM");
    // A bus fault does not lock the core.
    assert!(cpu.locked().is_none());
}

#[test]
fn bus_is_ticked_once_per_step() {
    // NOP; LD BC,d16; interrupt entry
    let (mut cpu, mut bus) = setup(&[0x00, 0x01, 0x00, 0x00]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(bus.ticks, 16);

    cpu.interrupts.enable_now();
    cpu.set_interrupt_enable(0x02);
    cpu.request_interrupt(Interrupt::LcdStat);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc, 0x0048);
    assert_eq!(bus.ticks, 36);
}

#[test]
fn disassemble_at_pc() {
    let (cpu, mut bus) = setup(&[0x31, 0xFE, 0xFF]);
    assert_eq!(
        disassemble(&mut bus, cpu.regs.pc),
        ("LD SP,0xFFFE".to_string(), 3)
    );
}
