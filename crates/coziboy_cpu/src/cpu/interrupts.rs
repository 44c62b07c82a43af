mod ime;
mod service;

use bitflags::bitflags;

/// Address of the IF (interrupt request) register.
pub const IF_ADDR: u16 = 0xFF0F;
/// Address of the IE (interrupt enable) register.
pub const IE_ADDR: u16 = 0xFFFF;

bitflags! {
    /// Interrupt lines as laid out in IE and IF. Lower bits have higher
    /// priority.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InterruptFlags: u8 {
        const VBLANK = 0b0000_0001;
        const LCD_STAT = 0b0000_0010;
        const TIMER = 0b0000_0100;
        const SERIAL = 0b0000_1000;
        const JOYPAD = 0b0001_0000;
    }
}

/// A single interrupt source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interrupt {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    /// All sources in priority order.
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    pub fn flag(self) -> InterruptFlags {
        match self {
            Interrupt::VBlank => InterruptFlags::VBLANK,
            Interrupt::LcdStat => InterruptFlags::LCD_STAT,
            Interrupt::Timer => InterruptFlags::TIMER,
            Interrupt::Serial => InterruptFlags::SERIAL,
            Interrupt::Joypad => InterruptFlags::JOYPAD,
        }
    }

    /// Fixed handler address the CPU jumps to when dispatching.
    pub fn vector(self) -> u16 {
        0x0040 + (self as u16) * 8
    }
}

/// Low-power state of the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunMode {
    #[default]
    Running,
    /// Entered by HALT; left when any enabled interrupt is requested.
    Halted,
    /// Entered by STOP; left only through an external wake signal.
    Stopped,
}

/// Interrupt master enable, EI delay, IE/IF and the run mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterruptController {
    ime: bool,
    /// Set by EI during the current instruction.
    ime_enable_pending: bool,
    /// Armed at the end of the EI instruction; IME turns on when the
    /// following instruction retires.
    ime_enable_delay: bool,
    mode: RunMode,
    /// IE is a full 8-bit register; only the low five bits gate anything.
    enable: u8,
    requested: InterruptFlags,
}

impl InterruptController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to RUNNING with IME clear and nothing scheduled. IE and IF are
    /// cleared as well.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn ime(&self) -> bool {
        self.ime
    }

    #[inline]
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Raise the request bit for `interrupt`.
    pub fn request(&mut self, interrupt: Interrupt) {
        self.requested.insert(interrupt.flag());
    }

    /// Requested lines that are also enabled.
    #[inline]
    pub fn pending(&self) -> InterruptFlags {
        self.requested & InterruptFlags::from_bits_truncate(self.enable)
    }

    /// Highest-priority interrupt that is both requested and enabled.
    pub fn next_pending(&self) -> Option<Interrupt> {
        let pending = self.pending();
        Interrupt::ALL
            .into_iter()
            .find(|interrupt| pending.contains(interrupt.flag()))
    }

    /// Accept `interrupt` for dispatch: clear its request bit and IME.
    pub(crate) fn acknowledge(&mut self, interrupt: Interrupt) {
        self.requested.remove(interrupt.flag());
        self.ime = false;
    }

    /// IF as seen by software; the unused upper bits read as 1.
    pub fn read_if(&self) -> u8 {
        0xE0 | self.requested.bits()
    }

    pub fn write_if(&mut self, value: u8) {
        self.requested = InterruptFlags::from_bits_truncate(value);
    }

    pub fn read_ie(&self) -> u8 {
        self.enable
    }

    pub fn write_ie(&mut self, value: u8) {
        self.enable = value;
    }

    pub(crate) fn halt(&mut self) {
        self.mode = RunMode::Halted;
    }

    pub(crate) fn stop(&mut self) {
        self.mode = RunMode::Stopped;
    }

    /// Leave HALT because an enabled interrupt became pending.
    pub(crate) fn resume(&mut self) {
        if self.mode == RunMode::Halted {
            self.mode = RunMode::Running;
        }
    }

    /// External wake signal (e.g. a joypad edge) that ends STOP.
    pub fn wake(&mut self) -> bool {
        if self.mode == RunMode::Stopped {
            self.mode = RunMode::Running;
            true
        } else {
            false
        }
    }
}
