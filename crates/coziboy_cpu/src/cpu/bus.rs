use thiserror::Error;

/// An invalid access reported by a bus implementation.
///
/// The core never produces this itself; it only forwards what the bus
/// hands back through [`Bus::take_fault`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("bus fault at 0x{addr:04X}: {reason}")]
pub struct BusFault {
    pub addr: u16,
    pub reason: String,
}

/// Abstraction over the Game Boy bus (memory and IO).
///
/// Reads and writes are total: every address maps to something, even if
/// it is open bus. Banking and memory-mapped peripherals live behind this
/// trait and are not the CPU's concern.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Little-endian 16-bit read: low byte at `addr`, high byte at `addr+1`.
    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr);
        let hi = self.read8(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Little-endian 16-bit write: low byte at `addr`, high byte at `addr+1`.
    fn write16(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo);
        self.write8(addr.wrapping_add(1), hi);
    }

    /// Advance bus-side peripherals by a given number of CPU cycles.
    ///
    /// Called once at the end of every `Cpu::step`. Default implementation
    /// does nothing; system buses can override this to drive timers, PPU,
    /// APU, etc.
    fn tick(&mut self, _cycles: u32) {}

    /// Report (and clear) an invalid access recorded since the last call.
    ///
    /// The CPU polls this after each step and returns the fault to its
    /// caller unchanged. Buses that cannot fault keep the default.
    fn take_fault(&mut self) -> Option<BusFault> {
        None
    }
}
