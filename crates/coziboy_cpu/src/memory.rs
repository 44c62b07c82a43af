//! Flat 64 KiB memory for tests, tooling and the command-line runner.

use crate::cpu::Bus;

/// Size of the LR35902 address space.
pub const ADDRESS_SPACE: usize = 0x10000;

/// A 64 KiB RAM image with no banking and no memory-mapped IO.
///
/// ```
/// use coziboy_cpu::cpu::Bus;
/// use coziboy_cpu::memory::FlatMemory;
///
/// let mut mem = FlatMemory::new();
/// mem.load(0x0100, &[0x00, 0xC3, 0x50, 0x01]);
/// assert_eq!(mem.read16(0x0102), 0x0150);
/// ```
#[derive(Clone)]
pub struct FlatMemory {
    data: Vec<u8>,
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FlatMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlatMemory")
            .field("len", &self.data.len())
            .finish()
    }
}

impl FlatMemory {
    pub fn new() -> Self {
        Self {
            data: vec![0; ADDRESS_SPACE],
        }
    }

    /// Copy `image` into memory starting at `addr`.
    ///
    /// Bytes that would land past 0xFFFF are dropped; the number of bytes
    /// actually copied is returned.
    pub fn load(&mut self, addr: u16, image: &[u8]) -> usize {
        let start = addr as usize;
        let len = image.len().min(ADDRESS_SPACE - start);
        self.data[start..start + len].copy_from_slice(&image[..len]);
        if len < image.len() {
            log::warn!(
                "image truncated: {} of {} bytes loaded at 0x{:04X}",
                len,
                image.len(),
                addr
            );
        }
        len
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Bus for FlatMemory {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}
