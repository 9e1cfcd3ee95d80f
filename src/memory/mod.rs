//! Guest RDRAM image as seen by the display-list interpreter.
//!
//! Words are kept in host order: each aligned 32-bit word is stored
//! little-endian, so narrower accesses have to undo the byte swizzle.

pub const RDRAM_SIZE: usize = 8 * 1024 * 1024;

/// XOR applied to a byte address to find the byte inside its host word.
pub const U8_TWIDDLE: u32 = 0x3;
/// XOR applied to a halfword address to find the halfword inside its host word.
pub const U16_TWIDDLE: u32 = 0x2;

pub struct Rdram {
    pub(crate) ram: Vec<u8>,
}

impl Rdram {
    pub fn new() -> Self {
        Self::with_size(RDRAM_SIZE)
    }

    pub fn with_size(size: usize) -> Self {
        // Keep the size word aligned so read_u32 never straddles the end.
        Rdram {
            ram: vec![0; (size + 3) & !3],
        }
    }

    pub fn len(&self) -> usize {
        self.ram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ram.is_empty()
    }

    /// Whether `len` bytes starting at `addr` lie inside the image.
    pub fn contains(&self, addr: u32, len: u32) -> bool {
        (addr as usize)
            .checked_add(len as usize)
            .map(|end| end <= self.ram.len())
            .unwrap_or(false)
    }

    pub fn read_u32(&self, addr: u32) -> u32 {
        let addr = addr & !3;
        debug_assert!(self.contains(addr, 4), "RDRAM read out of range: 0x{:08X}", addr);
        let idx = addr as usize;
        match self.ram.get(idx..idx + 4) {
            Some(b) => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            None => 0,
        }
    }

    pub fn read_u16(&self, addr: u32) -> u16 {
        let addr = (addr & !1) ^ U16_TWIDDLE;
        debug_assert!(self.contains(addr, 2), "RDRAM read out of range: 0x{:08X}", addr);
        let idx = addr as usize;
        match self.ram.get(idx..idx + 2) {
            Some(b) => u16::from_le_bytes([b[0], b[1]]),
            None => 0,
        }
    }

    pub fn read_s16(&self, addr: u32) -> i16 {
        self.read_u16(addr) as i16
    }

    pub fn read_u8(&self, addr: u32) -> u8 {
        let addr = addr ^ U8_TWIDDLE;
        debug_assert!(self.contains(addr, 1), "RDRAM read out of range: 0x{:08X}", addr);
        self.ram.get(addr as usize).copied().unwrap_or(0)
    }

    pub fn read_s8(&self, addr: u32) -> i8 {
        self.read_u8(addr) as i8
    }

    pub fn write_u32(&mut self, addr: u32, data: u32) {
        let idx = (addr & !3) as usize;
        if let Some(b) = self.ram.get_mut(idx..idx + 4) {
            b.copy_from_slice(&data.to_le_bytes());
        }
    }

    pub fn write_u16(&mut self, addr: u32, data: u16) {
        let idx = ((addr & !1) ^ U16_TWIDDLE) as usize;
        if let Some(b) = self.ram.get_mut(idx..idx + 2) {
            b.copy_from_slice(&data.to_le_bytes());
        }
    }

    pub fn write_u8(&mut self, addr: u32, data: u8) {
        if let Some(b) = self.ram.get_mut((addr ^ U8_TWIDDLE) as usize) {
            *b = data;
        }
    }

    /// Copies big-endian guest bytes (as they appear on the cartridge) into RDRAM.
    pub fn load_be_bytes(&mut self, addr: u32, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            self.write_u8(addr.wrapping_add(i as u32), byte);
        }
    }
}

impl Default for Rdram {
    fn default() -> Self {
        Self::new()
    }
}
