//! RSP segment table and segmented address translation.

pub const NUM_SEGMENTS: usize = 16;

#[derive(Debug, Clone, Default)]
pub struct SegmentTable {
    bases: [u32; NUM_SEGMENTS],
}

impl SegmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Segmented address -> RDRAM offset. The result is not bounds checked.
    #[inline]
    pub fn resolve(&self, addr: u32) -> u32 {
        let base = self.bases[((addr >> 24) & 0x0F) as usize] & 0x00FF_FFFF;
        base.wrapping_add(addr & 0x00FF_FFFF)
    }

    pub fn set(&mut self, segment: usize, base: u32) {
        if let Some(slot) = self.bases.get_mut(segment) {
            *slot = base;
        }
    }

    pub fn base(&self, segment: usize) -> u32 {
        self.bases.get(segment).copied().unwrap_or(0)
    }
}
