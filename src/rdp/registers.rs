use bitflags::bitflags;

bitflags! {
    /// Low half of the RDP other-mode word (render mode + alpha compare).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OtherModeL: u32 {
        const ALPHA_COMPARE_THRESHOLD = 0x0000_0001;
        const ALPHA_COMPARE_DITHER = 0x0000_0003;
        const Z_SOURCE_PRIM = 0x0000_0004;
        const AA_EN = 0x0000_0008;
        const Z_CMP = 0x0000_0010;
        const Z_UPD = 0x0000_0020;
        const IM_RD = 0x0000_0040;
        const CLR_ON_CVG = 0x0000_0080;
        const CVG_DST_WRAP = 0x0000_0100;
        const CVG_DST_FULL = 0x0000_0200;
        const ZMODE_DEC = 0x0000_0C00;
        const CVG_X_ALPHA = 0x0000_1000;
        const ALPHA_CVG_SEL = 0x0000_2000;
        const FORCE_BL = 0x0000_4000;
    }
}

bitflags! {
    /// Geometry mode bits in F3DEX2 layout. Older families use other bit
    /// positions; the value is handed to the renderer untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GeometryMode: u32 {
        const ZBUFFER = 0x0000_0001;
        const SHADE = 0x0000_0004;
        const CULL_FRONT = 0x0000_0200;
        const CULL_BACK = 0x0000_0400;
        const FOG = 0x0001_0000;
        const LIGHTING = 0x0002_0000;
        const TEXTURE_GEN = 0x0004_0000;
        const TEXTURE_GEN_LINEAR = 0x0008_0000;
        const SHADING_SMOOTH = 0x0020_0000;
        const CLIPPING = 0x0080_0000;
    }
}

/// Raster pipeline mode, other-mode H bits 20..21.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleType {
    OneCycle,
    TwoCycle,
    Copy,
    Fill,
}

impl CycleType {
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 0x3 {
            0 => CycleType::OneCycle,
            1 => CycleType::TwoCycle,
            2 => CycleType::Copy,
            _ => CycleType::Fill,
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            CycleType::OneCycle => 0,
            CycleType::TwoCycle => 1,
            CycleType::Copy => 2,
            CycleType::Fill => 3,
        }
    }

    /// Copy and Fill draw the far rectangle edge.
    pub const fn far_edge_inclusive(self) -> bool {
        matches!(self, CycleType::Copy | CycleType::Fill)
    }
}

const G_MDSFT_CYCLETYPE: u32 = 20;

/// Both halves of the RDP other-mode state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtherMode {
    pub h: u32,
    pub l: u32,
}

impl OtherMode {
    /// What the parser assumes before the list sets anything.
    pub const FRAME_DEFAULT: OtherMode = OtherMode { h: 0, l: 0x0050_0001 };

    pub const fn cycle_type(&self) -> CycleType {
        CycleType::from_bits(self.h >> G_MDSFT_CYCLETYPE)
    }

    pub fn set_cycle_type(&mut self, cycle: CycleType) {
        self.h = (self.h & !(0x3 << G_MDSFT_CYCLETYPE)) | (cycle.bits() << G_MDSFT_CYCLETYPE);
    }

    pub fn render_flags(&self) -> OtherModeL {
        OtherModeL::from_bits_truncate(self.l)
    }

    /// Replaces `len` bits at `shift` of the high half.
    pub fn set_h_bits(&mut self, shift: u32, len: u32, data: u32) {
        self.h = splice(self.h, shift, len, data);
    }

    /// Replaces `len` bits at `shift` of the low half.
    pub fn set_l_bits(&mut self, shift: u32, len: u32, data: u32) {
        self.l = splice(self.l, shift, len, data);
    }
}

impl Default for OtherMode {
    fn default() -> Self {
        Self::FRAME_DEFAULT
    }
}

fn splice(word: u32, shift: u32, len: u32, data: u32) -> u32 {
    if len == 0 || shift >= 32 {
        return word;
    }
    let width_mask = if len >= 32 { u32::MAX } else { (1u32 << len) - 1 };
    let mask = width_mask << shift;
    (word & !mask) | (data & mask)
}
