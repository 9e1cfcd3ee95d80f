//! GBI command words.
//!
//! Every display-list entry is 64 bits. The top byte of the first word is
//! the opcode; the remaining bits are decoded per opcode by the accessors
//! below.

pub mod opcodes;

/// Image format `G_IM_FMT_RGBA`; the only colour-image format drawn to.
pub const G_IM_FMT_RGBA: u8 = 0;
/// Pixel size `G_IM_SIZ_16B`; any other colour-image size is 32-bit.
pub const G_IM_SIZ_16B: u8 = 2;

#[inline]
const fn bits(word: u32, shift: u32, width: u32) -> u32 {
    (word >> shift) & ((1 << width) - 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub w0: u32,
    pub w1: u32,
}

impl Command {
    pub const fn new(w0: u32, w1: u32) -> Self {
        Self { w0, w1 }
    }

    #[inline]
    pub const fn opcode(&self) -> u8 {
        (self.w0 >> 24) as u8
    }

    /// Lower 24 bits of the first word.
    #[inline]
    pub const fn arg0(&self) -> u32 {
        self.w0 & 0x00FF_FFFF
    }

    // --- image descriptors (SetTImg / SetCImg) ---

    pub const fn img_format(&self) -> u8 {
        bits(self.w0, 21, 3) as u8
    }

    pub const fn img_size(&self) -> u8 {
        bits(self.w0, 19, 2) as u8
    }

    pub const fn img_width(&self) -> u32 {
        bits(self.w0, 0, 12) + 1
    }

    // --- scissor, 10.2 fixed point ---

    pub const fn scissor_x0(&self) -> u32 {
        bits(self.w0, 12, 12)
    }

    pub const fn scissor_y0(&self) -> u32 {
        bits(self.w0, 0, 12)
    }

    pub const fn scissor_x1(&self) -> u32 {
        bits(self.w1, 12, 12)
    }

    pub const fn scissor_y1(&self) -> u32 {
        bits(self.w1, 0, 12)
    }

    pub const fn scissor_mode(&self) -> u32 {
        bits(self.w1, 24, 2)
    }

    // --- fill rectangle, integer pixels (fraction bits dropped) ---

    pub const fn fillrect_x1(&self) -> u32 {
        bits(self.w0, 14, 10)
    }

    pub const fn fillrect_y1(&self) -> u32 {
        bits(self.w0, 2, 10)
    }

    pub const fn fillrect_x0(&self) -> u32 {
        bits(self.w1, 14, 10)
    }

    pub const fn fillrect_y0(&self) -> u32 {
        bits(self.w1, 2, 10)
    }

    // --- colours ---

    pub const fn color_r(&self) -> u8 {
        (self.w1 >> 24) as u8
    }

    pub const fn color_g(&self) -> u8 {
        (self.w1 >> 16) as u8
    }

    pub const fn color_b(&self) -> u8 {
        (self.w1 >> 8) as u8
    }

    pub const fn color_a(&self) -> u8 {
        self.w1 as u8
    }

    pub const fn prim_min_level(&self) -> u8 {
        (self.w0 >> 8) as u8
    }

    pub const fn prim_level(&self) -> u8 {
        self.w0 as u8
    }

    // --- prim depth ---

    pub const fn primdepth_z(&self) -> u16 {
        (self.w1 >> 16) as u16
    }

    pub const fn primdepth_dz(&self) -> u16 {
        self.w1 as u16
    }

    /// Combiner mux: 24 bits of the first word above the full second word.
    pub const fn combine_mux(&self) -> u64 {
        ((self.arg0() as u64) << 32) | self.w1 as u64
    }
}

/// A texture rectangle assembled from three consecutive commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexRectCommand {
    pub cmd0: u32,
    pub cmd1: u32,
    pub cmd2: u32,
    pub cmd3: u32,
}

impl TexRectCommand {
    pub const fn x1(&self) -> u32 {
        bits(self.cmd0, 12, 12)
    }

    pub const fn y1(&self) -> u32 {
        bits(self.cmd0, 0, 12)
    }

    pub const fn x0(&self) -> u32 {
        bits(self.cmd1, 12, 12)
    }

    pub const fn y0(&self) -> u32 {
        bits(self.cmd1, 0, 12)
    }

    pub const fn tile_idx(&self) -> u32 {
        bits(self.cmd1, 24, 3)
    }

    /// S in 10.5.
    pub const fn s(&self) -> i16 {
        (self.cmd2 >> 16) as i16
    }

    /// T in 10.5.
    pub const fn t(&self) -> i16 {
        self.cmd2 as i16
    }

    /// DsDx in 5.10.
    pub const fn dsdx(&self) -> i16 {
        (self.cmd3 >> 16) as i16
    }

    /// DtDy in 5.10.
    pub const fn dtdy(&self) -> i16 {
        self.cmd3 as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_fields() {
        // G_SETCIMG RGBA 16b width 320
        let cmd = Command::new(0xFF10_013F, 0x0010_0000);
        assert_eq!(cmd.opcode(), 0xFF);
        assert_eq!(cmd.img_format(), G_IM_FMT_RGBA);
        assert_eq!(cmd.img_size(), G_IM_SIZ_16B);
        assert_eq!(cmd.img_width(), 320);
    }

    #[test]
    fn test_fillrect_fields_drop_fraction() {
        // x1=319 y1=239, x0=0 y0=0 in 10.2
        let cmd = Command::new(0xF600_0000 | (319 << 14) | (239 << 2), 0);
        assert_eq!(cmd.fillrect_x1(), 319);
        assert_eq!(cmd.fillrect_y1(), 239);
        assert_eq!(cmd.fillrect_x0(), 0);
    }

    #[test]
    fn test_texrect_signed_fields() {
        let rect = TexRectCommand {
            cmd0: 0xE400_0000,
            cmd1: 0x0300_0000,
            cmd2: 0xFFE0_0020,
            cmd3: 0x0400_FC00,
        };
        assert_eq!(rect.tile_idx(), 3);
        assert_eq!(rect.s(), -32);
        assert_eq!(rect.t(), 32);
        assert_eq!(rect.dsdx(), 1024);
        assert_eq!(rect.dtdy(), -1024);
    }

    #[test]
    fn test_combine_mux_layout() {
        let cmd = Command::new(0xFC12_3456, 0x89AB_CDEF);
        assert_eq!(cmd.combine_mux(), 0x0012_3456_89AB_CDEF);
    }
}
