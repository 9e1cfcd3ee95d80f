//! Tile descriptor commands. The interpreter only decodes these; texel
//! memory is owned by the [`TileState`](crate::renderer::TileState) side.

use crate::gbi::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RdpTile {
    pub tile_idx: u32,
    pub format: u8,
    pub size: u8,
    pub line: u32,
    pub tmem: u32,
    pub palette: u32,
    pub clamp_t: bool,
    pub mirror_t: bool,
    pub mask_t: u32,
    pub shift_t: u32,
    pub clamp_s: bool,
    pub mirror_s: bool,
    pub mask_s: u32,
    pub shift_s: u32,
}

impl From<Command> for RdpTile {
    fn from(cmd: Command) -> Self {
        let (w0, w1) = (cmd.w0, cmd.w1);
        Self {
            format: ((w0 >> 21) & 0x7) as u8,
            size: ((w0 >> 19) & 0x3) as u8,
            line: (w0 >> 9) & 0x1FF,
            tmem: w0 & 0x1FF,
            tile_idx: (w1 >> 24) & 0x7,
            palette: (w1 >> 20) & 0xF,
            clamp_t: w1 & (1 << 19) != 0,
            mirror_t: w1 & (1 << 18) != 0,
            mask_t: (w1 >> 14) & 0xF,
            shift_t: (w1 >> 10) & 0xF,
            clamp_s: w1 & (1 << 9) != 0,
            mirror_s: w1 & (1 << 8) != 0,
            mask_s: (w1 >> 4) & 0xF,
            shift_s: w1 & 0xF,
        }
    }
}

/// Tile bounds in 10.2 fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RdpTileSize {
    pub tile_idx: u32,
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl RdpTileSize {
    pub fn width(&self) -> u32 {
        (self.right / 4).saturating_sub(self.left / 4) + 1
    }

    pub fn height(&self) -> u32 {
        (self.bottom / 4).saturating_sub(self.top / 4) + 1
    }
}

impl From<Command> for RdpTileSize {
    fn from(cmd: Command) -> Self {
        Self {
            left: (cmd.w0 >> 12) & 0xFFF,
            top: cmd.w0 & 0xFFF,
            tile_idx: (cmd.w1 >> 24) & 0x7,
            right: (cmd.w1 >> 12) & 0xFFF,
            bottom: cmd.w1 & 0xFFF,
        }
    }
}

/// Shared layout of LoadTile, LoadBlock and LoadTLUT. For LoadBlock `sh`
/// is the texel count minus one and `th` is dxt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RdpLoad {
    pub tile_idx: u32,
    pub sl: u32,
    pub tl: u32,
    pub sh: u32,
    pub th: u32,
}

impl From<Command> for RdpLoad {
    fn from(cmd: Command) -> Self {
        Self {
            sl: (cmd.w0 >> 12) & 0xFFF,
            tl: cmd.w0 & 0xFFF,
            tile_idx: (cmd.w1 >> 24) & 0x7,
            sh: (cmd.w1 >> 12) & 0xFFF,
            th: cmd.w1 & 0xFFF,
        }
    }
}
