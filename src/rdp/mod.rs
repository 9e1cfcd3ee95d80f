//! Coprocessor state owned by the interpreter between frames.

pub mod registers;
pub mod tile;

pub use registers::{CycleType, GeometryMode, OtherMode, OtherModeL};
pub use tile::{RdpLoad, RdpTile, RdpTileSize};

use crate::gbi::{G_IM_FMT_RGBA, G_IM_SIZ_16B};
use crate::math::Matrix4;

/// Texture, colour or depth image as last set by the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub format: u8,
    pub size: u8,
    /// Row width in texels.
    pub width: u32,
    pub address: u32,
}

impl ImageDescriptor {
    pub const fn new(format: u8, size: u8, width: u32, address: u32) -> Self {
        Self {
            format,
            size,
            width,
            address,
        }
    }

    /// Bytes per row.
    pub fn pitch(&self) -> u32 {
        (self.width << self.size) >> 1
    }
}

impl Default for ImageDescriptor {
    fn default() -> Self {
        Self::new(G_IM_FMT_RGBA, G_IM_SIZ_16B, 1, 0)
    }
}

/// Scissor in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scissor {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Scissor {
    pub const DEFAULT: Scissor = Scissor {
        left: 0,
        top: 0,
        right: 320,
        bottom: 240,
    };

    pub fn is_well_formed(&self) -> bool {
        self.left < self.right && self.top < self.bottom
    }

    /// Whether the inclusive pixel box lies completely outside.
    pub fn rejects(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> bool {
        x0 >= self.right || y0 >= self.bottom || x1 < self.left || y1 < self.top
    }
}

impl Default for Scissor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// State used only by the Diddy Kong Racing family.
#[derive(Debug, Clone)]
pub struct DkrState {
    pub matrix_addr: u32,
    pub vertex_addr: u32,
    pub matrix_index: usize,
    pub billboard: bool,
    /// Vertices appended since the last triangle DMA.
    pub vertex_count: u32,
    pub matrices: [Matrix4; 4],
}

impl Default for DkrState {
    fn default() -> Self {
        Self {
            matrix_addr: 0,
            vertex_addr: 0,
            matrix_index: 0,
            billboard: false,
            vertex_count: 0,
            matrices: [Matrix4::IDENTITY; 4],
        }
    }
}

/// Per-frame RDP/RSP state. Reset at the start of every processed task.
#[derive(Debug, Clone)]
pub struct RdpState {
    pub texture_image: ImageDescriptor,
    pub color_image: ImageDescriptor,
    pub depth_image: ImageDescriptor,
    /// Last well-formed scissor written by the list.
    pub scissor: Scissor,
    /// Fill colour in the colour image's native pixel layout.
    pub fill_color: u32,
    pub other_mode: OtherMode,
    pub geometry_mode: GeometryMode,
    pub rdp_half1: u32,
    /// Perfect Dark colour-index buffer.
    pub aux_addr: u32,
    pub dkr: DkrState,
}

impl RdpState {
    pub fn new() -> Self {
        Self {
            texture_image: ImageDescriptor::default(),
            color_image: ImageDescriptor::default(),
            depth_image: ImageDescriptor::default(),
            scissor: Scissor::DEFAULT,
            fill_color: 0xFFFF_FFFF,
            other_mode: OtherMode::FRAME_DEFAULT,
            geometry_mode: GeometryMode::empty(),
            rdp_half1: 0,
            aux_addr: 0,
            dkr: DkrState::default(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn cycle_type(&self) -> CycleType {
        self.other_mode.cycle_type()
    }
}

impl Default for RdpState {
    fn default() -> Self {
        Self::new()
    }
}
