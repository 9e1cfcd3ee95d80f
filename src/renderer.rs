//! Seams to the code that lives outside the interpreter: the renderer,
//! the tile/texel-memory bookkeeping and the frame driver.

use crate::math::{Color, Matrix4, Vec2};
use crate::memory::Rdram;
use crate::rdp::{GeometryMode, ImageDescriptor, OtherMode, RdpLoad, RdpTile, RdpTileSize};

/// Vertex record layouts understood by the renderer's vertex pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    /// 16-byte `Vtx` as used by Fast3D, F3DEX and F3DEX2.
    Standard,
    /// Perfect Dark: 12-byte records, colours indexed through `aux_addr`.
    PerfectDark { aux_addr: u32 },
    /// Conker: standard records, lighting computed from separate light space.
    Conker,
    /// Diddy Kong Racing: 10-byte records.
    Dkr { billboard: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLoad {
    pub address: u32,
    pub v0: u32,
    pub count: u32,
    pub format: VertexFormat,
}

pub trait Renderer {
    fn is_ready(&self) -> bool {
        true
    }

    fn clear_all_surfaces(&mut self) {}

    fn set_vi_scales(&mut self) {}

    /// Active video mode size in pixels.
    fn vi_size(&self) -> (u32, u32) {
        (320, 240)
    }

    fn reset_matrices(&mut self, _stack_size: u32) {}
    fn reset(&mut self) {}
    fn begin_scene(&mut self) {}
    fn end_scene(&mut self) {}

    fn set_scissor(&mut self, left: u32, top: u32, right: u32, bottom: u32);
    fn tex_rect(&mut self, tile_idx: u32, xy0: Vec2, xy1: Vec2, uv0: Vec2, uv1: Vec2);
    fn tex_rect_flip(&mut self, tile_idx: u32, xy0: Vec2, xy1: Vec2, uv0: Vec2, uv1: Vec2);
    fn fill_rect(&mut self, xy0: Vec2, xy1: Vec2, color: u32);
    fn clear_color_buffer(&mut self, _color: u32) {}
    fn clear_z_buffer(&mut self) {}

    fn set_mux(&mut self, _mux: u64) {}
    fn set_primitive_color(&mut self, _color: Color) {}
    fn set_primitive_lod(&mut self, _min_level: u8, _level: u8) {}
    fn set_primitive_depth(&mut self, _z: u16) {}
    fn set_env_color(&mut self, _color: Color) {}
    fn set_fog_color(&mut self, _color: Color) {}
    fn set_alpha_ref(&mut self, _alpha: u8) {}
    fn set_other_mode(&mut self, _mode: OtherMode) {}
    fn set_geometry_mode(&mut self, _mode: GeometryMode) {}

    fn set_viewport(&mut self, _scale: Vec2, _trans: Vec2) {}
    /// `load` replaces the top of the stack instead of multiplying into it.
    fn set_projection(&mut self, _mat: &Matrix4, _push: bool, _load: bool) {}
    fn set_world_view(&mut self, _mat: &Matrix4, _push: bool, _load: bool) {}
    fn pop_world_view(&mut self, _count: u32) {}
    fn set_light_color(&mut self, _light_idx: u32, _r: u8, _g: u8, _b: u8) {}
    fn set_light_direction(&mut self, _light_idx: u32, _x: i8, _y: i8, _z: i8) {}
    fn set_num_lights(&mut self, _count: u32) {}
    fn set_fog_range(&mut self, _multiplier: i16, _offset: i16) {}
    fn set_texture(
        &mut self,
        _tile_idx: u32,
        _level: u32,
        _enabled: bool,
        _scale_s: f32,
        _scale_t: f32,
    ) {
    }

    fn load_vertices(&mut self, _mem: &Rdram, _load: VertexLoad) {}
    /// Overwrites one attribute (`G_MWO_POINT_*`) of a loaded vertex.
    fn modify_vertex(&mut self, _vertex: u32, _field: u32, _value: u32) {}
    /// Queues a triangle; returns false when it was culled.
    fn add_triangle(&mut self, _v0: u32, _v1: u32, _v2: u32) -> bool {
        false
    }
    fn flush_triangles(&mut self) {}
    /// True when every vertex in `v0..=vn` is outside the same clip plane.
    fn vertices_offscreen(&self, _v0: u32, _vn: u32) -> bool {
        false
    }
    fn vertex_depth(&self, _vertex: u32) -> f32 {
        0.0
    }
}

/// Texel-memory bookkeeping. Loads see the texture image they read from.
pub trait TileState {
    fn set_tile(&mut self, tile: RdpTile);
    fn set_tile_size(&mut self, size: RdpTileSize);
    fn load_block(&mut self, load: RdpLoad, image: &ImageDescriptor);
    fn load_tile(&mut self, load: RdpLoad, image: &ImageDescriptor);
    fn load_tlut(&mut self, load: RdpLoad, image: &ImageDescriptor);
}

/// Hooks into the surrounding frame driver.
pub trait FrameHost {
    fn update_screen(&mut self) {}
    /// Raises MI_INTR_DP toward the CPU.
    fn signal_dp_complete(&mut self);
}
