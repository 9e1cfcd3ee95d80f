//! Recording fakes for the renderer-side traits and a rig that runs lists
//! through a real [`Interpreter`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::dlist::{Interpreter, InterpreterConfig};
use crate::hacks::TitlePolicy;
use crate::instrument::DlStats;
use crate::math::{Matrix4, Vec2};
use crate::memory::Rdram;
use crate::rdp::{GeometryMode, ImageDescriptor, OtherMode, RdpLoad, RdpTile, RdpTileSize};
use crate::renderer::{FrameHost, Renderer, TileState, VertexLoad};
use crate::task::TaskDescriptor;
use crate::ucode::UcodeId;

pub(crate) const TEST_RDRAM_SIZE: usize = 0x40000;
pub(crate) const DL_BASE: u32 = 0x1000;
pub(crate) const UCODE_BASE: u32 = 0x20000;
pub(crate) const UCODE_DATA_BASE: u32 = 0x21000;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Shared event log for checking order across the renderer and host.
pub(crate) type Journal = Rc<RefCell<Vec<&'static str>>>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    ClearAllSurfaces,
    ResetMatrices(u32),
    BeginScene,
    EndScene,
    Scissor(u32, u32, u32, u32),
    TexRect { tile: u32, xy0: Vec2, xy1: Vec2, uv0: Vec2, uv1: Vec2 },
    TexRectFlip { tile: u32, xy0: Vec2, xy1: Vec2, uv0: Vec2, uv1: Vec2 },
    FillRect { xy0: Vec2, xy1: Vec2, color: u32 },
    ClearColor(u32),
    ClearZ,
    Mux(u64),
    AlphaRef(u8),
    OtherMode(OtherMode),
    GeometryMode(GeometryMode),
    Viewport(Vec2, Vec2),
    Projection { mat: Matrix4, push: bool, load: bool },
    WorldView { mat: Matrix4, push: bool, load: bool },
    PopWorldView(u32),
    LightColor(u32, u8, u8, u8),
    LightDirection(u32, i8, i8, i8),
    NumLights(u32),
    FogRange(i16, i16),
    Texture { tile: u32, level: u32, enabled: bool, scale_s: f32, scale_t: f32 },
    Vertices(VertexLoad),
    ModifyVertex(u32, u32, u32),
    Triangle(u32, u32, u32),
    Flush,
}

pub(crate) struct RecordingRenderer {
    pub calls: Vec<Call>,
    pub ready: bool,
    pub vi: (u32, u32),
    pub offscreen: bool,
    pub depth: f32,
    pub journal: Option<Journal>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            ready: true,
            vi: (320, 240),
            offscreen: false,
            depth: 0.0,
            journal: None,
        }
    }

    fn note(&self, event: &'static str) {
        if let Some(journal) = &self.journal {
            journal.borrow_mut().push(event);
        }
    }

    pub fn triangles(&self) -> Vec<(u32, u32, u32)> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                Call::Triangle(a, b, c) => Some((a, b, c)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }

    pub fn fill_rects(&self) -> Vec<(Vec2, Vec2, u32)> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                Call::FillRect { xy0, xy1, color } => Some((xy0, xy1, color)),
                _ => None,
            })
            .collect()
    }

    pub fn tex_rects(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::TexRect { .. } | Call::TexRectFlip { .. }))
            .cloned()
            .collect()
    }

    pub fn vertex_loads(&self) -> Vec<VertexLoad> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                Call::Vertices(load) => Some(load),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn clear_all_surfaces(&mut self) {
        self.calls.push(Call::ClearAllSurfaces);
    }

    fn vi_size(&self) -> (u32, u32) {
        self.vi
    }

    fn reset_matrices(&mut self, stack_size: u32) {
        self.calls.push(Call::ResetMatrices(stack_size));
    }

    fn begin_scene(&mut self) {
        self.note("begin_scene");
        self.calls.push(Call::BeginScene);
    }

    fn end_scene(&mut self) {
        self.note("end_scene");
        self.calls.push(Call::EndScene);
    }

    fn set_scissor(&mut self, left: u32, top: u32, right: u32, bottom: u32) {
        self.calls.push(Call::Scissor(left, top, right, bottom));
    }

    fn tex_rect(&mut self, tile: u32, xy0: Vec2, xy1: Vec2, uv0: Vec2, uv1: Vec2) {
        self.calls.push(Call::TexRect { tile, xy0, xy1, uv0, uv1 });
    }

    fn tex_rect_flip(&mut self, tile: u32, xy0: Vec2, xy1: Vec2, uv0: Vec2, uv1: Vec2) {
        self.calls.push(Call::TexRectFlip { tile, xy0, xy1, uv0, uv1 });
    }

    fn fill_rect(&mut self, xy0: Vec2, xy1: Vec2, color: u32) {
        self.calls.push(Call::FillRect { xy0, xy1, color });
    }

    fn clear_color_buffer(&mut self, color: u32) {
        self.calls.push(Call::ClearColor(color));
    }

    fn clear_z_buffer(&mut self) {
        self.calls.push(Call::ClearZ);
    }

    fn set_mux(&mut self, mux: u64) {
        self.calls.push(Call::Mux(mux));
    }

    fn set_alpha_ref(&mut self, alpha: u8) {
        self.calls.push(Call::AlphaRef(alpha));
    }

    fn set_other_mode(&mut self, mode: OtherMode) {
        self.calls.push(Call::OtherMode(mode));
    }

    fn set_geometry_mode(&mut self, mode: GeometryMode) {
        self.calls.push(Call::GeometryMode(mode));
    }

    fn set_viewport(&mut self, scale: Vec2, trans: Vec2) {
        self.calls.push(Call::Viewport(scale, trans));
    }

    fn set_projection(&mut self, mat: &Matrix4, push: bool, load: bool) {
        self.calls.push(Call::Projection { mat: *mat, push, load });
    }

    fn set_world_view(&mut self, mat: &Matrix4, push: bool, load: bool) {
        self.calls.push(Call::WorldView { mat: *mat, push, load });
    }

    fn pop_world_view(&mut self, count: u32) {
        self.calls.push(Call::PopWorldView(count));
    }

    fn set_light_color(&mut self, light_idx: u32, r: u8, g: u8, b: u8) {
        self.calls.push(Call::LightColor(light_idx, r, g, b));
    }

    fn set_light_direction(&mut self, light_idx: u32, x: i8, y: i8, z: i8) {
        self.calls.push(Call::LightDirection(light_idx, x, y, z));
    }

    fn set_num_lights(&mut self, count: u32) {
        self.calls.push(Call::NumLights(count));
    }

    fn set_fog_range(&mut self, multiplier: i16, offset: i16) {
        self.calls.push(Call::FogRange(multiplier, offset));
    }

    fn set_texture(&mut self, tile: u32, level: u32, enabled: bool, scale_s: f32, scale_t: f32) {
        self.calls.push(Call::Texture {
            tile,
            level,
            enabled,
            scale_s,
            scale_t,
        });
    }

    fn load_vertices(&mut self, _mem: &Rdram, load: VertexLoad) {
        self.calls.push(Call::Vertices(load));
    }

    fn modify_vertex(&mut self, vertex: u32, field: u32, value: u32) {
        self.calls.push(Call::ModifyVertex(vertex, field, value));
    }

    fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) -> bool {
        self.calls.push(Call::Triangle(v0, v1, v2));
        true
    }

    fn flush_triangles(&mut self) {
        self.calls.push(Call::Flush);
    }

    fn vertices_offscreen(&self, _v0: u32, _vn: u32) -> bool {
        self.offscreen
    }

    fn vertex_depth(&self, _vertex: u32) -> f32 {
        self.depth
    }
}

#[derive(Default)]
pub(crate) struct RecordingTiles {
    pub tiles: Vec<RdpTile>,
    pub sizes: Vec<RdpTileSize>,
    pub loads: Vec<(RdpLoad, ImageDescriptor)>,
}

impl TileState for RecordingTiles {
    fn set_tile(&mut self, tile: RdpTile) {
        self.tiles.push(tile);
    }

    fn set_tile_size(&mut self, size: RdpTileSize) {
        self.sizes.push(size);
    }

    fn load_block(&mut self, load: RdpLoad, image: &ImageDescriptor) {
        self.loads.push((load, *image));
    }

    fn load_tile(&mut self, load: RdpLoad, image: &ImageDescriptor) {
        self.loads.push((load, *image));
    }

    fn load_tlut(&mut self, load: RdpLoad, image: &ImageDescriptor) {
        self.loads.push((load, *image));
    }
}

#[derive(Default)]
pub(crate) struct RecordingHost {
    pub updates: u32,
    pub dp_interrupts: u32,
    pub journal: Option<Journal>,
}

impl FrameHost for RecordingHost {
    fn update_screen(&mut self) {
        self.updates += 1;
        if let Some(journal) = &self.journal {
            journal.borrow_mut().push("update_screen");
        }
    }

    fn signal_dp_complete(&mut self) {
        self.dp_interrupts += 1;
        if let Some(journal) = &self.journal {
            journal.borrow_mut().push("dp_complete");
        }
    }
}

/// Writes `(w0, w1)` pairs as consecutive commands starting at `address`.
pub(crate) fn write_list(mem: &mut Rdram, address: u32, cmds: &[(u32, u32)]) {
    for (i, &(w0, w1)) in cmds.iter().enumerate() {
        let at = address + 8 * i as u32;
        mem.write_u32(at, w0);
        mem.write_u32(at + 4, w1);
    }
}

/// Packs an opcode above 24 bits of arguments.
pub(crate) const fn op(opcode: u8, args: u32) -> u32 {
    ((opcode as u32) << 24) | (args & 0x00FF_FFFF)
}

/// An interpreter with a forced profile, its memory and recording fakes.
pub(crate) struct TestRig {
    pub mem: Rdram,
    pub interp: Interpreter,
    pub renderer: RecordingRenderer,
    pub tiles: RecordingTiles,
    pub host: RecordingHost,
    pub stats: DlStats,
}

impl TestRig {
    pub fn new(ucode: UcodeId) -> Self {
        Self::with_config(InterpreterConfig {
            forced_ucode: Some(ucode),
            ..InterpreterConfig::default()
        })
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        init_logger();
        Self {
            mem: Rdram::with_size(TEST_RDRAM_SIZE),
            interp: Interpreter::new(config),
            renderer: RecordingRenderer::new(),
            tiles: RecordingTiles::default(),
            host: RecordingHost::default(),
            stats: DlStats::new(),
        }
    }

    pub fn policy(&self) -> &TitlePolicy {
        self.interp.policy()
    }

    pub fn task(&self, data_ptr: u32) -> TaskDescriptor {
        TaskDescriptor {
            ucode: UCODE_BASE,
            ucode_size: 0x1000,
            ucode_data: UCODE_DATA_BASE,
            ucode_data_size: 0x800,
            data_ptr,
            dram_stack_size: 0x400,
        }
    }

    pub fn write(&mut self, address: u32, cmds: &[(u32, u32)]) {
        write_list(&mut self.mem, address, cmds);
    }

    /// Writes `cmds` at [`DL_BASE`] and processes one task starting there.
    pub fn run(&mut self, cmds: &[(u32, u32)]) {
        self.write(DL_BASE, cmds);
        self.run_at(DL_BASE);
    }

    pub fn run_at(&mut self, data_ptr: u32) {
        let task = self.task(data_ptr);
        self.run_task(&task);
    }

    pub fn run_task(&mut self, task: &TaskDescriptor) {
        self.interp.process_with(
            task,
            &self.mem,
            &mut self.renderer,
            &mut self.tiles,
            &mut self.host,
            &mut self.stats,
        );
    }
}
