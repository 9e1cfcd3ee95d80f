//! RDP commands. These mean the same thing under every microcode.

use crate::dlist::DlContext;
use crate::gbi::{Command, TexRectCommand, G_IM_FMT_RGBA, G_IM_SIZ_16B};
use crate::math::{Color, Vec2};
use crate::rdp::{CycleType, ImageDescriptor, OtherMode, RdpLoad, RdpTile, RdpTileSize, Scissor};

use super::move_mem_viewport;

/// Any opcode the active profile does not implement ends the current list.
pub fn unknown(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.report_unknown(cmd);
    ctx.return_from_list();
}

pub fn noop(_ctx: &mut DlContext<'_>, _cmd: Command) {}

/// Syncs are meaningless here; completion is signalled after the list.
pub fn sync(_ctx: &mut DlContext<'_>, _cmd: Command) {}

/// Raw RDP triangles never reach a high-level parser.
pub fn tri_rsp(_ctx: &mut DlContext<'_>, cmd: Command) {
    log::debug!("    RSP Tri {:08X} {:08X} (ignored)", cmd.w0, cmd.w1);
}

pub fn set_key_gb(_ctx: &mut DlContext<'_>, _cmd: Command) {
    log::trace!("    SetKeyGB (ignored)");
}

pub fn set_key_r(_ctx: &mut DlContext<'_>, _cmd: Command) {
    log::trace!("    SetKeyR (ignored)");
}

pub fn set_convert(_ctx: &mut DlContext<'_>, _cmd: Command) {
    log::trace!("    SetConvert (ignored)");
}

pub fn set_prim_depth(ctx: &mut DlContext<'_>, cmd: Command) {
    log::trace!("    SetPrimDepth z[0x{:04X}] dz[0x{:04X}]", cmd.primdepth_z(), cmd.primdepth_dz());
    ctx.renderer.set_primitive_depth(cmd.primdepth_z());
}

pub fn set_other_mode(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.state.other_mode = OtherMode { h: cmd.w0, l: cmd.w1 };
    ctx.renderer.set_other_mode(ctx.state.other_mode);
}

pub fn set_scissor(ctx: &mut DlContext<'_>, cmd: Command) {
    // 10.2 fixed point
    let scissor = Scissor {
        left: cmd.scissor_x0() >> 2,
        top: cmd.scissor_y0() >> 2,
        right: cmd.scissor_x1() >> 2,
        bottom: cmd.scissor_y1() >> 2,
    };

    // Split-screen titles render the right half into an unaligned colour image.
    if ctx.policy.scissor_viewport_on_misaligned_ci && ctx.state.color_image.address % 0x100 != 0 {
        let address = ctx.resolve(cmd.w1);
        move_mem_viewport(ctx, address);
    }

    log::trace!(
        "    x0={} y0={} x1={} y1={} mode={}",
        scissor.left,
        scissor.top,
        scissor.right,
        scissor.bottom,
        cmd.scissor_mode()
    );

    // An inverted scissor is ignored; clipping keeps using the previous one.
    if scissor.is_well_formed() {
        ctx.state.scissor = scissor;
        ctx.renderer
            .set_scissor(scissor.left, scissor.top, scissor.right, scissor.bottom);
    }
}

pub fn set_tile(ctx: &mut DlContext<'_>, cmd: Command) {
    let tile = RdpTile::from(cmd);
    log::trace!(
        "    Tile[{}] Format[{}/{}] Line[{}] TMEM[0x{:03X}] Palette[{}]",
        tile.tile_idx,
        tile.format,
        tile.size,
        tile.line,
        tile.tmem,
        tile.palette
    );
    ctx.tiles.set_tile(tile);
}

pub fn set_tile_size(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.tiles.set_tile_size(RdpTileSize::from(cmd));
}

pub fn load_block(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.tiles.load_block(RdpLoad::from(cmd), &ctx.state.texture_image);
}

pub fn load_tile(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.tiles.load_tile(RdpLoad::from(cmd), &ctx.state.texture_image);
}

pub fn load_tlut(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.tiles.load_tlut(RdpLoad::from(cmd), &ctx.state.texture_image);
}

fn image_from(ctx: &DlContext<'_>, cmd: Command) -> ImageDescriptor {
    ImageDescriptor::new(cmd.img_format(), cmd.img_size(), cmd.img_width(), ctx.resolve(cmd.w1))
}

pub fn set_timg(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.state.texture_image = image_from(ctx, cmd);
    log::trace!("    TImg {:?}", ctx.state.texture_image);
}

pub fn set_cimg(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.state.color_image = image_from(ctx, cmd);
    log::trace!("    CImg {:?}", ctx.state.color_image);
}

pub fn set_zimg(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.state.depth_image.address = ctx.resolve(cmd.w1);
    log::trace!("    ZImg Adr[0x{:08X}]", ctx.state.depth_image.address);
}

pub fn set_combine(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.renderer.set_mux(cmd.combine_mux());
}

pub fn set_fill_color(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.state.fill_color = cmd.w1;
}

fn color_of(cmd: Command) -> Color {
    Color::new(cmd.color_r(), cmd.color_g(), cmd.color_b(), cmd.color_a())
}

pub fn set_fog_color(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.renderer.set_fog_color(color_of(cmd));
}

/// Only the alpha is used, as the alpha-compare reference.
pub fn set_blend_color(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.renderer.set_alpha_ref(cmd.color_a());
}

pub fn set_prim_color(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.renderer.set_primitive_lod(cmd.prim_min_level(), cmd.prim_level());
    ctx.renderer.set_primitive_color(color_of(cmd));
}

pub fn set_env_color(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.renderer.set_env_color(color_of(cmd));
}

/// Whether a rectangle in whole pixels can be skipped: off the scissor, or
/// drawn into a colour image the renderer can't target.
fn rect_rejected(ctx: &mut DlContext<'_>, x0: u32, y0: u32, x1: u32, y1: u32) -> bool {
    if ctx.state.scissor.rejects(x0, y0, x1, y1) || ctx.state.color_image.format != G_IM_FMT_RGBA {
        ctx.instr.on_rect_clipped();
        return true;
    }
    false
}

/// Screen and texture coordinates of a texture rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RectCoords {
    pub xy0: Vec2,
    pub xy1: Vec2,
    pub uv0: Vec2,
    pub uv1: Vec2,
}

/// Converts the fixed-point fields. Copy and Fill draw the far edge; Copy
/// also emits four texels per step so the S gradient is a quarter.
pub(crate) fn tex_rect_coords(rect: &TexRectCommand, cycle: CycleType, flip: bool) -> RectCoords {
    let mut d = Vec2::new(rect.dsdx() as f32 / 1024.0, rect.dtdy() as f32 / 1024.0);
    let xy0 = Vec2::new(rect.x0() as f32 / 4.0, rect.y0() as f32 / 4.0);
    let t = if rect.dtdy() < 0 { rect.t() as i32 + 32 } else { rect.t() as i32 };
    let uv0 = Vec2::new(rect.s() as f32 / 32.0, t as f32 / 32.0);

    if cycle == CycleType::Copy {
        d.x *= 0.25;
    }
    let xy1 = if cycle.far_edge_inclusive() {
        Vec2::new((rect.x1() + 4) as f32 * 0.25, (rect.y1() + 4) as f32 * 0.25)
    } else {
        Vec2::new(rect.x1() as f32 * 0.25, rect.y1() as f32 * 0.25)
    };

    let (span_s, span_t) = if flip {
        (xy1.y - xy0.y, xy1.x - xy0.x)
    } else {
        (xy1.x - xy0.x, xy1.y - xy0.y)
    };
    let uv1 = Vec2::new(uv0.x + d.x * span_s, uv0.y + d.y * span_t);

    RectCoords { xy0, xy1, uv0, uv1 }
}

pub(crate) fn draw_tex_rect(ctx: &mut DlContext<'_>, rect: &TexRectCommand, flip: bool) {
    if rect_rejected(ctx, rect.x0() >> 2, rect.y0() >> 2, rect.x1() >> 2, rect.y1() >> 2) {
        return;
    }

    let c = tex_rect_coords(rect, ctx.state.cycle_type(), flip);
    log::trace!(
        "    Screen({:.1},{:.1}) -> ({:.1},{:.1}) Tile[{}] Tex({:.3},{:.3}) -> ({:.3},{:.3})",
        c.xy0.x,
        c.xy0.y,
        c.xy1.x,
        c.xy1.y,
        rect.tile_idx(),
        c.uv0.x,
        c.uv0.y,
        c.uv1.x,
        c.uv1.y
    );

    if flip {
        ctx.renderer.tex_rect_flip(rect.tile_idx(), c.xy0, c.xy1, c.uv0, c.uv1);
    } else {
        ctx.renderer.tex_rect(rect.tile_idx(), c.xy0, c.xy1, c.uv0, c.uv1);
    }
}

/// The rectangle's texture fields follow in the second word of the next two
/// commands (RDP half 1 and half 2).
fn fetch_tex_rect(ctx: &mut DlContext<'_>, cmd: Command) -> TexRectCommand {
    let half1 = ctx.fetch_next();
    let half2 = ctx.fetch_next();
    TexRectCommand {
        cmd0: cmd.w0,
        cmd1: cmd.w1,
        cmd2: half1.w1,
        cmd3: half2.w1,
    }
}

pub fn tex_rect(ctx: &mut DlContext<'_>, cmd: Command) {
    let rect = fetch_tex_rect(ctx, cmd);
    draw_tex_rect(ctx, &rect, false);
}

pub fn tex_rect_flip(ctx: &mut DlContext<'_>, cmd: Command) {
    let rect = fetch_tex_rect(ctx, cmd);
    draw_tex_rect(ctx, &rect, true);
}

/// Fill colour converted from the colour image's pixel layout.
fn fill_color_argb(ctx: &DlContext<'_>) -> u32 {
    let fill = ctx.state.fill_color;
    let color = if ctx.state.color_image.size == G_IM_SIZ_16B {
        Color::from_rgba5551(fill as u16)
    } else {
        Color::from_rgba8888(fill)
    };
    color.to_argb()
}

pub fn fill_rect(ctx: &mut DlContext<'_>, cmd: Command) {
    let (x0, y0) = (cmd.fillrect_x0(), cmd.fillrect_y0());
    let (x1, y1) = (cmd.fillrect_x1(), cmd.fillrect_y1());

    if ctx.state.color_image.format != G_IM_FMT_RGBA {
        log::trace!("    Ignoring FillRect into non-RGBA image");
        ctx.instr.on_rect_clipped();
        return;
    }

    // Filling the depth image is a Z clear.
    if ctx.state.depth_image.address == ctx.state.color_image.address {
        log::trace!("    Clearing ZBuffer");
        ctx.renderer.clear_z_buffer();
        return;
    }

    let cycle = ctx.state.cycle_type();
    let color = if cycle == CycleType::Fill {
        let color = fill_color_argb(ctx);
        let (vi_width, vi_height) = ctx.renderer.vi_size();
        let whole_screen = x1.wrapping_sub(x0) == vi_width && y1.wrapping_sub(y0) == vi_height;
        if whole_screen && ctx.policy.clear_on_fullscreen_fill {
            log::trace!("    Clearing Colour Buffer");
            ctx.renderer.clear_color_buffer(color);
            return;
        }
        color
    } else {
        Color::TRANSPARENT_BLACK.to_argb()
    };

    if rect_rejected(ctx, x0, y0, x1, y1) {
        return;
    }

    log::trace!("    Filling Rectangle ({},{})->({},{})", x0, y0, x1, y1);

    let xy0 = Vec2::new(x0 as f32, y0 as f32);
    let mut xy1 = Vec2::new(x1 as f32, y1 as f32);
    if cycle.far_edge_inclusive() {
        xy1.x += 1.0;
        xy1.y += 1.0;
    }
    ctx.renderer.fill_rect(xy0, xy1, color);
}
