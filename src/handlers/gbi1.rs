//! F3DEX 1.x commands. Most of them are shared with Fast3D and a few are
//! reused by F3DEX2 under new opcode numbers.

use crate::dlist::DlContext;
use crate::gbi::opcodes::*;
use crate::gbi::Command;
use crate::rdp::GeometryMode;
use crate::renderer::VertexFormat;

use super::{
    batch_triangles, cull_display_list, load_matrix, load_vertices, move_mem_light,
    move_mem_viewport,
};

pub fn mtx(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = ctx.resolve(cmd.w1);
    let params = (cmd.w0 >> 16) & 0xFF;
    load_matrix(ctx, address, params & 0x1 != 0, params & 0x2 != 0, params & 0x4 != 0);
}

pub fn pop_mtx(ctx: &mut DlContext<'_>, cmd: Command) {
    // Only the modelview stack can be popped.
    if cmd.w1 & 0x1 == 0 {
        ctx.renderer.pop_world_view(1);
    }
}

pub fn vtx(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = ctx.resolve(cmd.w1);
    let v0 = ((cmd.w0 >> 16) & 0xFF) / 2;
    let n = (cmd.w0 >> 10) & 0x3F;
    load_vertices(ctx, address, v0, n, VertexFormat::Standard);
}

pub fn modify_vtx(ctx: &mut DlContext<'_>, cmd: Command) {
    let field = (cmd.w0 >> 16) & 0xFF;
    let vertex = (cmd.w0 & 0xFFFF) / 2;
    ctx.renderer.modify_vertex(vertex, field, cmd.w1);
}

pub fn display_list(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = ctx.resolve(cmd.w1);
    match (cmd.w0 >> 16) & 0xFF {
        G_DL_NOPUSH => {
            log::trace!("    Address=0x{:08X} No Push", address);
            ctx.branch(address);
        }
        G_DL_PUSH => {
            log::trace!("    Address=0x{:08X} Push", address);
            ctx.call(address);
        }
        other => {
            log::debug!("    Address=0x{:08X} push flag 0x{:02X}, branching", address, other);
            ctx.branch(address);
        }
    }
}

pub fn end_display_list(ctx: &mut DlContext<'_>, _cmd: Command) {
    ctx.return_from_list();
}

pub fn rdp_half1(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.state.rdp_half1 = cmd.w1;
}

pub fn rdp_half2(_ctx: &mut DlContext<'_>, cmd: Command) {
    log::trace!("    RDPHalf_2 0x{:08X}", cmd.w1);
}

/// Jumps to the list in the preceding RDP half 1 word if the vertex is at
/// least as close as the given depth.
pub fn branch_z(ctx: &mut DlContext<'_>, cmd: Command) {
    let vertex = (cmd.w0 & 0xFFF) >> 1;
    let z = ctx.renderer.vertex_depth(vertex);
    if z <= cmd.w1 as i32 as f32 {
        let address = ctx.resolve(ctx.state.rdp_half1);
        log::trace!("    BranchZ to 0x{:08X} (vtx {} z {})", address, vertex, z);
        ctx.branch(address);
    }
}

pub fn load_ucode(ctx: &mut DlContext<'_>, cmd: Command) {
    log::warn!(
        "LoadUCode 0x{:08X} (data 0x{:08X}) not supported, keeping {}",
        ctx.resolve(cmd.w1),
        ctx.resolve(ctx.state.rdp_half1),
        ctx.profile.name()
    );
}

pub fn set_geometry_mode(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.state.geometry_mode |= GeometryMode::from_bits_retain(cmd.w1);
    ctx.renderer.set_geometry_mode(ctx.state.geometry_mode);
}

pub fn clear_geometry_mode(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.state.geometry_mode &= !GeometryMode::from_bits_retain(cmd.w1);
    ctx.renderer.set_geometry_mode(ctx.state.geometry_mode);
}

pub fn set_other_mode_l(ctx: &mut DlContext<'_>, cmd: Command) {
    let shift = (cmd.w0 >> 8) & 0xFF;
    let len = cmd.w0 & 0xFF;
    ctx.state.other_mode.set_l_bits(shift, len, cmd.w1);
    ctx.renderer.set_other_mode(ctx.state.other_mode);
}

pub fn set_other_mode_h(ctx: &mut DlContext<'_>, cmd: Command) {
    let shift = (cmd.w0 >> 8) & 0xFF;
    let len = cmd.w0 & 0xFF;
    ctx.state.other_mode.set_h_bits(shift, len, cmd.w1);
    ctx.renderer.set_other_mode(ctx.state.other_mode);
}

/// Texture scales are 0.16 fixed point over a 10.5 coordinate.
pub(crate) fn texture_scale(raw: u32) -> f32 {
    (raw & 0xFFFF) as f32 / (65536.0 * 32.0)
}

pub fn texture(ctx: &mut DlContext<'_>, cmd: Command) {
    let level = (cmd.w0 >> 11) & 0x7;
    let tile = (cmd.w0 >> 8) & 0x7;
    let enabled = cmd.w0 & 0xFF != 0;
    let scale_s = texture_scale(cmd.w1 >> 16);
    let scale_t = texture_scale(cmd.w1);
    ctx.renderer.set_texture(tile, level, enabled, scale_s, scale_t);
}

pub fn move_word(ctx: &mut DlContext<'_>, cmd: Command) {
    let index = cmd.w0 & 0xFF;
    let offset = (cmd.w0 >> 8) & 0xFFFF;

    match index {
        G_MW_NUMLIGHT => {
            let count = (cmd.w1.wrapping_sub(0x8000_0000) / 32).saturating_sub(1);
            ctx.renderer.set_num_lights(count);
        }
        G_MW_SEGMENT => {
            let segment = ((offset >> 2) & 0xF) as usize;
            log::trace!("    Segment[{}] = 0x{:08X}", segment, cmd.w1);
            ctx.segments.set(segment, cmd.w1);
        }
        G_MW_FOG => {
            ctx.renderer.set_fog_range((cmd.w1 >> 16) as i16, cmd.w1 as i16);
        }
        G_MW_LIGHTCOL => {
            let light = offset / 0x20;
            if offset & 0x7 == 0 {
                let (r, g, b) = ((cmd.w1 >> 24) as u8, (cmd.w1 >> 16) as u8, (cmd.w1 >> 8) as u8);
                ctx.renderer.set_light_color(light, r, g, b);
            }
        }
        G_MW_MATRIX | G_MW_CLIP | G_MW_POINTS | G_MW_PERSPNORM => {
            log::trace!("    MoveWord {:#04x} (ignored)", index);
        }
        _ => log::debug!("    Unknown MoveWord index {:#04x}", index),
    }
}

pub fn move_mem(ctx: &mut DlContext<'_>, cmd: Command) {
    let kind = (cmd.w0 >> 16) & 0xFF;
    let address = ctx.resolve(cmd.w1);

    match kind {
        G_MV_VIEWPORT => move_mem_viewport(ctx, address),
        G_MV_L0..=G_MV_L7 => {
            let light = (kind - G_MV_L0) / 2;
            move_mem_light(ctx, light, address);
        }
        G_MV_LOOKATX | G_MV_LOOKATY => log::trace!("    MoveMem LookAt (ignored)"),
        _ => log::debug!("    Unknown MoveMem type {:#04x}", kind),
    }
}

pub(crate) fn tri1_emit(ctx: &mut DlContext<'_>, cmd: Command) -> bool {
    let stride = ctx.profile.stride;
    let v0 = ((cmd.w1 >> 16) & 0xFF) / stride;
    let v1 = ((cmd.w1 >> 8) & 0xFF) / stride;
    let v2 = (cmd.w1 & 0xFF) / stride;
    ctx.renderer.add_triangle(v0, v1, v2)
}

pub fn tri1(ctx: &mut DlContext<'_>, cmd: Command) {
    batch_triangles(ctx, cmd, tri1_emit);
}

fn tri2_emit(ctx: &mut DlContext<'_>, cmd: Command) -> bool {
    let stride = ctx.profile.stride;
    let a = ctx.renderer.add_triangle(
        ((cmd.w0 >> 16) & 0xFF) / stride,
        ((cmd.w0 >> 8) & 0xFF) / stride,
        (cmd.w0 & 0xFF) / stride,
    );
    let b = ctx.renderer.add_triangle(
        ((cmd.w1 >> 16) & 0xFF) / stride,
        ((cmd.w1 >> 8) & 0xFF) / stride,
        (cmd.w1 & 0xFF) / stride,
    );
    a | b
}

pub fn tri2(ctx: &mut DlContext<'_>, cmd: Command) {
    batch_triangles(ctx, cmd, tri2_emit);
}

fn quad_emit(ctx: &mut DlContext<'_>, cmd: Command) -> bool {
    let stride = ctx.profile.stride;
    let v0 = ((cmd.w1 >> 24) & 0xFF) / stride;
    let v1 = ((cmd.w1 >> 16) & 0xFF) / stride;
    let v2 = ((cmd.w1 >> 8) & 0xFF) / stride;
    let v3 = (cmd.w1 & 0xFF) / stride;
    let a = ctx.renderer.add_triangle(v0, v1, v2);
    let b = ctx.renderer.add_triangle(v0, v2, v3);
    a | b
}

pub fn quad(ctx: &mut DlContext<'_>, cmd: Command) {
    batch_triangles(ctx, cmd, quad_emit);
}

pub fn cull_dl(ctx: &mut DlContext<'_>, cmd: Command) {
    let first = (cmd.w0 & 0xFFFF) / 2;
    let last = (cmd.w1 & 0xFFFF) / 2;
    cull_display_list(ctx, first, last);
}
