//! F3DEX2 commands.

use crate::dlist::DlContext;
use crate::gbi::opcodes::*;
use crate::gbi::Command;
use crate::rdp::GeometryMode;
use crate::renderer::VertexFormat;

use super::gbi1::texture_scale;
use super::{batch_triangles, load_matrix, load_vertices, move_mem_light, move_mem_viewport};

pub fn mtx(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = ctx.resolve(cmd.w1);
    // G_MTX_PUSH is inverted in F3DEX2.
    let params = cmd.w0 & 0xFF;
    load_matrix(ctx, address, params & 0x4 != 0, params & 0x2 != 0, params & 0x1 == 0);
}

pub fn pop_mtx(ctx: &mut DlContext<'_>, cmd: Command) {
    let count = cmd.w1 >> 6;
    ctx.renderer.pop_world_view(count);
}

pub fn vtx(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = ctx.resolve(cmd.w1);
    let n = (cmd.w0 >> 12) & 0xFF;
    let end = (cmd.w0 >> 1) & 0x7F;
    let Some(v0) = end.checked_sub(n) else {
        log::debug!("    Vtx: end {} before count {}", end, n);
        return;
    };
    load_vertices(ctx, address, v0, n, VertexFormat::Standard);
}

/// Keeps the bits in the low 24 of the first word, then sets the second.
pub fn geometry_mode(ctx: &mut DlContext<'_>, cmd: Command) {
    let keep = GeometryMode::from_bits_retain(cmd.arg0());
    let set = GeometryMode::from_bits_retain(cmd.w1);
    ctx.state.geometry_mode = (ctx.state.geometry_mode & keep) | set;
    ctx.renderer.set_geometry_mode(ctx.state.geometry_mode);
}

/// Shift and length are encoded from the top of the word.
fn other_mode_field(cmd: Command) -> Option<(u32, u32)> {
    let len = (cmd.w0 & 0xFF) + 1;
    let shift = 32u32.checked_sub((cmd.w0 >> 8) & 0xFF)?.checked_sub(len)?;
    Some((shift, len))
}

pub fn set_other_mode_l(ctx: &mut DlContext<'_>, cmd: Command) {
    if let Some((shift, len)) = other_mode_field(cmd) {
        ctx.state.other_mode.set_l_bits(shift, len, cmd.w1);
        ctx.renderer.set_other_mode(ctx.state.other_mode);
    }
}

pub fn set_other_mode_h(ctx: &mut DlContext<'_>, cmd: Command) {
    if let Some((shift, len)) = other_mode_field(cmd) {
        ctx.state.other_mode.set_h_bits(shift, len, cmd.w1);
        ctx.renderer.set_other_mode(ctx.state.other_mode);
    }
}

pub fn texture(ctx: &mut DlContext<'_>, cmd: Command) {
    let level = (cmd.w0 >> 11) & 0x7;
    let tile = (cmd.w0 >> 8) & 0x7;
    let enabled = (cmd.w0 >> 1) & 0x7F != 0;
    ctx.renderer
        .set_texture(tile, level, enabled, texture_scale(cmd.w1 >> 16), texture_scale(cmd.w1));
}

pub fn move_word(ctx: &mut DlContext<'_>, cmd: Command) {
    let index = (cmd.w0 >> 16) & 0xFF;
    let offset = cmd.w0 & 0xFFFF;

    match index {
        G_MW_NUMLIGHT => ctx.renderer.set_num_lights(cmd.w1 / 24),
        G_MW_SEGMENT => {
            let segment = ((offset >> 2) & 0xF) as usize;
            log::trace!("    Segment[{}] = 0x{:08X}", segment, cmd.w1);
            ctx.segments.set(segment, cmd.w1);
        }
        G_MW_FOG => ctx.renderer.set_fog_range((cmd.w1 >> 16) as i16, cmd.w1 as i16),
        G_MW_LIGHTCOL => {
            let light = offset / 0x18;
            if offset & 0x7 == 0 {
                let (r, g, b) = ((cmd.w1 >> 24) as u8, (cmd.w1 >> 16) as u8, (cmd.w1 >> 8) as u8);
                ctx.renderer.set_light_color(light, r, g, b);
            }
        }
        G_MW_MATRIX | G_MW_CLIP | G_MW_PERSPNORM => {
            log::trace!("    MoveWord {:#04x} (ignored)", index);
        }
        _ => log::debug!("    Unknown MoveWord index {:#04x}", index),
    }
}

pub fn move_mem(ctx: &mut DlContext<'_>, cmd: Command) {
    let index = cmd.w0 & 0xFF;
    let address = ctx.resolve(cmd.w1);

    match index {
        G_GBI2_MV_VIEWPORT => move_mem_viewport(ctx, address),
        G_GBI2_MV_LIGHT => {
            let slot = ((cmd.w0 >> 8) & 0xFF) * 8 / 24;
            // The first two slots hold the look-at vectors.
            if slot >= 2 {
                move_mem_light(ctx, slot - 2, address);
            }
        }
        G_GBI2_MV_MATRIX => log::trace!("    MoveMem forced matrix (ignored)"),
        _ => log::debug!("    Unknown MoveMem index {}", index),
    }
}

pub(crate) fn tri_indices(word: u32) -> (u32, u32, u32) {
    (((word >> 16) & 0xFF) / 2, ((word >> 8) & 0xFF) / 2, (word & 0xFF) / 2)
}

pub(crate) fn tri1_emit(ctx: &mut DlContext<'_>, cmd: Command) -> bool {
    let (v0, v1, v2) = tri_indices(cmd.w0);
    ctx.renderer.add_triangle(v0, v1, v2)
}

pub fn tri1(ctx: &mut DlContext<'_>, cmd: Command) {
    batch_triangles(ctx, cmd, tri1_emit);
}

pub(crate) fn tri2_emit(ctx: &mut DlContext<'_>, cmd: Command) -> bool {
    let (a0, a1, a2) = tri_indices(cmd.w0);
    let (b0, b1, b2) = tri_indices(cmd.w1);
    let a = ctx.renderer.add_triangle(a0, a1, a2);
    let b = ctx.renderer.add_triangle(b0, b1, b2);
    a | b
}

pub fn tri2(ctx: &mut DlContext<'_>, cmd: Command) {
    batch_triangles(ctx, cmd, tri2_emit);
}

pub fn quad(ctx: &mut DlContext<'_>, cmd: Command) {
    batch_triangles(ctx, cmd, tri2_emit);
}
