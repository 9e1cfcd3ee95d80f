//! Diddy Kong Racing / Jet Force Gemini microcode.
//!
//! Matrices and vertices are addressed relative to bases set by 0xBF, four
//! matrix slots are kept on the RSP side, and triangles are DMA'd as
//! 16-byte records.

use crate::dlist::DlContext;
use crate::fixed_point::matrix_from_fixed_point;
use crate::gbi::opcodes::{G_MW_LIGHTCOL, G_MW_NUMLIGHT};
use crate::gbi::Command;
use crate::renderer::VertexFormat;

use super::gbi1::{self, texture_scale};
use super::load_vertices;

const TRI_RECORD_SIZE: u32 = 16;

pub fn set_addr(ctx: &mut DlContext<'_>, cmd: Command) {
    let dkr = &mut ctx.state.dkr;
    dkr.matrix_addr = cmd.arg0();
    dkr.vertex_addr = ctx.segments.resolve(cmd.w1 & 0x00FF_FFFF);
    dkr.vertex_count = 0;
    log::trace!("    Matrix base 0x{:08X} vertex base 0x{:08X}", dkr.matrix_addr, dkr.vertex_addr);
}

fn select_matrix(ctx: &mut DlContext<'_>, index: usize) {
    ctx.state.dkr.matrix_index = index;
    let mat = ctx.state.dkr.matrices[index];
    ctx.renderer.set_world_view(&mat, false, true);
}

/// Loads one of the four matrix slots. Slot 0 is loaded as is; the others
/// are multiplied by slot 0 when the command asks for it.
pub fn mtx(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = cmd.w1.wrapping_add(ctx.resolve(ctx.state.dkr.matrix_addr));
    let mut index = ((cmd.w0 >> 16) & 0x3) as usize;
    let mut mat = matrix_from_fixed_point(ctx.mem, address);

    if index == 0 {
        index = ((cmd.w0 >> 22) & 0x3) as usize;
        if index != 0 {
            mat = mat.mul(&ctx.state.dkr.matrices[0]);
        }
    }
    ctx.state.dkr.matrices[index] = mat;
    select_matrix(ctx, index);
}

pub fn vtx(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = cmd.w1.wrapping_add(ctx.state.dkr.vertex_addr);
    let n = ((cmd.w0 >> 19) & 0x1F) + 1;

    // Append mode continues after the previous load; billboards keep slot 0.
    if cmd.w0 & 0x0001_0000 != 0 {
        if ctx.state.dkr.billboard {
            ctx.state.dkr.vertex_count = 1;
        }
    } else {
        ctx.state.dkr.vertex_count = 0;
    }
    let v0 = ((cmd.w0 >> 9) & 0x1F) + ctx.state.dkr.vertex_count;
    let billboard = ctx.state.dkr.billboard;

    load_vertices(ctx, address, v0, n, VertexFormat::Dkr { billboard });
    ctx.state.dkr.vertex_count += n;
}

/// Triangles DMA'd from RDRAM: a flag byte and three vertex indices per
/// record, followed by texture coordinates the renderer reads itself.
pub fn dma_tri(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = ctx.resolve(cmd.w1);
    let count = (cmd.w0 >> 4) & 0x1F;
    if !ctx.mem.contains(address, count * TRI_RECORD_SIZE) {
        log::debug!("    DMA tri list out of range: 0x{:08X}", address);
        return;
    }

    let mut added = false;
    for i in 0..count {
        let info = ctx.mem.read_u32(address + i * TRI_RECORD_SIZE);
        let v0 = (info >> 16) & 0x1F;
        let v1 = (info >> 8) & 0x1F;
        let v2 = info & 0x1F;
        added |= ctx.renderer.add_triangle(v0, v1, v2);
    }
    if added {
        ctx.renderer.flush_triangles();
    }
    ctx.state.dkr.vertex_count = 0;
}

/// Runs a list for a fixed number of commands; it has no end marker.
pub fn dl_in_mem(ctx: &mut DlContext<'_>, cmd: Command) {
    let limit = (cmd.w0 >> 16) & 0xFF;
    log::trace!("    DLInMem 0x{:08X} ({} commands)", cmd.w1, limit);
    ctx.call_limited(cmd.w1, limit);
}

pub fn move_word(ctx: &mut DlContext<'_>, cmd: Command) {
    match cmd.w0 & 0xFF {
        G_MW_NUMLIGHT => {
            ctx.state.dkr.billboard = cmd.w1 & 0x7 != 0;
        }
        G_MW_LIGHTCOL => {
            let index = ((cmd.w1 >> 6) & 0x3) as usize;
            select_matrix(ctx, index);
        }
        _ => gbi1::move_word(ctx, cmd),
    }
}

/// Like the Fast3D command, but the enable bits carry other data and
/// texturing is always on.
pub fn texture(ctx: &mut DlContext<'_>, cmd: Command) {
    let level = (cmd.w0 >> 11) & 0x7;
    let tile = (cmd.w0 >> 8) & 0x7;
    ctx.renderer
        .set_texture(tile, level, true, texture_scale(cmd.w1 >> 16), texture_scale(cmd.w1));
}
