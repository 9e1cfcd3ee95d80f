//! Fast3D commands that differ from F3DEX.

use crate::dlist::DlContext;
use crate::gbi::Command;
use crate::renderer::VertexFormat;

use super::{batch_triangles, cull_display_list, load_vertices};

/// Fast3D keeps 40-byte vertices in DMEM; cull ranges are DMEM offsets.
const DMEM_VERTEX_SIZE: u32 = 40;

pub fn vtx(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = ctx.resolve(cmd.w1);
    let n = ((cmd.w0 >> 20) & 0xF) + 1;
    let v0 = (cmd.w0 >> 16) & 0xF;
    load_vertices(ctx, address, v0, n, VertexFormat::Standard);
}

fn tri4_emit(ctx: &mut DlContext<'_>, cmd: Command) -> bool {
    let mut added = false;
    for i in 0..4 {
        let v0 = (cmd.w0 >> (4 * i)) & 0xF;
        let v1 = (cmd.w1 >> (8 * i)) & 0xF;
        let v2 = (cmd.w1 >> (8 * i + 4)) & 0xF;
        // Unused slots are filled with zeroes.
        if v0 == v1 && v1 == v2 {
            continue;
        }
        added |= ctx.renderer.add_triangle(v0, v1, v2);
    }
    added
}

/// Up to four triangles packed as 4-bit indices.
pub fn tri4(ctx: &mut DlContext<'_>, cmd: Command) {
    batch_triangles(ctx, cmd, tri4_emit);
}

pub fn line3d(_ctx: &mut DlContext<'_>, cmd: Command) {
    log::trace!("    Line3D {:08X} {:08X} (ignored)", cmd.w0, cmd.w1);
}

pub fn cull_dl(ctx: &mut DlContext<'_>, cmd: Command) {
    let first = (cmd.w0 & 0x00FF_FFFF) / DMEM_VERTEX_SIZE;
    let last = cmd.w1 / DMEM_VERTEX_SIZE;
    cull_display_list(ctx, first, last);
}
