//! Opcode handlers, grouped by the microcode family that introduced them.
//!
//! Every handler has the same shape, `fn(&mut DlContext, Command)`, so the
//! profile tables can mix them freely. Helpers shared between families
//! live here.

pub mod conker;
pub mod custom;
pub mod dkr;
pub mod gbi0;
pub mod gbi1;
pub mod gbi2;
pub mod rdp;


use crate::dlist::DlContext;
use crate::fixed_point::{matrix_from_fixed_point, N64Light, Viewport};
use crate::gbi::Command;
use crate::renderer::{VertexFormat, VertexLoad};

/// Size of the RSP vertex buffer for F3DEX2-style microcodes.
pub(crate) const MAX_VERTICES: u32 = 64;

/// Loads one light record; a zero direction only updates the colour.
pub(crate) fn move_mem_light(ctx: &mut DlContext<'_>, light_idx: u32, address: u32) {
    debug_assert!(light_idx < 16, "Warning: invalid light # = {}", light_idx);

    let light = N64Light::read(ctx.mem, address);
    log::trace!(
        "    Light[{}] RGB[{}, {}, {}] x[{}] y[{}] z[{}]",
        light_idx,
        light.r,
        light.g,
        light.b,
        light.x,
        light.y,
        light.z
    );

    ctx.renderer.set_light_color(light_idx, light.r, light.g, light.b);
    if light.has_direction() {
        ctx.renderer.set_light_direction(light_idx, light.x, light.y, light.z);
    }
}

pub(crate) fn move_mem_viewport(ctx: &mut DlContext<'_>, address: u32) {
    let vp = Viewport::read(ctx.mem, address);
    log::trace!("    Scale: {} {} Trans: {} {}", vp.scale.x, vp.scale.y, vp.trans.x, vp.trans.y);
    ctx.renderer.set_viewport(vp.scale, vp.trans);
}

pub(crate) fn load_matrix(
    ctx: &mut DlContext<'_>,
    address: u32,
    projection: bool,
    load: bool,
    push: bool,
) {
    let mat = matrix_from_fixed_point(ctx.mem, address);
    log::trace!(
        "    {} {} {} Mtx at 0x{:08X}",
        if projection { "Projection" } else { "ModelView" },
        if load { "Load" } else { "Mul" },
        if push { "Push" } else { "NoPush" },
        address
    );
    if projection {
        ctx.renderer.set_projection(&mat, push, load);
    } else {
        ctx.renderer.set_world_view(&mat, push, load);
    }
}

/// Hands a vertex load to the renderer if it fits the vertex buffer.
pub(crate) fn load_vertices(
    ctx: &mut DlContext<'_>,
    address: u32,
    v0: u32,
    count: u32,
    format: VertexFormat,
) {
    if v0 + count > MAX_VERTICES {
        log::debug!("Vertex load out of range: v0 {} n {}", v0, count);
        return;
    }
    ctx.renderer.load_vertices(
        ctx.mem,
        VertexLoad {
            address,
            v0,
            count,
            format,
        },
    );
}

/// Queues the triangles of `first` and of every directly following command
/// with the same opcode, then flushes once.
pub(crate) fn batch_triangles(
    ctx: &mut DlContext<'_>,
    first: Command,
    emit: fn(&mut DlContext<'_>, Command) -> bool,
) {
    let opcode = first.opcode();
    let mut added = emit(ctx, first);
    while ctx.peek_opcode() == Some(opcode) {
        let cmd = ctx.fetch_next();
        added |= emit(ctx, cmd);
    }
    if added {
        ctx.renderer.flush_triangles();
    }
}

/// Ends the current list when every vertex in `first..=last` is offscreen.
pub(crate) fn cull_display_list(ctx: &mut DlContext<'_>, first: u32, last: u32) {
    if last < first || last >= MAX_VERTICES {
        return;
    }
    if ctx.renderer.vertices_offscreen(first, last) {
        log::trace!("    Culling display list ({}..={})", first, last);
        ctx.return_from_list();
    }
}
