//! Conker's Bad Fur Day: F3DEX2 with its own vertex and lighting layout
//! and a packed four-triangle command spread over opcodes 0x10..=0x1F.

use crate::dlist::DlContext;
use crate::gbi::opcodes::{G_GBI2_MV_LIGHT, G_MW_NUMLIGHT};
use crate::gbi::Command;
use crate::renderer::VertexFormat;

use super::{gbi2, load_vertices, move_mem_light};

pub fn vtx(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = ctx.resolve(cmd.w1);
    let end = (cmd.w0 >> 1) & 0x7F;
    let n = (cmd.w0 >> 12) & 0xFF;
    let Some(v0) = end.checked_sub(n) else {
        return;
    };
    load_vertices(ctx, address, v0, n, VertexFormat::Conker);
}

fn tri4_indices(cmd: Command) -> [u32; 12] {
    let (w0, w1) = (cmd.w0, cmd.w1);
    [
        w1 & 0x1F,
        (w1 >> 5) & 0x1F,
        (w1 >> 10) & 0x1F,
        (w1 >> 15) & 0x1F,
        (w1 >> 20) & 0x1F,
        (w1 >> 25) & 0x1F,
        w0 & 0x1F,
        (w0 >> 5) & 0x1F,
        (w0 >> 10) & 0x1F,
        (((w0 >> 15) & 0x7) << 2) | (w1 >> 30),
        (w0 >> 18) & 0x1F,
        (w0 >> 23) & 0x1F,
    ]
}

fn is_tri4(opcode: u8) -> bool {
    (0x10..=0x1F).contains(&opcode)
}

/// The top bits of the opcode are part of the packed indices, so every
/// command in 0x10..=0x1F continues the batch.
pub fn tri4(ctx: &mut DlContext<'_>, cmd: Command) {
    let mut cmd = cmd;
    let mut added = false;
    loop {
        for tri in tri4_indices(cmd).chunks_exact(3) {
            added |= ctx.renderer.add_triangle(tri[0], tri[1], tri[2]);
        }
        if !ctx.peek_opcode().is_some_and(is_tri4) {
            break;
        }
        cmd = ctx.fetch_next();
    }
    if added {
        ctx.renderer.flush_triangles();
    }
}

pub fn move_word(ctx: &mut DlContext<'_>, cmd: Command) {
    let index = (cmd.w0 >> 16) & 0xFF;
    if index == G_MW_NUMLIGHT {
        ctx.renderer.set_num_lights(cmd.w1 / 48);
    } else {
        gbi2::move_word(ctx, cmd);
    }
}

/// Light records are 48 bytes apart; the first slot is the look-at.
pub fn move_mem(ctx: &mut DlContext<'_>, cmd: Command) {
    let kind = cmd.w0 & 0xFE;
    if kind != G_GBI2_MV_LIGHT {
        gbi2::move_mem(ctx, cmd);
        return;
    }
    let offset = (cmd.w0 >> 5) & 0x3FFF;
    if offset >= 0x30 {
        let address = ctx.resolve(cmd.w1);
        move_mem_light(ctx, (offset - 0x30) / 0x30, address);
    }
}
