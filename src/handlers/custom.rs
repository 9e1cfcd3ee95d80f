//! Commands patched into Fast3D by individual titles: GoldenEye and Perfect
//! Dark (sky rectangle, colour-indexed vertices), Wave Race 64 (vertex
//! loader), Shadows of the Empire (vertex loader, list calls, texture image)
//! and Last Legion UX (nested list pairs, 16-byte texrects).

use crate::dlist::DlContext;
use crate::gbi::{Command, TexRectCommand};
use crate::rdp::ImageDescriptor;
use crate::math::Vec2;
use crate::renderer::VertexFormat;

use super::{gbi1, load_vertices, rdp};

/// Marker in the RDP half-1 word that starts a sky rectangle.
const SKY_MARKER: u32 = 0xCE;
/// Bytes of hand-built RDP commands following the marker.
const SKY_BLOCK_SIZE: u32 = 312;

/// A half-1 word tagged 0xCE introduces a raw RDP block drawing the sky.
/// Only the vertical extent is taken from it; the rectangle spans the
/// scissor horizontally and its colour comes from the blender.
pub fn rdp_half1_sky(ctx: &mut DlContext<'_>, cmd: Command) {
    if cmd.w1 >> 24 != SKY_MARKER {
        gbi1::rdp_half1(ctx, cmd);
        return;
    }
    let Some(pc) = ctx.stack.pc().filter(|&pc| ctx.mem.contains(pc, SKY_BLOCK_SIZE)) else {
        return;
    };

    let top = ctx.mem.read_u32(pc + 4);
    let bottom = ctx.mem.read_u32(pc + 20);
    let y0 = (top & 0xFFF) as f32 / 4.0;
    let y1 = (bottom >> 16) as f32 / 4.0;
    let scissor = ctx.state.scissor;

    log::trace!("    Sky rectangle {} -> {}", y0, y1);
    ctx.renderer.tex_rect(
        0,
        Vec2::new(scissor.left as f32, y0),
        Vec2::new(scissor.right as f32, y1),
        Vec2::default(),
        Vec2::default(),
    );
    ctx.stack.advance_top(SKY_BLOCK_SIZE);
}

pub fn vtx_wave_race(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = ctx.resolve(cmd.w1);
    let v0 = ((cmd.w0 >> 16) & 0xFF) / 5;
    let n = (cmd.w0 >> 9) & 0x7F;
    load_vertices(ctx, address, v0, n, VertexFormat::Standard);
}

pub fn vtx_perfect_dark(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = ctx.resolve(cmd.w1);
    let v0 = (cmd.w0 >> 16) & 0xF;
    let n = ((cmd.w0 >> 20) & 0xF) + 1;
    let aux_addr = ctx.state.aux_addr;
    load_vertices(ctx, address, v0, n, VertexFormat::PerfectDark { aux_addr });
}

/// Sets the buffer Perfect Dark vertices take their colours from.
pub fn set_vtx_ci_perfect_dark(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.state.aux_addr = ctx.resolve(cmd.w1);
    log::trace!("    Vertex colour buffer 0x{:08X}", ctx.state.aux_addr);
}

/// Bytes per vertex in the Shadows of the Empire length field.
const SOTE_VERTEX_SPAN: u32 = 33;

/// Shadows of the Empire always loads from slot 0; the count comes from a
/// 12-bit length field.
pub fn vtx_sote(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = ctx.resolve(cmd.w1);
    let n = ((cmd.w0 >> 4) & 0xFFF) / SOTE_VERTEX_SPAN + 1;
    load_vertices(ctx, address, 0, n, VertexFormat::Standard);
}

/// The push byte carries other data in this microcode; every list command
/// is a call.
pub fn display_list_sote(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = ctx.resolve(cmd.w1);
    log::trace!("    Address=0x{:08X} Push", address);
    ctx.call(address);
}

/// Texture images are given as physical addresses and never go through the
/// segment table.
pub fn set_timg_sote(ctx: &mut DlContext<'_>, cmd: Command) {
    let address = cmd.w1 & 0x00FF_FFFF;
    ctx.state.texture_image =
        ImageDescriptor::new(cmd.img_format(), cmd.img_size(), cmd.img_width(), address);
    log::trace!("    TImg {:?}", ctx.state.texture_image);
}

pub fn last_legion_0x80(ctx: &mut DlContext<'_>, _cmd: Command) {
    ctx.stack.advance_top(16);
}

fn last_legion_target(ctx: &DlContext<'_>, pointer_at: u32) -> Option<u32> {
    let address = ctx.resolve(ctx.mem.read_u32(pointer_at));
    let valid = address != 0 && address != 0x00FF_FFFF && ctx.mem.contains(address, 8);
    valid.then_some(address)
}

/// Calls the two lists referenced from a descriptor block; the second one
/// runs first.
pub fn last_legion_0x00(ctx: &mut DlContext<'_>, cmd: Command) {
    ctx.stack.advance_top(16);

    if cmd.w0 != 0 || cmd.w1 == 0 {
        ctx.return_from_list();
        return;
    }

    let block = ctx.resolve(cmd.w1);
    if !ctx.mem.contains(block, 40) {
        ctx.return_from_list();
        return;
    }
    let first = last_legion_target(ctx, block + 12);
    let second = last_legion_target(ctx, block + 36);
    for address in [first, second].into_iter().flatten() {
        ctx.call(address);
    }
}

/// Last Legion's texrect is 16 bytes: the texture words are the whole
/// following command.
pub fn tex_rect_last_legion(ctx: &mut DlContext<'_>, cmd: Command) {
    let next = ctx.fetch_next();
    let rect = TexRectCommand {
        cmd0: cmd.w0,
        cmd1: cmd.w1,
        cmd2: next.w0,
        cmd3: next.w1,
    };
    rdp::draw_tex_rect(ctx, &rect, false);
}
