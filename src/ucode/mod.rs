//! Microcode profiles: which handler runs for each of the 256 opcodes.
//!
//! The three stock families each have a table built from the shared RDP
//! entries plus their own RSP commands. Licensed titles that shipped a
//! patched microcode get a custom profile: a copy of the base family's
//! table with a handful of slots overwritten.

pub mod detect;

#[cfg(test)]
mod tests;

use crate::dlist::DlContext;
use crate::gbi::opcodes::*;
use crate::gbi::Command;
use crate::handlers::{conker, custom, dkr, gbi0, gbi1, gbi2, rdp};
use crate::hacks::TitlePolicy;
use crate::memory::Rdram;
use crate::task::TaskDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub use detect::{detect, identify, match_sizes, SizeSignature, BUILTIN_SIGNATURES};

pub type Handler = fn(&mut DlContext<'_>, Command);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UcodeId {
    /// Fast3D.
    Gbi0,
    /// F3DEX / F3DLX / F3DLP 1.x.
    Gbi1,
    /// F3DEX2 and its relatives.
    Gbi2,
    GoldenEye,
    WaveRace,
    /// Shadows of the Empire.
    Sote,
    LastLegion,
    PerfectDark,
    Dkr,
    Conker,
}

impl UcodeId {
    pub const ALL: [UcodeId; 10] = [
        UcodeId::Gbi0,
        UcodeId::Gbi1,
        UcodeId::Gbi2,
        UcodeId::GoldenEye,
        UcodeId::WaveRace,
        UcodeId::Sote,
        UcodeId::LastLegion,
        UcodeId::PerfectDark,
        UcodeId::Dkr,
        UcodeId::Conker,
    ];

    /// Stock family whose table a profile starts from.
    pub const fn base(self) -> UcodeId {
        match self {
            UcodeId::Gbi1 => UcodeId::Gbi1,
            UcodeId::Gbi2 | UcodeId::Conker => UcodeId::Gbi2,
            _ => UcodeId::Gbi0,
        }
    }

    pub const fn is_custom(self) -> bool {
        !matches!(self, UcodeId::Gbi0 | UcodeId::Gbi1 | UcodeId::Gbi2)
    }

    /// Divisor turning a vertex offset in a triangle command into an index.
    pub const fn vertex_stride(self) -> u32 {
        match self {
            UcodeId::Gbi1 | UcodeId::Gbi2 | UcodeId::Conker => 2,
            UcodeId::WaveRace => 5,
            _ => 10,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            UcodeId::Gbi0 => "gbi0",
            UcodeId::Gbi1 => "gbi1",
            UcodeId::Gbi2 => "gbi2",
            UcodeId::GoldenEye => "golden_eye",
            UcodeId::WaveRace => "wave_race",
            UcodeId::Sote => "sote",
            UcodeId::LastLegion => "last_legion",
            UcodeId::PerfectDark => "perfect_dark",
            UcodeId::Dkr => "dkr",
            UcodeId::Conker => "conker",
        }
    }

    pub fn from_name(name: &str) -> Option<UcodeId> {
        let name = name.trim();
        Self::ALL.into_iter().find(|id| id.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for UcodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OpcodeEntry {
    pub handler: Handler,
    pub name: &'static str,
}

impl OpcodeEntry {
    pub const UNKNOWN: OpcodeEntry = OpcodeEntry {
        handler: rdp::unknown,
        name: "G_Unknown",
    };

    const fn new(handler: Handler, name: &'static str) -> Self {
        Self { handler, name }
    }
}

/// One slot override: opcode, handler, name.
type Patch = (u8, Handler, &'static str);

pub struct MicrocodeProfile {
    pub id: UcodeId,
    pub stride: u32,
    table: [OpcodeEntry; 256],
}

impl MicrocodeProfile {
    pub fn entry(&self, opcode: u8) -> &OpcodeEntry {
        &self.table[opcode as usize]
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    fn apply(&mut self, patches: &[Patch]) {
        for &(opcode, handler, name) in patches {
            self.table[opcode as usize] = OpcodeEntry::new(handler, name);
        }
    }
}

impl fmt::Debug for MicrocodeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MicrocodeProfile")
            .field("id", &self.id)
            .field("stride", &self.stride)
            .finish_non_exhaustive()
    }
}

const RDP_COMMANDS: &[Patch] = &[
    (G_NOOP, rdp::noop, "G_NOOP"),
    (G_TRI_FILL, rdp::tri_rsp, "G_TRI_FILL"),
    (0xC9, rdp::tri_rsp, "G_TRI_FILL_ZBUFF"),
    (0xCA, rdp::tri_rsp, "G_TRI_TXTR"),
    (0xCB, rdp::tri_rsp, "G_TRI_TXTR_ZBUFF"),
    (0xCC, rdp::tri_rsp, "G_TRI_SHADE"),
    (0xCD, rdp::tri_rsp, "G_TRI_SHADE_ZBUFF"),
    (0xCE, rdp::tri_rsp, "G_TRI_SHADE_TXTR"),
    (G_TRI_SHADE_TXTR_ZBUFF, rdp::tri_rsp, "G_TRI_SHADE_TXTR_ZBUFF"),
    (G_TEXRECT, rdp::tex_rect, "G_TEXRECT"),
    (G_TEXRECTFLIP, rdp::tex_rect_flip, "G_TEXRECTFLIP"),
    (G_RDPLOADSYNC, rdp::sync, "G_RDPLOADSYNC"),
    (G_RDPPIPESYNC, rdp::sync, "G_RDPPIPESYNC"),
    (G_RDPTILESYNC, rdp::sync, "G_RDPTILESYNC"),
    (G_RDPFULLSYNC, rdp::sync, "G_RDPFULLSYNC"),
    (G_SETKEYGB, rdp::set_key_gb, "G_SETKEYGB"),
    (G_SETKEYR, rdp::set_key_r, "G_SETKEYR"),
    (G_SETCONVERT, rdp::set_convert, "G_SETCONVERT"),
    (G_SETSCISSOR, rdp::set_scissor, "G_SETSCISSOR"),
    (G_SETPRIMDEPTH, rdp::set_prim_depth, "G_SETPRIMDEPTH"),
    (G_RDPSETOTHERMODE, rdp::set_other_mode, "G_RDPSETOTHERMODE"),
    (G_LOADTLUT, rdp::load_tlut, "G_LOADTLUT"),
    (G_SETTILESIZE, rdp::set_tile_size, "G_SETTILESIZE"),
    (G_LOADBLOCK, rdp::load_block, "G_LOADBLOCK"),
    (G_LOADTILE, rdp::load_tile, "G_LOADTILE"),
    (G_SETTILE, rdp::set_tile, "G_SETTILE"),
    (G_FILLRECT, rdp::fill_rect, "G_FILLRECT"),
    (G_SETFILLCOLOR, rdp::set_fill_color, "G_SETFILLCOLOR"),
    (G_SETFOGCOLOR, rdp::set_fog_color, "G_SETFOGCOLOR"),
    (G_SETBLENDCOLOR, rdp::set_blend_color, "G_SETBLENDCOLOR"),
    (G_SETPRIMCOLOR, rdp::set_prim_color, "G_SETPRIMCOLOR"),
    (G_SETENVCOLOR, rdp::set_env_color, "G_SETENVCOLOR"),
    (G_SETCOMBINE, rdp::set_combine, "G_SETCOMBINE"),
    (G_SETTIMG, rdp::set_timg, "G_SETTIMG"),
    (G_SETZIMG, rdp::set_zimg, "G_SETZIMG"),
    (G_SETCIMG, rdp::set_cimg, "G_SETCIMG"),
];

// RSP commands Fast3D and F3DEX agree on.
const F3D_COMMON: &[Patch] = &[
    (G_SPNOOP, rdp::noop, "G_SPNOOP"),
    (G_MTX, gbi1::mtx, "G_MTX"),
    (G_MOVEMEM, gbi1::move_mem, "G_MOVEMEM"),
    (G_DL, gbi1::display_list, "G_DL"),
    (G_RDPHALF_2, gbi1::rdp_half2, "G_RDPHALF_2"),
    (G_RDPHALF_1, gbi1::rdp_half1, "G_RDPHALF_1"),
    (G_CLEARGEOMETRYMODE, gbi1::clear_geometry_mode, "G_CLEARGEOMETRYMODE"),
    (G_SETGEOMETRYMODE, gbi1::set_geometry_mode, "G_SETGEOMETRYMODE"),
    (G_ENDDL, gbi1::end_display_list, "G_ENDDL"),
    (G_SETOTHERMODE_L, gbi1::set_other_mode_l, "G_SETOTHERMODE_L"),
    (G_SETOTHERMODE_H, gbi1::set_other_mode_h, "G_SETOTHERMODE_H"),
    (G_TEXTURE, gbi1::texture, "G_TEXTURE"),
    (G_MOVEWORD, gbi1::move_word, "G_MOVEWORD"),
    (G_POPMTX, gbi1::pop_mtx, "G_POPMTX"),
    (G_TRI1, gbi1::tri1, "G_TRI1"),
];

const GBI0_COMMANDS: &[Patch] = &[
    (G_VTX, gbi0::vtx, "G_VTX"),
    (G_TRI2, gbi0::tri4, "G_TRI4"),
    (G_QUAD, gbi0::line3d, "G_LINE3D"),
    (G_CULLDL, gbi0::cull_dl, "G_CULLDL"),
];

const GBI1_COMMANDS: &[Patch] = &[
    (G_VTX, gbi1::vtx, "G_VTX"),
    (G_LOAD_UCODE, gbi1::load_ucode, "G_LOAD_UCODE"),
    (G_BRANCH_Z, gbi1::branch_z, "G_BRANCH_Z"),
    (G_TRI2, gbi1::tri2, "G_TRI2"),
    (G_MODIFYVTX, gbi1::modify_vtx, "G_MODIFYVTX"),
    (G_QUAD, gbi1::quad, "G_QUAD"),
    (G_CULLDL, gbi1::cull_dl, "G_CULLDL"),
];

const GBI2_COMMANDS: &[Patch] = &[
    (G_GBI2_NOOP, rdp::noop, "G_GBI2_NOOP"),
    (G_GBI2_VTX, gbi2::vtx, "G_GBI2_VTX"),
    (G_GBI2_MODIFYVTX, gbi1::modify_vtx, "G_GBI2_MODIFYVTX"),
    (G_GBI2_CULLDL, gbi1::cull_dl, "G_GBI2_CULLDL"),
    (G_GBI2_BRANCH_Z, gbi1::branch_z, "G_GBI2_BRANCH_Z"),
    (G_GBI2_TRI1, gbi2::tri1, "G_GBI2_TRI1"),
    (G_GBI2_TRI2, gbi2::tri2, "G_GBI2_TRI2"),
    (G_GBI2_QUAD, gbi2::quad, "G_GBI2_QUAD"),
    (G_GBI2_TEXTURE, gbi2::texture, "G_GBI2_TEXTURE"),
    (G_GBI2_POPMTX, gbi2::pop_mtx, "G_GBI2_POPMTX"),
    (G_GBI2_GEOMETRYMODE, gbi2::geometry_mode, "G_GBI2_GEOMETRYMODE"),
    (G_GBI2_MTX, gbi2::mtx, "G_GBI2_MTX"),
    (G_GBI2_MOVEWORD, gbi2::move_word, "G_GBI2_MOVEWORD"),
    (G_GBI2_MOVEMEM, gbi2::move_mem, "G_GBI2_MOVEMEM"),
    (G_GBI2_LOAD_UCODE, gbi1::load_ucode, "G_GBI2_LOAD_UCODE"),
    (G_GBI2_DL, gbi1::display_list, "G_GBI2_DL"),
    (G_GBI2_ENDDL, gbi1::end_display_list, "G_GBI2_ENDDL"),
    (G_GBI2_SPNOOP, rdp::noop, "G_GBI2_SPNOOP"),
    (G_GBI2_RDPHALF_1, gbi1::rdp_half1, "G_GBI2_RDPHALF_1"),
    (G_GBI2_SETOTHERMODE_L, gbi2::set_other_mode_l, "G_GBI2_SETOTHERMODE_L"),
    (G_GBI2_SETOTHERMODE_H, gbi2::set_other_mode_h, "G_GBI2_SETOTHERMODE_H"),
    (G_GBI2_RDPHALF_2, gbi1::rdp_half2, "G_GBI2_RDPHALF_2"),
];

const GOLDENEYE_PATCHES: &[Patch] = &[(G_RDPHALF_1, custom::rdp_half1_sky, "G_RDPHalf1_GoldenEye")];

const WAVE_RACE_PATCHES: &[Patch] = &[
    (G_VTX, custom::vtx_wave_race, "G_Vtx_WRUS"),
    (G_TRI2, rdp::unknown, "G_Unknown"),
];

const SOTE_PATCHES: &[Patch] = &[
    (G_VTX, custom::vtx_sote, "G_Vtx_SOTE"),
    (G_DL, custom::display_list_sote, "G_DL_SOTE"),
    (G_SETTIMG, custom::set_timg_sote, "G_SetTImg_SOTE"),
];

const LAST_LEGION_PATCHES: &[Patch] = &[
    (0x80, custom::last_legion_0x80, "G_Last_Legion_0x80"),
    (0x00, custom::last_legion_0x00, "G_Last_Legion_0x00"),
    (G_TEXRECT, custom::tex_rect_last_legion, "G_TexRect_Last_Legion"),
];

const PERFECT_DARK_PATCHES: &[Patch] = &[
    (G_VTX, custom::vtx_perfect_dark, "G_Vtx_PD"),
    (0x07, custom::set_vtx_ci_perfect_dark, "G_Set_Vtx_CI_PD"),
    (G_RDPHALF_1, custom::rdp_half1_sky, "G_RDPHalf1_GoldenEye"),
];

const DKR_PATCHES: &[Patch] = &[
    (0x01, dkr::mtx, "G_Mtx_DKR"),
    (0x04, dkr::vtx, "G_Vtx_DKR"),
    (0x05, dkr::dma_tri, "G_DMA_Tri_DKR"),
    (0x07, dkr::dl_in_mem, "G_DLInMem"),
    (G_MOVEWORD, dkr::move_word, "G_MoveWord_DKR"),
    (G_TRI1, dkr::set_addr, "G_Set_Addr_DKR"),
    (G_TEXTURE, dkr::texture, "G_Texture_DKR"),
];

const CONKER_PATCHES: &[Patch] = &[
    (G_GBI2_VTX, conker::vtx, "G_Vtx_Conker"),
    (0x10, conker::tri4, "G_Tri4_Conker"),
    (0x11, conker::tri4, "G_Tri4_Conker"),
    (0x12, conker::tri4, "G_Tri4_Conker"),
    (0x13, conker::tri4, "G_Tri4_Conker"),
    (0x14, conker::tri4, "G_Tri4_Conker"),
    (0x15, conker::tri4, "G_Tri4_Conker"),
    (0x16, conker::tri4, "G_Tri4_Conker"),
    (0x17, conker::tri4, "G_Tri4_Conker"),
    (0x18, conker::tri4, "G_Tri4_Conker"),
    (0x19, conker::tri4, "G_Tri4_Conker"),
    (0x1A, conker::tri4, "G_Tri4_Conker"),
    (0x1B, conker::tri4, "G_Tri4_Conker"),
    (0x1C, conker::tri4, "G_Tri4_Conker"),
    (0x1D, conker::tri4, "G_Tri4_Conker"),
    (0x1E, conker::tri4, "G_Tri4_Conker"),
    (0x1F, conker::tri4, "G_Tri4_Conker"),
    (G_GBI2_MOVEWORD, conker::move_word, "G_MoveWord_Conker"),
    (G_GBI2_MOVEMEM, conker::move_mem, "G_MoveMem_Conker"),
];

/// Slots a custom profile overrides on top of its base family.
pub fn patches(id: UcodeId) -> &'static [Patch] {
    match id {
        UcodeId::Gbi0 | UcodeId::Gbi1 | UcodeId::Gbi2 => &[],
        UcodeId::GoldenEye => GOLDENEYE_PATCHES,
        UcodeId::WaveRace => WAVE_RACE_PATCHES,
        UcodeId::Sote => SOTE_PATCHES,
        UcodeId::LastLegion => LAST_LEGION_PATCHES,
        UcodeId::PerfectDark => PERFECT_DARK_PATCHES,
        UcodeId::Dkr => DKR_PATCHES,
        UcodeId::Conker => CONKER_PATCHES,
    }
}

fn stock_table(family: UcodeId) -> [OpcodeEntry; 256] {
    let mut profile = MicrocodeProfile {
        id: family,
        stride: family.vertex_stride(),
        table: [OpcodeEntry::UNKNOWN; 256],
    };
    profile.apply(RDP_COMMANDS);
    match family {
        UcodeId::Gbi1 => {
            profile.apply(F3D_COMMON);
            profile.apply(GBI1_COMMANDS);
        }
        UcodeId::Gbi2 => profile.apply(GBI2_COMMANDS),
        _ => {
            profile.apply(F3D_COMMON);
            profile.apply(GBI0_COMMANDS);
        }
    }
    profile.table
}

/// Builds the table for `id` from scratch.
pub fn build(id: UcodeId) -> MicrocodeProfile {
    let mut profile = MicrocodeProfile {
        id,
        stride: id.vertex_stride(),
        table: stock_table(id.base()),
    };
    profile.apply(patches(id));
    profile
}

/// Picks the profile for a detection result under a title policy.
///
/// A title's custom microcode only replaces the family it is derived from,
/// so a title that also runs stock microcode for some tasks keeps the stock
/// table for those.
pub fn select(detected: Option<UcodeId>, policy: &TitlePolicy) -> UcodeId {
    match (detected, policy.ucode) {
        (Some(found), _) if found.is_custom() => found,
        (Some(found), Some(custom)) if custom.base() == found.base() => custom,
        (Some(found), _) => found,
        (None, Some(custom)) => custom,
        (None, None) => UcodeId::Gbi0,
    }
}

/// Caches built profiles and tracks the code base of the active microcode.
#[derive(Debug)]
pub struct UcodeRegistry {
    built: HashMap<UcodeId, Rc<MicrocodeProfile>>,
    active: Option<Rc<MicrocodeProfile>>,
    code_base: Option<u32>,
    rebuilds: u32,
    signatures: Vec<SizeSignature>,
}

impl Default for UcodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UcodeRegistry {
    pub fn new() -> Self {
        Self {
            built: HashMap::new(),
            active: None,
            code_base: None,
            rebuilds: 0,
            signatures: BUILTIN_SIGNATURES.to_vec(),
        }
    }

    /// Adds size signatures after the built-ins; they take precedence.
    pub fn add_signatures(&mut self, signatures: &[SizeSignature]) {
        self.signatures.extend_from_slice(signatures);
        self.invalidate();
    }

    /// Shared table for `id`, built on first use.
    pub fn build(&mut self, id: UcodeId) -> Rc<MicrocodeProfile> {
        self.built.entry(id).or_insert_with(|| Rc::new(build(id))).clone()
    }

    /// Profile for a task. Detection only runs when the microcode code base
    /// differs from the previous task's.
    pub fn resolve(
        &mut self,
        task: &TaskDescriptor,
        mem: &Rdram,
        policy: &TitlePolicy,
        forced: Option<UcodeId>,
    ) -> Rc<MicrocodeProfile> {
        if let Some(active) = &self.active {
            if self.code_base == Some(task.ucode) {
                return active.clone();
            }
        }

        let id = match forced {
            Some(id) => id,
            None => {
                let (code_size, data_size) = (task.ucode_size, task.ucode_data_size);
                let detected = identify(mem, task.ucode_data, data_size)
                    .map(|(id, _)| id)
                    .or_else(|| match_sizes(&self.signatures, code_size, data_size));
                match detected {
                    Some(id) => select(Some(id), policy),
                    None if policy.ucode.is_some() => select(None, policy),
                    None => detect(
                        mem,
                        task.ucode,
                        task.ucode_size,
                        task.ucode_data,
                        task.ucode_data_size,
                        &self.signatures,
                    ),
                }
            }
        };

        log::info!(
            "Microcode at 0x{:08X} uses profile {} (vertex stride {})",
            task.ucode,
            id,
            id.vertex_stride()
        );

        let profile = self.build(id);
        self.active = Some(profile.clone());
        self.code_base = Some(task.ucode);
        self.rebuilds += 1;
        profile
    }

    pub fn active(&self) -> Option<&Rc<MicrocodeProfile>> {
        self.active.as_ref()
    }

    /// How many times the active profile was re-resolved.
    pub fn rebuild_count(&self) -> u32 {
        self.rebuilds
    }

    /// Forgets the active microcode so the next task is detected again.
    pub fn invalidate(&mut self) {
        self.active = None;
        self.code_base = None;
    }
}
