//! Microcode identification.
//!
//! Every stock microcode carries an identity string in its data segment,
//! e.g. `RSP SW Version: 2.0D, 04-01-96` (Fast3D) or
//! `RSP Gfx ucode F3DEX       fifo 2.05  Yoshitaka Yasumoto 1998 Nintendo.`.
//! Some patched microcodes have the string stripped; those are recognised
//! by the code and data sizes in the task header.

use super::UcodeId;
use crate::memory::Rdram;
use serde::{Deserialize, Serialize};

/// Code and data sizes a task reports for one stringless microcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeSignature {
    pub code_size: u32,
    pub data_size: u32,
    pub ucode: UcodeId,
}

impl SizeSignature {
    pub const fn new(code_size: u32, data_size: u32, ucode: UcodeId) -> Self {
        Self {
            code_size,
            data_size,
            ucode,
        }
    }
}

/// Stock libultra tasks all report 0x1000/0x800, so only non-standard pairs
/// are listed.
pub const BUILTIN_SIGNATURES: &[SizeSignature] = &[
    SizeSignature::new(0x0F80, 0x0800, UcodeId::WaveRace),
    SizeSignature::new(0x1000, 0x0700, UcodeId::GoldenEye),
    SizeSignature::new(0x1000, 0x0780, UcodeId::PerfectDark),
    SizeSignature::new(0x0FC0, 0x0800, UcodeId::Sote),
    SizeSignature::new(0x0F00, 0x0800, UcodeId::Dkr),
    SizeSignature::new(0x1000, 0x0600, UcodeId::LastLegion),
];

/// Microcode for a size pair. Later entries win, so user tables appended
/// after the built-ins override them.
pub fn match_sizes(
    signatures: &[SizeSignature],
    code_size: u32,
    data_size: u32,
) -> Option<UcodeId> {
    signatures
        .iter()
        .rev()
        .find(|sig| sig.code_size == code_size && sig.data_size == data_size)
        .map(|sig| sig.ucode)
}

/// How far into the data segment the identity string is searched for.
const MAX_SCAN: u32 = 0x1000;
const MAX_NAME_LEN: u32 = 96;

fn read_string(mem: &Rdram, start: u32, end: u32) -> String {
    let mut text = String::new();
    let mut addr = start;
    while addr < end && addr - start < MAX_NAME_LEN {
        let byte = mem.read_u8(addr);
        if byte == 0 || !(0x20..0x7F).contains(&byte) {
            break;
        }
        text.push(byte as char);
        addr += 1;
    }
    text
}

/// Finds the `RSP ...` identity string in the microcode data segment.
pub fn find_identity(mem: &Rdram, data_base: u32, data_size: u32) -> Option<String> {
    let len = data_size.clamp(3, MAX_SCAN);
    if !mem.contains(data_base, len) {
        log::warn!(
            "Microcode data segment out of range: 0x{:08X} (+0x{:X})",
            data_base,
            len
        );
        return None;
    }
    let end = data_base + len;
    (data_base..end - 2)
        .find(|&addr| {
            mem.read_u8(addr) == b'R'
                && mem.read_u8(addr + 1) == b'S'
                && mem.read_u8(addr + 2) == b'P'
        })
        .map(|addr| read_string(mem, addr, end))
}

/// Major version number following the microcode name, e.g. 2 for
/// `F3DEX       fifo 2.05`.
fn major_version(text: &str) -> Option<u32> {
    let bytes = text.as_bytes();
    bytes.windows(2).find_map(|w| {
        if w[0].is_ascii_digit() && w[1] == b'.' {
            Some((w[0] - b'0') as u32)
        } else {
            None
        }
    })
}

/// Stock family for an identity string.
pub fn classify(text: &str) -> Option<UcodeId> {
    if text.contains("SW Version") || text.contains("Fast3D") {
        return Some(UcodeId::Gbi0);
    }
    if text.contains("F3DEXBG") {
        return Some(UcodeId::Conker);
    }
    let known = ["F3DEX", "F3DLX", "F3DLP", "F3DZEX", "L3DEX"];
    let name = known.iter().find(|name| text.contains(*name))?;
    // Everything after the name, so "F3DEX2" style suffixes don't parse as versions.
    let rest = text.split_once(name).map(|(_, rest)| rest).unwrap_or("");
    match major_version(rest)? {
        1 => Some(UcodeId::Gbi1),
        2 => Some(UcodeId::Gbi2),
        _ => None,
    }
}

/// Identifies the family from the data segment, returning the string too.
pub fn identify(mem: &Rdram, data_base: u32, data_size: u32) -> Option<(UcodeId, String)> {
    let text = find_identity(mem, data_base, data_size)?;
    let id = classify(&text)?;
    log::debug!("Microcode identity \"{}\" -> {}", text, id);
    Some((id, text))
}

/// Family for a microcode blob: identity string first, then the size
/// signatures. Never fails: an unrecognised blob falls back to the nearest
/// stock family with a warning.
pub fn detect(
    mem: &Rdram,
    code_base: u32,
    code_size: u32,
    data_base: u32,
    data_size: u32,
    signatures: &[SizeSignature],
) -> UcodeId {
    let text = find_identity(mem, data_base, data_size);
    if let Some(id) = text.as_deref().and_then(classify) {
        return id;
    }
    if let Some(id) = match_sizes(signatures, code_size, data_size) {
        log::debug!("Microcode sizes 0x{:X}/0x{:X} -> {}", code_size, data_size, id);
        return id;
    }

    let fallback = match text.as_deref().and_then(major_version) {
        Some(2) => UcodeId::Gbi2,
        Some(1) => UcodeId::Gbi1,
        _ => UcodeId::Gbi0,
    };
    log::warn!(
        "Unknown microcode: code 0x{:08X} (0x{:X} bytes) data 0x{:08X} (0x{:X} bytes) \"{}\", \
         assuming {}",
        code_base,
        code_size,
        data_base,
        data_size,
        text.as_deref().unwrap_or("<no identity string>"),
        fallback
    );
    fallback
}
