use super::*;

use crate::test_support::{init_logger, UCODE_BASE, UCODE_DATA_BASE};

const F3DEX2_ID: &str = "RSP Gfx ucode F3DEX       fifo 2.05  Yoshitaka Yasumoto 1998 Nintendo.";
const FAST3D_ID: &str = "RSP SW Version: 2.0D, 04-01-96";

fn mem_with_identity(text: &str) -> Rdram {
    let mut mem = Rdram::with_size(0x40000);
    // Some padding before the string, as in a real data segment.
    mem.load_be_bytes(UCODE_DATA_BASE + 0x130, text.as_bytes());
    mem
}

fn task_at(ucode: u32) -> TaskDescriptor {
    TaskDescriptor {
        ucode,
        ucode_size: 0x1000,
        ucode_data: UCODE_DATA_BASE,
        ucode_data_size: 0x800,
        data_ptr: 0x1000,
        dram_stack_size: 0x400,
    }
}

#[test]
fn test_classify_identity_strings() {
    assert_eq!(detect::classify(FAST3D_ID), Some(UcodeId::Gbi0));
    assert_eq!(detect::classify("RSP Gfx ucode F3DEX       fifo 1.23"), Some(UcodeId::Gbi1));
    assert_eq!(detect::classify("RSP Gfx ucode F3DLP.Rej   fifo 1.23"), Some(UcodeId::Gbi1));
    assert_eq!(detect::classify(F3DEX2_ID), Some(UcodeId::Gbi2));
    assert_eq!(detect::classify("RSP Gfx ucode F3DZEX.NoN  fifo 2.08I"), Some(UcodeId::Gbi2));
    assert_eq!(detect::classify("RSP Gfx ucode F3DEXBG.NoN fifo 2.08"), Some(UcodeId::Conker));
    assert_eq!(detect::classify("RSP Gfx ucode S2DEX  fifo 1.06"), None);
    assert_eq!(detect::classify("no identity here"), None);
}

#[test]
fn test_identify_finds_string_in_data_segment() {
    let mem = mem_with_identity(F3DEX2_ID);
    let (id, text) = identify(&mem, UCODE_DATA_BASE, 0x800).expect("identity string");
    assert_eq!(id, UcodeId::Gbi2);
    assert!(text.starts_with("RSP Gfx ucode F3DEX"));
}

#[test]
fn test_detect_falls_back_on_version_digit() {
    init_logger();
    let mem = mem_with_identity("RSP Gfx ucode S2DEX  fifo 1.06");
    let sigs = BUILTIN_SIGNATURES;
    assert_eq!(detect(&mem, UCODE_BASE, 0x1000, UCODE_DATA_BASE, 0x800, sigs), UcodeId::Gbi1);

    let blank = Rdram::with_size(0x40000);
    assert_eq!(detect(&blank, UCODE_BASE, 0x1000, UCODE_DATA_BASE, 0x800, sigs), UcodeId::Gbi0);
}

#[test]
fn test_detect_uses_sizes_when_string_is_missing() {
    init_logger();
    let blank = Rdram::with_size(0x40000);
    let sigs = BUILTIN_SIGNATURES;
    assert_eq!(detect(&blank, UCODE_BASE, 0x0F80, UCODE_DATA_BASE, 0x800, sigs), UcodeId::WaveRace);
    assert_eq!(detect(&blank, UCODE_BASE, 0x0FC0, UCODE_DATA_BASE, 0x800, sigs), UcodeId::Sote);
    // No signature for an unlisted pair.
    assert_eq!(detect(&blank, UCODE_BASE, 0x0E00, UCODE_DATA_BASE, 0x800, sigs), UcodeId::Gbi0);

    // The identity string wins over a matching size pair.
    let mem = mem_with_identity(F3DEX2_ID);
    assert_eq!(detect(&mem, UCODE_BASE, 0x0F80, UCODE_DATA_BASE, 0x800, sigs), UcodeId::Gbi2);
}

#[test]
fn test_later_signatures_take_precedence() {
    let mut sigs = BUILTIN_SIGNATURES.to_vec();
    assert_eq!(match_sizes(&sigs, 0x0F80, 0x800), Some(UcodeId::WaveRace));
    sigs.push(SizeSignature::new(0x0F80, 0x800, UcodeId::Dkr));
    assert_eq!(match_sizes(&sigs, 0x0F80, 0x800), Some(UcodeId::Dkr));
    assert_eq!(match_sizes(&sigs, 0x1000, 0x800), None);
}

#[test]
fn test_registry_resolves_stringless_blob_by_size() {
    let blank = Rdram::with_size(0x40000);
    let mut registry = UcodeRegistry::new();
    let task = TaskDescriptor {
        ucode_size: 0x0FC0,
        ..task_at(UCODE_BASE)
    };
    // A size match beats an unrelated title policy.
    let goldeneye = TitlePolicy {
        ucode: Some(UcodeId::GoldenEye),
        ..TitlePolicy::default()
    };
    assert_eq!(registry.resolve(&task, &blank, &goldeneye, None).id, UcodeId::Sote);

    registry.add_signatures(&[SizeSignature::new(0x0FC0, 0x800, UcodeId::PerfectDark)]);
    let profile = registry.resolve(&task, &blank, &TitlePolicy::default(), None);
    assert_eq!(profile.id, UcodeId::PerfectDark);
}

#[test]
fn test_sote_profile_slots() {
    let sote = build(UcodeId::Sote);
    assert_eq!(UcodeId::Sote.base(), UcodeId::Gbi0);
    assert_eq!(sote.stride, 10);
    assert_eq!(sote.entry(G_VTX).name, "G_Vtx_SOTE");
    assert_eq!(sote.entry(G_DL).name, "G_DL_SOTE");
    assert_eq!(sote.entry(G_SETTIMG).name, "G_SetTImg_SOTE");
    assert_eq!(sote.entry(G_TRI2).name, "G_TRI4");
}

#[test]
fn test_select_applies_custom_profile_to_its_family_only() {
    let policy = TitlePolicy {
        ucode: Some(UcodeId::GoldenEye),
        ..TitlePolicy::default()
    };
    assert_eq!(select(Some(UcodeId::Gbi0), &policy), UcodeId::GoldenEye);
    assert_eq!(select(Some(UcodeId::Gbi2), &policy), UcodeId::Gbi2);
    assert_eq!(select(None, &policy), UcodeId::GoldenEye);
    assert_eq!(select(None, &TitlePolicy::default()), UcodeId::Gbi0);

    let conker = TitlePolicy {
        ucode: Some(UcodeId::Conker),
        ..TitlePolicy::default()
    };
    assert_eq!(select(Some(UcodeId::Gbi2), &conker), UcodeId::Conker);

    // A custom microcode recognised from the blob itself is kept.
    assert_eq!(select(Some(UcodeId::WaveRace), &policy), UcodeId::WaveRace);
}

#[test]
fn test_stock_tables() {
    let gbi0 = build(UcodeId::Gbi0);
    assert_eq!(gbi0.entry(G_TRI2).name, "G_TRI4");
    assert_eq!(gbi0.entry(G_VTX).name, "G_VTX");
    assert_eq!(gbi0.entry(0x02).name, "G_Unknown");
    assert_eq!(gbi0.stride, 10);

    let gbi1 = build(UcodeId::Gbi1);
    assert_eq!(gbi1.entry(G_TRI2).name, "G_TRI2");
    assert_eq!(gbi1.stride, 2);

    let gbi2 = build(UcodeId::Gbi2);
    assert_eq!(gbi2.entry(G_GBI2_TRI1).name, "G_GBI2_TRI1");
    assert_eq!(gbi2.entry(G_GBI2_ENDDL).name, "G_GBI2_ENDDL");
    // Fast3D numbering does not leak into F3DEX2.
    assert_eq!(gbi2.entry(G_ENDDL).name, "G_Unknown");

    for table in [&gbi0, &gbi1, &gbi2] {
        assert_eq!(table.entry(G_SETCIMG).name, "G_SETCIMG");
        assert_eq!(table.entry(G_TEXRECT).name, "G_TEXRECT");
    }
}

#[test]
fn test_custom_profiles_only_differ_in_patched_slots() {
    for id in UcodeId::ALL.into_iter().filter(|id| id.is_custom()) {
        let custom = build(id);
        let base = build(id.base());
        let patched = patches(id);
        assert!(!patched.is_empty(), "{} has no patches", id);
        assert_eq!(custom.stride, id.vertex_stride());

        for opcode in 0..=255u8 {
            let expected = match patched.iter().find(|(op, _, _)| *op == opcode) {
                Some(&(_, _, name)) => name,
                None => base.entry(opcode).name,
            };
            assert_eq!(custom.entry(opcode).name, expected, "{} {:#04x}", id, opcode);
        }
    }
}

#[test]
fn test_vertex_strides() {
    assert_eq!(UcodeId::Gbi0.vertex_stride(), 10);
    assert_eq!(UcodeId::GoldenEye.vertex_stride(), 10);
    assert_eq!(UcodeId::WaveRace.vertex_stride(), 5);
    assert_eq!(UcodeId::Gbi1.vertex_stride(), 2);
    assert_eq!(UcodeId::Conker.vertex_stride(), 2);
}

#[test]
fn test_names_round_trip_through_serde() {
    for id in UcodeId::ALL {
        assert_eq!(UcodeId::from_name(id.name()), Some(id));
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{}\"", id.name()));
    }
    assert_eq!(UcodeId::from_name(" GBI2 "), Some(UcodeId::Gbi2));
    assert_eq!(UcodeId::from_name("f3dex3"), None);
}

#[test]
fn test_registry_reuses_profile_for_same_code_base() {
    init_logger();
    let mem = mem_with_identity(F3DEX2_ID);
    let policy = TitlePolicy::default();
    let mut registry = UcodeRegistry::new();

    let first = registry.resolve(&task_at(UCODE_BASE), &mem, &policy, None);
    let second = registry.resolve(&task_at(UCODE_BASE), &mem, &policy, None);
    assert_eq!(first.id, UcodeId::Gbi2);
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(registry.rebuild_count(), 1);

    let third = registry.resolve(&task_at(UCODE_BASE + 0x2000), &mem, &policy, None);
    assert_eq!(registry.rebuild_count(), 2);
    // Same family, so the built table is shared.
    assert!(Rc::ptr_eq(&first, &third));
}

#[test]
fn test_registry_invalidate_forces_detection() {
    let mem = mem_with_identity(FAST3D_ID);
    let mut registry = UcodeRegistry::new();
    let task = task_at(UCODE_BASE);

    let stock = registry.resolve(&task, &mem, &TitlePolicy::default(), None);
    assert_eq!(stock.id, UcodeId::Gbi0);

    let goldeneye = TitlePolicy {
        ucode: Some(UcodeId::GoldenEye),
        ..TitlePolicy::default()
    };
    // Still cached for the same code base.
    assert_eq!(registry.resolve(&task, &mem, &goldeneye, None).id, UcodeId::Gbi0);

    registry.invalidate();
    assert_eq!(registry.resolve(&task, &mem, &goldeneye, None).id, UcodeId::GoldenEye);
    assert_eq!(registry.rebuild_count(), 2);
}

#[test]
fn test_forced_profile_skips_detection() {
    let mem = mem_with_identity(FAST3D_ID);
    let mut registry = UcodeRegistry::new();
    let policy = TitlePolicy::default();
    let profile = registry.resolve(&task_at(UCODE_BASE), &mem, &policy, Some(UcodeId::Dkr));
    assert_eq!(profile.id, UcodeId::Dkr);
    assert_eq!(registry.active().map(|p| p.id), Some(UcodeId::Dkr));
}
