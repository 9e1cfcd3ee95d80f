//! Per-title behaviour switches.
//!
//! Handlers never test for a specific game; they read the [`TitlePolicy`]
//! selected for the running title. Built-in entries cover the titles the
//! interpreter is known to need; more can be loaded from JSON:
//!
//! ```json
//! { "titles": { "SUPER BOWLING": { "scissor_viewport_on_misaligned_ci": true } },
//!   "signatures": [ { "code_size": 3968, "data_size": 2048, "ucode": "wave_race" } ] }
//! ```

use crate::ucode::{SizeSignature, UcodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitlePolicy {
    /// Custom microcode the title ships; replaces its base family on detection.
    pub ucode: Option<UcodeId>,
    /// SetScissor also reloads the viewport when the colour image is not
    /// 256-byte aligned (split-screen rendering).
    pub scissor_viewport_on_misaligned_ci: bool,
    /// Present the frame after the list instead of before it.
    pub update_screen_after_list: bool,
    /// A Fill-mode rectangle covering the whole VI becomes a colour clear.
    pub clear_on_fullscreen_fill: bool,
}

impl Default for TitlePolicy {
    fn default() -> Self {
        Self {
            ucode: None,
            scissor_viewport_on_misaligned_ci: false,
            update_screen_after_list: false,
            clear_on_fullscreen_fill: true,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HackFile {
    #[serde(default)]
    titles: HashMap<String, TitlePolicy>,
    #[serde(default)]
    signatures: Vec<SizeSignature>,
}

#[derive(Debug, Clone, Default)]
pub struct GameHacks {
    titles: HashMap<String, TitlePolicy>,
    /// Extra microcode size signatures, checked before the built-in ones.
    signatures: Vec<SizeSignature>,
}

fn normalize(title: &str) -> String {
    title.trim().to_ascii_uppercase()
}

impl GameHacks {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut hacks = Self::empty();
        let custom = [
            ("GOLDENEYE", UcodeId::GoldenEye),
            ("PERFECT DARK", UcodeId::PerfectDark),
            ("WAVE RACE 64", UcodeId::WaveRace),
            ("SHADOWS OF THE EMPIRE", UcodeId::Sote),
            ("LAST LEGION UX", UcodeId::LastLegion),
            ("DIDDY KONG RACING", UcodeId::Dkr),
            ("JET FORCE GEMINI", UcodeId::Dkr),
            ("CONKER BFD", UcodeId::Conker),
        ];
        for (title, ucode) in custom {
            hacks.insert(
                title,
                TitlePolicy {
                    ucode: Some(ucode),
                    ..TitlePolicy::default()
                },
            );
        }
        hacks.insert(
            "SUPER BOWLING",
            TitlePolicy {
                scissor_viewport_on_misaligned_ci: true,
                ..TitlePolicy::default()
            },
        );
        // Flashes when the screen is presented before the list runs.
        hacks.insert(
            "CHAMELEONTWIST2",
            TitlePolicy {
                update_screen_after_list: true,
                ..TitlePolicy::default()
            },
        );
        hacks
    }

    pub fn insert(&mut self, title: &str, policy: TitlePolicy) {
        self.titles.insert(normalize(title), policy);
    }

    pub fn add_signature(&mut self, signature: SizeSignature) {
        self.signatures.push(signature);
    }

    pub fn signatures(&self) -> &[SizeSignature] {
        &self.signatures
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Policy for a cartridge header name; unknown titles get the defaults.
    pub fn policy_for(&self, title: &str) -> TitlePolicy {
        self.titles.get(&normalize(title)).cloned().unwrap_or_default()
    }

    /// Parses a hack table; entries are not merged with the built-ins.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let file: HackFile = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse hack table: {}", e))?;
        let mut hacks = Self::empty();
        for (title, policy) in file.titles {
            hacks.insert(&title, policy);
        }
        hacks.signatures = file.signatures;
        Ok(hacks)
    }

    /// Overlays entries from `other`, replacing titles present in both.
    pub fn merge(&mut self, other: GameHacks) {
        self.titles.extend(other.titles);
        self.signatures.extend(other.signatures);
    }

    /// Built-in table overlaid with the entries of a JSON file.
    pub fn load_from_file(path: &str) -> Result<Self, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read hack table {}: {}", path, e))?;
        let mut hacks = Self::builtin();
        hacks.merge(Self::from_json(&json)?);
        Ok(hacks)
    }

    pub fn to_json(&self) -> Result<String, String> {
        let file = HackFile {
            titles: self.titles.clone(),
            signatures: self.signatures.clone(),
        };
        serde_json::to_string_pretty(&file)
            .map_err(|e| format!("Failed to serialize hack table: {}", e))
    }
}
