use std::sync::OnceLock;

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "on" | "ON"))
        .unwrap_or(default)
}

fn env_u32(key: &str) -> Option<u32> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<u32>().ok())
}

// Per-command trace lines at debug level (very noisy)
pub fn trace_dl() -> bool {
    static ON: OnceLock<bool> = OnceLock::new();
    *ON.get_or_init(|| env_flag("DEBUG_DL", false))
}

// Stop each display list after this many commands. Unset or 0 = unlimited.
pub fn instruction_limit() -> Option<u32> {
    static V: OnceLock<Option<u32>> = OnceLock::new();
    *V.get_or_init(|| env_u32("DL_INSTRUCTION_LIMIT").filter(|&n| n != 0))
}

// Force a microcode profile by name (e.g. "gbi2", "dkr"), bypassing detection.
pub fn force_ucode() -> Option<&'static str> {
    static V: OnceLock<Option<String>> = OnceLock::new();
    V.get_or_init(|| std::env::var("DL_FORCE_UCODE").ok().filter(|s| !s.is_empty()))
        .as_deref()
}
