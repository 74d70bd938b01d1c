//! Internal helpers for input normalization.
//!
//! These utilities are **not** part of the public API. They centralize how
//! names and free text are cleaned so every operation applies the same rules.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Case-insensitive lookup key for a customer name.
///
/// NFC-composes, lowercases and collapses inner whitespace, so `"Sarah"`,
/// `" sarah "` and `"SARAH"` share one key while different spellings do not.
pub(crate) fn name_key(name: &str) -> String {
    let composed: String = name.nfc().collect();
    composed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
