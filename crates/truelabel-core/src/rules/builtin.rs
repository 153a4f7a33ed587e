use super::{parse_rule_table_str, RuleTable};
use crate::error::TrueLabelError;
use std::sync::LazyLock;

const ANVISA_JSON: &str = include_str!("../../../../rules/anvisa.json");

/// Available predefined rule tables.
pub const PRESETS: &[&str] = &["anvisa"];

/// Preset used when the caller does not name one.
pub const DEFAULT_PRESET: &str = "anvisa";

static ANVISA_TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    parse_rule_table_str(ANVISA_JSON).expect("embedded anvisa.json is valid")
});

/// Process-wide default rule table, compiled on first use.
pub fn builtin_table() -> &'static RuleTable {
    &ANVISA_TABLE
}

/// Raw JSON of a preset, for display and export.
pub fn preset_json(name: &str) -> Result<&'static str, TrueLabelError> {
    match name {
        "anvisa" => Ok(ANVISA_JSON),
        _ => Err(unknown_preset(name)),
    }
}

/// Load a predefined rule table by name.
pub fn load_preset(name: &str) -> Result<RuleTable, TrueLabelError> {
    parse_rule_table_str(preset_json(name)?)
}

fn unknown_preset(name: &str) -> TrueLabelError {
    TrueLabelError::RuleTableInvalid(format!(
        "unknown preset '{}'. Available: {}",
        name,
        PRESETS.join(", ")
    ))
}
