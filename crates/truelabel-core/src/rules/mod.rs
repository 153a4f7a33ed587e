pub mod builtin;
pub mod schema;
pub mod table;

use crate::error::TrueLabelError;
use crate::model::AnalysisCategory;
use crate::normalize::normalize_parameter;
use rust_decimal::Decimal;
use schema::{LimitDef, RuleTableDef};
use std::collections::HashMap;
use std::path::Path;
pub use table::RuleTable;

/// Load a rule table from a JSON file.
pub fn load_rule_table(path: &Path) -> Result<RuleTable, TrueLabelError> {
    let content = std::fs::read_to_string(path).map_err(|e| TrueLabelError::RuleTableLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_rule_table(&content, path)
}

/// Parse a rule table from a JSON string.
pub fn parse_rule_table(json: &str, source: &Path) -> Result<RuleTable, TrueLabelError> {
    let def: RuleTableDef =
        serde_json::from_str(json).map_err(|e| TrueLabelError::RuleTableLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    compile(def)
}

/// Parse a rule table from a JSON string (no file path context).
pub fn parse_rule_table_str(json: &str) -> Result<RuleTable, TrueLabelError> {
    let def: RuleTableDef = serde_json::from_str(json)?;
    compile(def)
}

/// Validate a definition and build its lookup indexes.
pub fn compile(def: RuleTableDef) -> Result<RuleTable, TrueLabelError> {
    validate_rule_table(&def)?;

    let mut rule_index = HashMap::new();
    for (idx, rule) in def.rules.iter().enumerate() {
        for name in names_of(&rule.key, &rule.parameter, &rule.aliases) {
            rule_index.insert((rule.category, name), idx);
        }
    }

    let mut nutrient_index = HashMap::new();
    for (idx, nutrient) in def.nutrients.iter().enumerate() {
        for name in names_of(&nutrient.key, &nutrient.parameter, &nutrient.aliases) {
            nutrient_index.insert(name, idx);
        }
    }

    tracing::debug!(
        table = %def.name,
        version = %def.version,
        rules = def.rules.len(),
        nutrients = def.nutrients.len(),
        "compiled rule table"
    );

    Ok(RuleTable::new(def, rule_index, nutrient_index))
}

/// Validate that a rule table is well-formed.
pub fn validate_rule_table(def: &RuleTableDef) -> Result<(), TrueLabelError> {
    if def.rules.is_empty() {
        return Err(TrueLabelError::RuleTableInvalid("rules must not be empty".into()));
    }

    // (category, normalized name) -> owning key
    let mut claimed: HashMap<(AnalysisCategory, String), &str> = HashMap::new();

    for rule in &def.rules {
        if normalize_parameter(&rule.key).is_empty() {
            return Err(TrueLabelError::RuleTableInvalid(
                "rule key must not be empty".into(),
            ));
        }

        if rule.category == AnalysisCategory::Nutritional {
            return Err(TrueLabelError::RuleTableInvalid(format!(
                "rule '{}' uses category 'nutritional'; declare it under 'nutrients' instead",
                rule.key
            )));
        }

        if let LimitDef::Ceiling {
            max,
            warning_threshold,
        } = &rule.limit
        {
            if max.is_sign_negative() {
                return Err(TrueLabelError::RuleTableInvalid(format!(
                    "rule '{}' has negative max {}",
                    rule.key, max
                )));
            }
            if let Some(w) = warning_threshold {
                if w.is_sign_negative() || w > max {
                    return Err(TrueLabelError::RuleTableInvalid(format!(
                        "rule '{}' has warning threshold {} outside 0..={}",
                        rule.key, w, max
                    )));
                }
            }
        }

        for name in names_of(&rule.key, &rule.parameter, &rule.aliases) {
            if let Some(owner) = claimed.insert((rule.category, name.clone()), &rule.key) {
                if owner != rule.key {
                    return Err(TrueLabelError::RuleTableInvalid(format!(
                        "name '{}' is claimed by both '{}' and '{}'",
                        name, owner, rule.key
                    )));
                }
            }
        }
    }

    let mut nutrient_claimed: HashMap<String, &str> = HashMap::new();
    for nutrient in &def.nutrients {
        if normalize_parameter(&nutrient.key).is_empty() {
            return Err(TrueLabelError::RuleTableInvalid(
                "nutrient key must not be empty".into(),
            ));
        }
        for name in names_of(&nutrient.key, &nutrient.parameter, &nutrient.aliases) {
            if let Some(owner) = nutrient_claimed.insert(name.clone(), &nutrient.key) {
                if owner != nutrient.key {
                    return Err(TrueLabelError::RuleTableInvalid(format!(
                        "nutrient name '{}' is claimed by both '{}' and '{}'",
                        name, owner, nutrient.key
                    )));
                }
            }
        }
    }

    let tol = &def.nutritional_tolerance;
    for (field, value) in [
        ("macronutrient_pct", tol.macronutrient_pct),
        ("energy_pct", tol.energy_pct),
        ("sodium_upper_pct", tol.sodium_upper_pct),
        ("micronutrient_high_pct", tol.micronutrient_high_pct),
        ("micronutrient_low_pct", tol.micronutrient_low_pct),
        ("micronutrient_threshold", tol.micronutrient_threshold),
    ] {
        if value <= Decimal::ZERO {
            return Err(TrueLabelError::RuleTableInvalid(format!(
                "nutritional_tolerance.{} must be positive, got {}",
                field, value
            )));
        }
    }
    if tol.warning_band_multiplier < Decimal::ONE {
        return Err(TrueLabelError::RuleTableInvalid(format!(
            "nutritional_tolerance.warning_band_multiplier must be >= 1, got {}",
            tol.warning_band_multiplier
        )));
    }

    Ok(())
}

/// Every normalized name an entry answers to. Empty names are dropped.
fn names_of(key: &str, parameter: &str, aliases: &[String]) -> Vec<String> {
    let mut names: Vec<String> = std::iter::once(key)
        .chain(std::iter::once(parameter))
        .chain(aliases.iter().map(String::as_str))
        .map(normalize_parameter)
        .filter(|n| !n.is_empty())
        .collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: &str = r#""nutritional_tolerance": {
        "macronutrient_pct": "20",
        "energy_pct": "20",
        "sodium_upper_pct": "20",
        "micronutrient_high_pct": "20",
        "micronutrient_low_pct": "45",
        "micronutrient_threshold": "100",
        "warning_band_multiplier": "2",
        "regulatory_reference": "ANVISA RDC 429/2020"
    }"#;

    fn table_json(rules: &str, nutrients: &str) -> String {
        format!(
            r#"{{ "name": "Test", "version": "1.0", "rules": [{rules}], "nutrients": [{nutrients}], {TOLERANCE} }}"#
        )
    }

    const LEAD: &str = r#"{
        "key": "lead", "parameter": "Lead (Pb)", "category": "heavy_metal",
        "aliases": ["pb"],
        "limit": { "kind": "ceiling", "max": "0.5", "warning_threshold": "0.4" },
        "unit": "mg/kg", "regulatory_reference": "ANVISA RDC 722/2022", "severity": "critical"
    }"#;

    #[test]
    fn test_parse_valid_table() {
        let table = parse_rule_table_str(&table_json(LEAD, "")).unwrap();
        assert_eq!(table.name(), "Test");
        assert_eq!(table.rules().len(), 1);
        let rule = table
            .lookup(AnalysisCategory::HeavyMetal, "LEAD (Pb)")
            .unwrap();
        assert_eq!(rule.key, "lead");
        assert!(table.lookup(AnalysisCategory::HeavyMetal, "Pb").is_some());
        assert!(table.lookup(AnalysisCategory::Mycotoxin, "lead").is_none());
    }

    #[test]
    fn test_empty_rules_rejected() {
        assert!(parse_rule_table_str(&table_json("", "")).is_err());
    }

    #[test]
    fn test_warning_above_max_rejected() {
        let rule = r#"{
            "key": "lead", "parameter": "Lead", "category": "heavy_metal",
            "limit": { "kind": "ceiling", "max": "0.5", "warning_threshold": "0.6" },
            "unit": "mg/kg", "regulatory_reference": "x", "severity": "critical"
        }"#;
        let err = parse_rule_table_str(&table_json(rule, "")).unwrap_err();
        assert!(err.to_string().contains("warning threshold"));
    }

    #[test]
    fn test_alias_conflict_rejected() {
        let cadmium = r#"{
            "key": "cadmium", "parameter": "Cadmium", "category": "heavy_metal",
            "aliases": ["Pb"],
            "limit": { "kind": "ceiling", "max": "0.1" },
            "unit": "mg/kg", "regulatory_reference": "x", "severity": "critical"
        }"#;
        let err = parse_rule_table_str(&table_json(&format!("{LEAD}, {cadmium}"), "")).unwrap_err();
        assert!(err.to_string().contains("claimed by both"));
    }

    #[test]
    fn test_same_alias_in_other_category_allowed() {
        let pesticide = r#"{
            "key": "lead_arsenate", "parameter": "Lead arsenate", "category": "pesticide",
            "aliases": ["pb"],
            "limit": { "kind": "presence_forbidden" },
            "unit": "mg/kg", "regulatory_reference": "x", "severity": "major"
        }"#;
        let table = parse_rule_table_str(&table_json(&format!("{LEAD}, {pesticide}"), "")).unwrap();
        assert_eq!(
            table.lookup(AnalysisCategory::Pesticide, "pb").unwrap().key,
            "lead_arsenate"
        );
    }

    #[test]
    fn test_nutritional_category_rule_rejected() {
        let rule = r#"{
            "key": "protein", "parameter": "Protein", "category": "nutritional",
            "limit": { "kind": "ceiling", "max": "10" },
            "unit": "g", "regulatory_reference": "x", "severity": "minor"
        }"#;
        assert!(parse_rule_table_str(&table_json(rule, "")).is_err());
    }

    #[test]
    fn test_nutrient_lookup_and_conflict() {
        let nutrients = r#"
            { "key": "sodium", "parameter": "Sodium", "class": "sodium", "aliases": ["na"] },
            { "key": "protein", "parameter": "Protein", "class": "macronutrient" }
        "#;
        let table = parse_rule_table_str(&table_json(LEAD, nutrients)).unwrap();
        assert_eq!(table.lookup_nutrient("Sodium (Na)").unwrap().key, "sodium");
        assert_eq!(table.lookup_nutrient("NA").unwrap().key, "sodium");

        let conflicting = r#"
            { "key": "sodium", "parameter": "Sodium", "class": "sodium" },
            { "key": "salt", "parameter": "Salt", "class": "sodium", "aliases": ["sodium"] }
        "#;
        assert!(parse_rule_table_str(&table_json(LEAD, conflicting)).is_err());
    }

    #[test]
    fn test_multiplier_below_one_rejected() {
        let json = table_json(LEAD, "").replace(
            r#""warning_band_multiplier": "2""#,
            r#""warning_band_multiplier": "0.5""#,
        );
        assert!(parse_rule_table_str(&json).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        std::fs::write(&path, table_json(LEAD, "")).unwrap();
        let table = load_rule_table(&path).unwrap();
        assert_eq!(table.version(), "1.0");
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load_rule_table(Path::new("/nonexistent/rules.json")).unwrap_err();
        match err {
            TrueLabelError::RuleTableLoad { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/rules.json"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
