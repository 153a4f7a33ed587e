use std::path::Path;
use truelabel_core::error::TrueLabelError;
use truelabel_core::model::AnalysisCategory;
use truelabel_core::rules::schema::{LimitDef, NutrientClass};
use truelabel_core::rules::{builtin, RuleTable};

pub fn list() -> Result<(), TrueLabelError> {
    println!("Available predefined rule tables:\n");
    for name in builtin::PRESETS {
        let table = builtin::load_preset(name)?;
        println!("  {:<8} {} (v{})", name, table.name(), table.version());
        if let Some(ref desc) = table.definition().description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), TrueLabelError> {
    let table = builtin::load_preset(preset)?;
    let def = table.definition();

    println!("{} (version {})\n", def.name, def.version);
    if let Some(ref desc) = def.description {
        println!("{}\n", desc);
    }

    println!("Each reading is approved, a warning, or rejected. Any rejection rejects");
    println!("the product; otherwise any warning makes it conditional.\n");

    for category in AnalysisCategory::MEASURED {
        print_category(&table, category);
    }

    let tol = table.tolerance();
    println!("Nutritional label tolerances ({}):\n", tol.regulatory_reference);
    println!("  Macronutrients       ±{}%", tol.macronutrient_pct);
    println!("  Energy               ±{}%", tol.energy_pct);
    println!(
        "  Sodium               +{}% (no lower limit)",
        tol.sodium_upper_pct
    );
    println!(
        "  Micronutrients       ±{}% if declared >= {}, else ±{}%",
        tol.micronutrient_high_pct, tol.micronutrient_threshold, tol.micronutrient_low_pct
    );
    println!(
        "\n  Deviations up to {}x the tolerance are warnings; beyond that, rejections.\n",
        tol.warning_band_multiplier
    );

    for class in [
        NutrientClass::Macronutrient,
        NutrientClass::Energy,
        NutrientClass::Sodium,
        NutrientClass::Micronutrient,
    ] {
        let names: Vec<&str> = table
            .nutrients()
            .iter()
            .filter(|n| n.class == class)
            .map(|n| n.parameter.as_str())
            .collect();
        if !names.is_empty() {
            println!("  {:<14} {}", format!("{}:", class), names.join(", "));
        }
    }
    println!();

    Ok(())
}

fn print_category(table: &RuleTable, category: AnalysisCategory) {
    let rules: Vec<_> = table.rules_in(category).collect();
    if rules.is_empty() {
        return;
    }

    println!("{}:\n", category);

    let max_name_len = rules
        .iter()
        .map(|r| r.parameter.chars().count())
        .max()
        .unwrap_or(20);

    println!(
        "  {:<width$}  {:<10}  {:<10}  {:<8}  {:<9}  Reference",
        "Parameter",
        "Max",
        "Warning",
        "Unit",
        "Severity",
        width = max_name_len
    );
    println!("  {}", "-".repeat(max_name_len + 72));

    for rule in rules {
        let (max, warning) = match &rule.limit {
            LimitDef::Ceiling {
                max,
                warning_threshold,
            } => (
                max.to_string(),
                warning_threshold
                    .map(|w| w.to_string())
                    .unwrap_or_else(|| "-".into()),
            ),
            LimitDef::PresenceForbidden => ("absent".to_string(), "-".to_string()),
        };
        println!(
            "  {:<width$}  {:<10}  {:<10}  {:<8}  {:<9}  {}",
            rule.parameter,
            max,
            warning,
            rule.unit,
            rule.severity.to_string(),
            rule.regulatory_reference,
            width = max_name_len
        );
    }
    println!();
}

pub fn schema() -> Result<(), TrueLabelError> {
    println!(
        r#"Rule table JSON schema

Top-level fields:
  name                   (string, required)   Display name of the rule table
  description            (string, optional)   Longer description
  version                (string, required)   Version identifier
  rules                  (array, required)    Contaminant and microbiological rules
  nutrients              (array, optional)    Nutrients recognized on labels
  nutritional_tolerance  (object, required)   Label tolerance bands

Rule fields:
  key                    (string, required)   Canonical key, e.g. "lead"
  parameter              (string, required)   Display name, e.g. "Lead (Pb)"
  category               (string, required)   microbiological | heavy_metal | pesticide | mycotoxin
  aliases                (array, optional)    Other names used on lab reports
  limit                  (object, required)   {{ "kind": "ceiling", "max": "0.5", "warning_threshold": "0.4" }}
                                              or {{ "kind": "presence_forbidden" }}
  unit                   (string, required)   Unit of the limit
  regulatory_reference   (string, required)   Citation shown with each verdict
  severity               (string, required)   critical | major | minor
  recommendation         (string, optional)   Guidance shown when not approved

Nutrient fields:
  key, parameter, aliases                     As for rules
  class                  (string, required)   macronutrient | energy | sodium | micronutrient

Names are matched case-insensitively, ignoring punctuation. A trailing
parenthetical is first matched as part of the name ("Aflatoxin (B1)"),
then ignored ("Lead (Pb)"). A name may belong to only one rule per
category and to only one nutrient.

Example:
{{
  "name": "Dairy contaminants",
  "version": "1.0",
  "rules": [
    {{
      "key": "aflatoxin_m1",
      "parameter": "Aflatoxin M1",
      "category": "mycotoxin",
      "aliases": ["afm1"],
      "limit": {{ "kind": "ceiling", "max": "0.5", "warning_threshold": "0.4" }},
      "unit": "μg/L",
      "regulatory_reference": "ANVISA RDC 723/2022",
      "severity": "critical"
    }}
  ],
  "nutrients": [
    {{ "key": "calcium", "parameter": "Calcium", "class": "micronutrient" }}
  ],
  "nutritional_tolerance": {{
    "macronutrient_pct": "20",
    "energy_pct": "20",
    "sodium_upper_pct": "20",
    "micronutrient_high_pct": "20",
    "micronutrient_low_pct": "45",
    "micronutrient_threshold": "100",
    "warning_band_multiplier": "2",
    "regulatory_reference": "ANVISA RDC 429/2020"
  }}
}}

Numbers may be written as quoted strings to preserve exact decimal
precision (e.g., "0.05").
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), TrueLabelError> {
    let table = truelabel_core::rules::load_rule_table(file)?;

    println!(
        "Rule table '{}' (v{}) is valid.",
        table.name(),
        table.version()
    );
    for category in AnalysisCategory::MEASURED {
        let count = table.rules_in(category).count();
        if count > 0 {
            println!("  {}: {} rules", category, count);
        }
    }
    println!("  Nutrients: {}", table.nutrients().len());

    // Potential issues (warnings, not errors)
    let mut warnings = Vec::new();
    for rule in table.rules() {
        if let LimitDef::Ceiling {
            max,
            warning_threshold: None,
        } = &rule.limit
        {
            if !max.is_zero() {
                warnings.push(format!(
                    "rule '{}' has no warning threshold; values jump from approved to rejected",
                    rule.key
                ));
            }
        }
    }
    if table.nutrients().is_empty() {
        warnings.push("no nutrients declared; nutritional readings will not be validated".into());
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
