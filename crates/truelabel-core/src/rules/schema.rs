use crate::model::AnalysisCategory;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rule table: regulatory limits for contaminants plus nutritional label tolerances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTableDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub rules: Vec<ParameterRuleDef>,
    #[serde(default)]
    pub nutrients: Vec<NutrientDef>,
    pub nutritional_tolerance: NutritionalToleranceDef,
}

/// Limit for a single contaminant or microbiological parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterRuleDef {
    /// Canonical key, e.g. "lead".
    pub key: String,
    /// Display name, e.g. "Lead (Pb)".
    pub parameter: String,
    pub category: AnalysisCategory,
    /// Alternative names found on lab reports.
    #[serde(default)]
    pub aliases: Vec<String>,
    pub limit: LimitDef,
    pub unit: String,
    pub regulatory_reference: String,
    pub severity: Severity,
    /// Guidance attached to feedback when this parameter is not approved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LimitDef {
    /// Single-sided maximum with an optional warning band below it.
    Ceiling {
        max: Decimal,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        warning_threshold: Option<Decimal>,
    },
    /// Zero tolerance: any detection rejects.
    PresenceForbidden,
}

impl fmt::Display for LimitDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitDef::Ceiling {
                max,
                warning_threshold: Some(w),
            } => write!(f, "max {max} (warning above {w})"),
            LimitDef::Ceiling {
                max,
                warning_threshold: None,
            } => write!(f, "max {max}"),
            LimitDef::PresenceForbidden => write!(f, "must be absent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    Minor,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Major => write!(f, "major"),
            Severity::Minor => write!(f, "minor"),
        }
    }
}

/// A nutrient that may appear on a nutrition facts label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutrientDef {
    pub key: String,
    pub parameter: String,
    pub class: NutrientClass,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientClass {
    Macronutrient,
    Energy,
    /// Upper deviation only; under-declaring is never penalized.
    Sodium,
    Micronutrient,
}

impl fmt::Display for NutrientClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NutrientClass::Macronutrient => write!(f, "macronutrient"),
            NutrientClass::Energy => write!(f, "energy"),
            NutrientClass::Sodium => write!(f, "sodium"),
            NutrientClass::Micronutrient => write!(f, "micronutrient"),
        }
    }
}

/// Percentage tolerance bands between declared and measured nutritional values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionalToleranceDef {
    pub macronutrient_pct: Decimal,
    pub energy_pct: Decimal,
    pub sodium_upper_pct: Decimal,
    /// Band for micronutrients declared at or above `micronutrient_threshold`.
    pub micronutrient_high_pct: Decimal,
    /// Band for micronutrients declared below `micronutrient_threshold`.
    pub micronutrient_low_pct: Decimal,
    pub micronutrient_threshold: Decimal,
    /// Deviations up to `tolerance * multiplier` are warnings; beyond are rejections.
    pub warning_band_multiplier: Decimal,
    pub regulatory_reference: String,
}
