use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which section of a lab report a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisCategory {
    Microbiological,
    HeavyMetal,
    Pesticide,
    Mycotoxin,
    Nutritional,
}

impl AnalysisCategory {
    /// Categories holding single-value readings, in evaluation order.
    pub const MEASURED: [AnalysisCategory; 4] = [
        AnalysisCategory::Microbiological,
        AnalysisCategory::HeavyMetal,
        AnalysisCategory::Pesticide,
        AnalysisCategory::Mycotoxin,
    ];

    pub fn feedback_group(self) -> FeedbackGroup {
        match self {
            AnalysisCategory::Microbiological => FeedbackGroup::Microbiological,
            AnalysisCategory::HeavyMetal
            | AnalysisCategory::Pesticide
            | AnalysisCategory::Mycotoxin => FeedbackGroup::Chemical,
            AnalysisCategory::Nutritional => FeedbackGroup::Nutritional,
        }
    }
}

impl fmt::Display for AnalysisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisCategory::Microbiological => write!(f, "Microbiological"),
            AnalysisCategory::HeavyMetal => write!(f, "Heavy metals"),
            AnalysisCategory::Pesticide => write!(f, "Pesticides"),
            AnalysisCategory::Mycotoxin => write!(f, "Mycotoxins"),
            AnalysisCategory::Nutritional => write!(f, "Nutritional"),
        }
    }
}

/// Feedback buckets presented to brands and laboratories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackGroup {
    Microbiological,
    Chemical,
    Nutritional,
}

/// A single measured value (microbiological count, contaminant level, presence test).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub parameter: String,
    pub value: Decimal,
    #[serde(default)]
    pub unit: String,
}

/// A nutritional label claim paired with the lab-measured value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionalReading {
    pub parameter: String,
    pub declared_value: Decimal,
    pub actual_value: Decimal,
    #[serde(default)]
    pub unit: String,
}

/// Structured lab analysis for one product. Absent sections are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAnalysis {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub microbiological: Vec<Reading>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub heavy_metals: Vec<Reading>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pesticides: Vec<Reading>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mycotoxins: Vec<Reading>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nutritional: Vec<NutritionalReading>,
}

impl ProductAnalysis {
    /// Readings of one measured category. Nutritional readings have their own accessor.
    pub fn readings(&self, category: AnalysisCategory) -> &[Reading] {
        match category {
            AnalysisCategory::Microbiological => &self.microbiological,
            AnalysisCategory::HeavyMetal => &self.heavy_metals,
            AnalysisCategory::Pesticide => &self.pesticides,
            AnalysisCategory::Mycotoxin => &self.mycotoxins,
            AnalysisCategory::Nutritional => &[],
        }
    }

    pub fn reading_count(&self) -> usize {
        AnalysisCategory::MEASURED
            .iter()
            .map(|c| self.readings(*c).len())
            .sum::<usize>()
            + self.nutritional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reading_count() == 0
    }
}
