use super::schema::{NutrientDef, NutritionalToleranceDef, ParameterRuleDef, RuleTableDef};
use crate::model::AnalysisCategory;
use crate::normalize::lookup_keys;
use std::collections::HashMap;

/// A validated rule table with name lookups resolved up front.
///
/// Built once by [`super::compile`] and read-only afterwards, so a single
/// instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct RuleTable {
    def: RuleTableDef,
    /// (category, normalized name) -> index into `def.rules`
    rule_index: HashMap<(AnalysisCategory, String), usize>,
    /// normalized name -> index into `def.nutrients`
    nutrient_index: HashMap<String, usize>,
}

impl RuleTable {
    pub(super) fn new(
        def: RuleTableDef,
        rule_index: HashMap<(AnalysisCategory, String), usize>,
        nutrient_index: HashMap<String, usize>,
    ) -> Self {
        Self {
            def,
            rule_index,
            nutrient_index,
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn version(&self) -> &str {
        &self.def.version
    }

    pub fn definition(&self) -> &RuleTableDef {
        &self.def
    }

    pub fn rules(&self) -> &[ParameterRuleDef] {
        &self.def.rules
    }

    pub fn nutrients(&self) -> &[NutrientDef] {
        &self.def.nutrients
    }

    pub fn tolerance(&self) -> &NutritionalToleranceDef {
        &self.def.nutritional_tolerance
    }

    /// Find the rule for a raw parameter name within a category.
    pub fn lookup(&self, category: AnalysisCategory, raw_name: &str) -> Option<&ParameterRuleDef> {
        lookup_keys(raw_name)
            .into_iter()
            .find_map(|key| self.rule_index.get(&(category, key)))
            .map(|&idx| &self.def.rules[idx])
    }

    pub fn lookup_nutrient(&self, raw_name: &str) -> Option<&NutrientDef> {
        lookup_keys(raw_name)
            .into_iter()
            .find_map(|key| self.nutrient_index.get(&key))
            .map(|&idx| &self.def.nutrients[idx])
    }

    pub fn rules_in(&self, category: AnalysisCategory) -> impl Iterator<Item = &ParameterRuleDef> {
        self.def.rules.iter().filter(move |r| r.category == category)
    }
}
