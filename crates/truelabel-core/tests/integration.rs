//! Integration tests for validate_analysis() end-to-end.
//!
//! Fixtures mirror the passed / failed / warning sample analyses used by
//! the web client, submitted as the JSON the upload form produces.

use rust_decimal_macros::dec;
use truelabel_core::error::TrueLabelError;
use truelabel_core::model::ProductAnalysis;
use truelabel_core::rules::builtin::{builtin_table, load_preset};
use truelabel_core::rules::parse_rule_table_str;
use truelabel_core::validate::{OverallVerdict, ValidationStatus};
use truelabel_core::{
    parse_analysis, validate_analysis, validate_with_builtin, UnknownParameterPolicy,
    ValidateOptions,
};

const PASSED: &str = r#"{
    "microbiological": [
        { "parameter": "Total Coliforms", "value": 100, "unit": "CFU/g" },
        { "parameter": "Escherichia coli", "value": 5, "unit": "CFU/g" },
        { "parameter": "Salmonella sp.", "value": 0, "unit": "in 25g" }
    ],
    "heavyMetals": [
        { "parameter": "Lead (Pb)", "value": 0.2, "unit": "mg/kg" },
        { "parameter": "Cadmium (Cd)", "value": 0.05, "unit": "mg/kg" }
    ],
    "nutritional": [
        { "parameter": "Protein", "declaredValue": 20, "actualValue": 19.5, "unit": "g" },
        { "parameter": "Sodium", "declaredValue": 300, "actualValue": 320, "unit": "mg" }
    ]
}"#;

const FAILED: &str = r#"{
    "microbiological": [
        { "parameter": "Salmonella sp.", "value": 1, "unit": "in 25g" },
        { "parameter": "Total Coliforms", "value": 2000, "unit": "CFU/g" }
    ],
    "heavyMetals": [
        { "parameter": "Lead (Pb)", "value": 0.8, "unit": "mg/kg" },
        { "parameter": "Mercury (Hg)", "value": 0.1, "unit": "mg/kg" }
    ],
    "mycotoxins": [
        { "parameter": "Aflatoxin B1", "value": 10, "unit": "μg/kg" }
    ]
}"#;

const WARNING: &str = r#"{
    "microbiological": [
        { "parameter": "Total Coliforms", "value": 600, "unit": "CFU/g" },
        { "parameter": "Yeasts and Molds", "value": 7000, "unit": "CFU/g" }
    ],
    "heavyMetals": [
        { "parameter": "Lead (Pb)", "value": 0.42, "unit": "mg/kg" }
    ]
}"#;

fn analysis(json: &str) -> ProductAnalysis {
    parse_analysis(json).unwrap()
}

// ---------------------------------------------------------------------------
// Minimal compliant product: Salmonella absent, low lead, protein on label
// ---------------------------------------------------------------------------
#[test]
fn minimal_compliant_product_is_approved() {
    let outcome = validate_with_builtin(&analysis(
        r#"{
            "microbiological": [{ "parameter": "Salmonella sp.", "value": 0, "unit": "in 25g" }],
            "heavyMetals": [{ "parameter": "Lead", "value": 0.2, "unit": "mg/kg" }],
            "nutritional": [
                { "parameter": "Protein", "declaredValue": 20, "actualValue": 19.5, "unit": "g" }
            ]
        }"#,
    ))
    .unwrap();

    assert_eq!(outcome.validation_results.len(), 3);
    assert_eq!(outcome.overall_status.status, OverallVerdict::Approved);
    assert_eq!(outcome.overall_status.critical_issues, 0);
    assert_eq!(outcome.overall_status.warnings, 0);
    assert!(outcome.feedback.is_empty());
}

#[test]
fn passed_fixture_is_approved() {
    let outcome = validate_with_builtin(&analysis(PASSED)).unwrap();
    assert_eq!(outcome.validation_results.len(), 7);
    assert!(outcome
        .validation_results
        .iter()
        .all(|r| r.status == ValidationStatus::Approved));
    assert_eq!(outcome.overall_status.status, OverallVerdict::Approved);
    assert_eq!(
        outcome.overall_status.summary,
        "Product meets all regulatory requirements"
    );
}

#[test]
fn failed_fixture_is_rejected() {
    let outcome = validate_with_builtin(&analysis(FAILED)).unwrap();
    let overall = &outcome.overall_status;

    assert_eq!(overall.status, OverallVerdict::Rejected);
    assert_eq!(overall.critical_issues, 5);
    assert_eq!(overall.warnings, 0);
    // Total Coliforms is a major rule; the other four are critical
    assert_eq!(
        overall.summary,
        "Product rejected due to 4 critical non-compliance(s)"
    );

    let salmonella = &outcome.validation_results[0];
    assert_eq!(salmonella.parameter, "Salmonella sp.");
    assert_eq!(salmonella.status, ValidationStatus::Rejected);
    assert_eq!(salmonella.message, "Present (non-compliant)");

    assert_eq!(outcome.feedback.microbiological.len(), 2);
    assert_eq!(outcome.feedback.chemical.len(), 3);
    assert!(outcome.feedback.nutritional.is_empty());
    assert!(outcome
        .feedback
        .recommendations
        .iter()
        .any(|r| r.contains("raw material sources")));
    assert!(outcome
        .feedback
        .recommendations
        .iter()
        .any(|r| r.contains("storage conditions")));
}

#[test]
fn warning_fixture_is_conditional() {
    let outcome = validate_with_builtin(&analysis(WARNING)).unwrap();
    let overall = &outcome.overall_status;

    assert_eq!(overall.status, OverallVerdict::Conditional);
    assert_eq!(overall.critical_issues, 0);
    assert_eq!(overall.warnings, 3);
    assert_eq!(
        overall.summary,
        "Product conditionally approved with 3 warning(s)"
    );
}

#[test]
fn presence_rejects_regardless_of_other_readings() {
    let outcome = validate_with_builtin(&analysis(
        r#"{
            "microbiological": [
                { "parameter": "Salmonella sp.", "value": 1, "unit": "in 25g" },
                { "parameter": "Total Coliforms", "value": 10, "unit": "CFU/g" }
            ],
            "nutritional": [
                { "parameter": "Protein", "declaredValue": 20, "actualValue": 20, "unit": "g" }
            ]
        }"#,
    ))
    .unwrap();
    assert_eq!(outcome.overall_status.status, OverallVerdict::Rejected);
    assert_eq!(outcome.overall_status.critical_issues, 1);
}

#[test]
fn empty_analysis_is_approved() {
    let outcome = validate_with_builtin(&analysis("{}")).unwrap();
    assert!(outcome.validation_results.is_empty());
    assert_eq!(outcome.overall_status.status, OverallVerdict::Approved);
    assert_eq!(outcome.overall_status.critical_issues, 0);
    assert_eq!(outcome.overall_status.warnings, 0);
}

#[test]
fn validation_is_idempotent() {
    let input = analysis(FAILED);
    let snapshot = input.clone();
    let first = validate_with_builtin(&input).unwrap();
    let second = validate_with_builtin(&input).unwrap();
    assert_eq!(first, second);
    assert_eq!(input, snapshot);
}

#[test]
fn results_follow_category_then_input_order() {
    let outcome = validate_with_builtin(&analysis(
        r#"{
            "nutritional": [
                { "parameter": "Protein", "declaredValue": 10, "actualValue": 9.5, "unit": "g" }
            ],
            "mycotoxins": [{ "parameter": "Patulin", "value": 10, "unit": "μg/L" }],
            "pesticides": [{ "parameter": "Glyphosate", "value": 0.01, "unit": "mg/kg" }],
            "heavyMetals": [
                { "parameter": "Tin (Sn)", "value": 10, "unit": "mg/kg" },
                { "parameter": "Copper (Cu)", "value": 2, "unit": "mg/kg" }
            ],
            "microbiological": [{ "parameter": "Listeria monocytogenes", "value": 0, "unit": "CFU/g" }]
        }"#,
    ))
    .unwrap();
    let names: Vec<&str> = outcome
        .validation_results
        .iter()
        .map(|r| r.parameter.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "Listeria monocytogenes",
            "Tin (Sn)",
            "Copper (Cu)",
            "Glyphosate",
            "Patulin",
            "Protein"
        ]
    );
}

#[test]
fn sodium_under_declaration_is_not_penalized() {
    let outcome = validate_with_builtin(&analysis(
        r#"{ "nutritional": [
            { "parameter": "Sodium", "declaredValue": 300, "actualValue": 100, "unit": "mg" },
            { "parameter": "Sodium (Na)", "declaredValue": 300, "actualValue": 400, "unit": "mg" }
        ] }"#,
    ))
    .unwrap();
    assert_eq!(
        outcome.validation_results[0].status,
        ValidationStatus::Approved
    );
    assert_ne!(
        outcome.validation_results[1].status,
        ValidationStatus::Approved
    );
}

#[test]
fn unknown_parameters_reported_by_default() {
    let input = analysis(
        r#"{ "heavyMetals": [
            { "parameter": "Lead (Pb)", "value": 0.1, "unit": "mg/kg" },
            { "parameter": "Nickel (Ni)", "value": 3, "unit": "mg/kg" }
        ] }"#,
    );

    let outcome = validate_with_builtin(&input).unwrap();
    assert_eq!(outcome.validation_results.len(), 2);
    assert_eq!(
        outcome.validation_results[1].status,
        ValidationStatus::NotApplicable
    );
    assert_eq!(outcome.overall_status.status, OverallVerdict::Approved);
    assert_eq!(outcome.overall_status.not_applicable, 1);
    assert!(outcome.feedback.recommendations[0].contains("Nickel (Ni)"));

    let options = ValidateOptions {
        unknown_parameters: UnknownParameterPolicy::Skip,
    };
    let skipped = validate_analysis(&input, builtin_table(), &options).unwrap();
    assert_eq!(skipped.validation_results.len(), 1);
    assert_eq!(skipped.overall_status.not_applicable, 0);
    assert!(skipped.feedback.is_empty());
}

#[test]
fn invalid_reading_propagates() {
    let err = validate_with_builtin(&analysis(
        r#"{ "nutritional": [
            { "parameter": "Protein", "declaredValue": 0, "actualValue": 3, "unit": "g" }
        ] }"#,
    ))
    .unwrap_err();
    match err {
        TrueLabelError::InvalidReading { parameter, .. } => assert_eq!(parameter, "Protein"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn extreme_nutritional_values_are_errors_not_panics() {
    for json in [
        r#"{ "nutritional": [
            { "parameter": "Protein", "declaredValue": "0.0000001", "actualValue": "10000000000000000000000000" }
        ] }"#,
        r#"{ "nutritional": [
            { "parameter": "Protein", "declaredValue": "1", "actualValue": "1000000000000000000000000000" }
        ] }"#,
    ] {
        let err = validate_with_builtin(&analysis(json)).unwrap_err();
        assert!(
            matches!(err, TrueLabelError::InvalidReading { ref reason, .. } if reason.contains("out of range")),
            "{err}"
        );
    }
}

#[test]
fn parenthesised_mycotoxin_variant_is_checked() {
    let outcome = validate_with_builtin(&analysis(
        r#"{ "mycotoxins": [
            { "parameter": "Aflatoxin (B1)", "value": 7, "unit": "μg/kg" },
            { "parameter": "Aflatoxin (M1)", "value": 0.1, "unit": "μg/L" }
        ] }"#,
    ))
    .unwrap();
    let keys: Vec<_> = outcome
        .validation_results
        .iter()
        .map(|r| r.rule_key.as_deref())
        .collect();
    assert_eq!(keys, vec![Some("aflatoxin_b1"), Some("aflatoxin_m1")]);
    assert_eq!(outcome.overall_status.status, OverallVerdict::Rejected);
}

#[test]
fn non_object_input_rejected() {
    assert!(matches!(
        parse_analysis("[1, 2]"),
        Err(TrueLabelError::UnsupportedInput(_))
    ));
}

#[test]
fn custom_table_changes_verdict() {
    let mut def = load_preset("anvisa").unwrap().definition().clone();
    def.nutritional_tolerance.warning_band_multiplier = dec!(1);
    let strict = truelabel_core::rules::compile(def).unwrap();

    let input = analysis(
        r#"{ "nutritional": [
            { "parameter": "Protein", "declaredValue": 20, "actualValue": 25, "unit": "g" }
        ] }"#,
    );
    let lenient = validate_with_builtin(&input).unwrap();
    assert_eq!(lenient.overall_status.status, OverallVerdict::Conditional);

    let outcome = validate_analysis(&input, &strict, &ValidateOptions::default()).unwrap();
    assert_eq!(outcome.overall_status.status, OverallVerdict::Rejected);
}

#[test]
fn outcome_serializes_camel_case() {
    let outcome = validate_with_builtin(&analysis(WARNING)).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["overallStatus"]["status"], "conditional");
    assert_eq!(json["overallStatus"]["criticalIssues"], 0);
    assert_eq!(json["validationResults"][0]["status"], "warning");
    assert_eq!(
        json["validationResults"][0]["regulatoryReference"],
        "ANVISA RDC 331/2019"
    );
    assert!(json["feedback"]["recommendations"].is_array());
}

#[test]
fn minimal_custom_table() {
    let table = parse_rule_table_str(
        r#"{
            "name": "Spring water",
            "version": "1",
            "rules": [{
                "key": "nitrate", "parameter": "Nitrate", "category": "heavy_metal",
                "limit": { "kind": "ceiling", "max": "50" },
                "unit": "mg/L", "regulatory_reference": "GM/MS 888/2021", "severity": "major"
            }],
            "nutritional_tolerance": {
                "macronutrient_pct": "20", "energy_pct": "20", "sodium_upper_pct": "20",
                "micronutrient_high_pct": "20", "micronutrient_low_pct": "45",
                "micronutrient_threshold": "100", "warning_band_multiplier": "2",
                "regulatory_reference": "ANVISA RDC 429/2020"
            }
        }"#,
    )
    .unwrap();
    let outcome = validate_analysis(
        &analysis(r#"{ "heavyMetals": [{ "parameter": "NITRATE", "value": "50", "unit": "" }] }"#),
        &table,
        &ValidateOptions::default(),
    )
    .unwrap();
    let result = &outcome.validation_results[0];
    assert_eq!(result.status, ValidationStatus::Approved);
    assert_eq!(result.unit, "mg/L");
    assert_eq!(outcome.rule_table, "Spring water");
}
