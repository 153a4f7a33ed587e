use std::path::PathBuf;
use truelabel_core::error::TrueLabelError;
use truelabel_core::{UnknownParameterPolicy, ValidateOptions};

use crate::config::RuleSource;
use crate::output;

pub fn run(
    input_file: PathBuf,
    source: RuleSource,
    output_format: &str,
    show_all: bool,
    verbose: bool,
    skip_unknown: bool,
) -> Result<(), TrueLabelError> {
    let table = source.load()?;

    let options = ValidateOptions {
        unknown_parameters: if skip_unknown {
            UnknownParameterPolicy::Skip
        } else {
            UnknownParameterPolicy::Report
        },
    };

    let is_json = input_file
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if !is_json {
        return Err(TrueLabelError::UnsupportedInput(format!(
            "'{}' is not a .json file",
            input_file.display()
        )));
    }

    let json = std::fs::read_to_string(&input_file)?;
    let analysis = truelabel_core::parse_analysis(&json)?;
    tracing::info!(
        file = %input_file.display(),
        readings = analysis.reading_count(),
        table = table.name(),
        "validating analysis"
    );

    let outcome = truelabel_core::validate_analysis(&analysis, &table, &options)?;

    match output_format {
        "json" => output::json::print(&outcome)?,
        _ => output::table::print(&outcome, show_all, verbose),
    }

    Ok(())
}
