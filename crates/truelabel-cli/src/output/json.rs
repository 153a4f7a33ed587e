use truelabel_core::error::TrueLabelError;
use truelabel_core::validate::ValidationOutcome;

pub fn print(outcome: &ValidationOutcome) -> Result<(), TrueLabelError> {
    let json = serde_json::to_string_pretty(outcome)?;
    println!("{json}");
    Ok(())
}
