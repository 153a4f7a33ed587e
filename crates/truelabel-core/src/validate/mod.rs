pub mod aggregate;
pub mod engine;
pub mod feedback;
pub mod outcome;

pub use aggregate::calculate_overall_status;
pub use engine::{validate_nutritional_reading, validate_reading};
pub use feedback::generate_feedback;
pub use outcome::{
    Feedback, OverallStatus, OverallVerdict, ValidationOutcome, ValidationResult, ValidationStatus,
};
