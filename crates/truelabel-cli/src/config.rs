use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use truelabel_core::error::TrueLabelError;
use truelabel_core::rules::{self, builtin, RuleTable};

/// Target prefixes match, so this covers both `truelabel` and `truelabel_core`.
const DEFAULT_LOG_FILTER: &str = "truelabel=info";

/// Load `.env` and install the log subscriber. Logs go to stderr so JSON
/// output on stdout stays machine-readable.
pub fn init() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Where the rule table for a run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    Preset(String),
    File(PathBuf),
}

impl RuleSource {
    /// A rule file wins over a preset; with neither, the default preset is used.
    pub fn from_args(rules: Option<PathBuf>, preset: Option<String>) -> Self {
        match (rules, preset) {
            (Some(path), _) => RuleSource::File(path),
            (None, Some(name)) => RuleSource::Preset(name),
            (None, None) => RuleSource::Preset(builtin::DEFAULT_PRESET.to_string()),
        }
    }

    pub fn load(&self) -> Result<RuleTable, TrueLabelError> {
        tracing::debug!(source = ?self, "loading rule table");
        match self {
            RuleSource::Preset(name) => builtin::load_preset(name),
            RuleSource::File(path) => rules::load_rule_table(path),
        }
    }
}
