mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "truelabel",
    version,
    about = "Validate product lab analyses against regulatory limits and label tolerances"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a product analysis (JSON) and print the verdict
    Validate {
        /// Path to the product analysis JSON file
        input_file: PathBuf,

        /// Custom JSON rule table
        #[arg(short, long = "rules", value_name = "FILE", env = "TRUELABEL_RULES")]
        rules: Option<PathBuf>,

        /// Predefined rule table (default: anvisa). Ignored when --rules is given
        #[arg(short, long = "preset", value_name = "NAME", env = "TRUELABEL_PRESET")]
        preset: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Show all parameters, not just warnings and rejections
        #[arg(long)]
        show_all: bool,

        /// Show regulatory references and recommendations
        #[arg(long)]
        verbose: bool,

        /// Drop parameters that match no rule instead of reporting them
        #[arg(long)]
        skip_unknown: bool,
    },
    /// Inspect and check rule tables
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List predefined rule tables
    List,
    /// Explain a rule table in plain language
    Explain {
        /// Preset name (e.g., "anvisa")
        preset: String,
    },
    /// Print the JSON schema with field descriptions and example
    Schema,
    /// Validate a custom rule table file
    Validate {
        /// Path to JSON rule table
        file: PathBuf,
    },
}

fn main() {
    config::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            input_file,
            rules,
            preset,
            output,
            show_all,
            verbose,
            skip_unknown,
        } => {
            let source = config::RuleSource::from_args(rules, preset);
            commands::validate::run(
                input_file,
                source,
                &output,
                show_all,
                verbose,
                skip_unknown,
            )
        }
        Commands::Rules { action } => match action {
            RulesAction::List => commands::rules::list(),
            RulesAction::Explain { preset } => commands::rules::explain(&preset),
            RulesAction::Schema => commands::rules::schema(),
            RulesAction::Validate { file } => commands::rules::validate(&file),
        },
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
