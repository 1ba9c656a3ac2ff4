use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    /// Schema of the scenario input files
    JsonSchema {
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
    /// Schema of the outcome files written by `solve`
    OutcomeSchema {
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    let (schema, out) = match subcommand {
        GenerateSubcommands::JsonSchema { out } => (
            corridor_optimizer::json::schema::generate_json_schema()?,
            out,
        ),
        GenerateSubcommands::OutcomeSchema { out } => (
            corridor_optimizer::json::schema::generate_outcome_json_schema()?,
            out,
        ),
    };

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(out, schema)?;

    Ok(())
}
