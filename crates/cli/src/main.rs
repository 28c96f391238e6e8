use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod logging;

/// Learn pairwise spatial relations between labelled objects.
#[derive(Parser, Debug)]
#[command(name = "spatialrel", version, about)]
struct Cli {
    /// TOML file with `[analysis]`, `[query]` and `[output]` sections.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit log events as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build scenes from labelled clouds and write distance statistics and relations.
    Analyze(commands::analyze::AnalyzeArgs),
    /// Score placements for a target label around observed anchor objects.
    Query(commands::query::QueryArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_json)?;
    let config = config::CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Analyze(args) => {
            let summary = commands::analyze::run(&args, config)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Query(args) => {
            let outcome = commands::query::run(&args, config)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }
    Ok(())
}
