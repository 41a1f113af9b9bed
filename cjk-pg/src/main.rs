//! Point d'entrée CLI pour cjk-pg

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// `.env` du répertoire courant, sinon celui placé à côté du binaire
fn load_env() -> Option<PathBuf> {
    dotenvy::dotenv().ok().or_else(|| {
        let path = std::env::current_exe().ok()?.parent()?.join(".env");
        dotenvy::from_path(&path).ok().map(|_| path)
    })
}

mod cli;

use cli::{Console, TagArgs};

/// Load CJK script information from WikiData into an osm2pgsql database
#[derive(Parser)]
#[command(name = "cjk-pg")]
#[command(author, version)]
#[command(about = "Load CJK script information from WikiData into a database")]
#[command(long_about = "Fills the 'cjk' column of osm2pgsql tables for features located in Taiwan (TC) or Hong Kong (HK).\n\nFeatures are matched by their is_in:zh tag and by the OpenStreetMap references WikiData holds for items located in each place.")]
struct Cli {
    /// Be more verbose (-v, -vv). Overrides -q
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report serious problems
    #[arg(short, long)]
    quiet: bool,

    #[command(flatten)]
    args: TagArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Avant le parsing: les PG* du .env servent de défauts
    let env_file = load_env();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Some(path) = env_file {
        debug!("Loaded environment from {}", path.display());
    }

    cli::cmd_tag(&cli.args, Console::from_flags(cli.verbose, cli.quiet)).await
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (verbose, quiet) {
        (0, true) => Level::WARN,
        (0, false) => Level::INFO,
        (1, _) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
