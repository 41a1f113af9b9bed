//! Arguments et exécution de la commande

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use cjk_pg::config::{load_places, Config, Place, DEFAULT_CONFIG_FILE};
use cjk_pg::db::pool::{
    check_connection, create_pool, ConnectionOverrides, DatabaseConfig, SslMode,
};
use wdqs::{HttpSparqlClient, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct TagArgs {
    /// Name of configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override database name to connect to
    #[arg(short, long)]
    pub database: Option<String>,

    /// Override database server host or socket directory
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Override database server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override database user name
    #[arg(short = 'U', long)]
    pub username: Option<String>,

    /// Override database password
    #[arg(short = 'w', long)]
    pub password: Option<String>,

    /// SSL mode: disable, prefer, require, verify-full (default: PGSSLMODE, else disable)
    #[arg(long)]
    pub ssl: Option<SslMode>,

    /// SPARQL endpoint of the Wikidata Query Service
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Write a JSON report of updated rows to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl TagArgs {
    fn overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            database: self.database.clone(),
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            ssl_mode: self.ssl,
        }
    }
}

/// Charge la configuration et résout les paramètres de connexion
fn resolve_database(args: &TagArgs) -> Result<DatabaseConfig> {
    let config = Config::load(&args.config)?;
    DatabaseConfig::resolve(&args.overrides(), &ConnectionOverrides::from(&config.settings))
}

/// Sortie console: bannière et rapport final
///
/// Les logs passent par tracing; ceci ne concerne que stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    Normal,
    Quiet,
}

impl Console {
    /// Même règle que le niveau de log: `-v` l'emporte sur `-q`
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet && verbose == 0 {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    fn print(self, text: &str) {
        if self == Self::Normal {
            println!("{}", text);
        }
    }
}

fn banner(
    args: &TagArgs,
    db_config: &DatabaseConfig,
    endpoint: &str,
    places: &[Place],
) -> String {
    let places = places
        .iter()
        .map(|p| format!("{} ({})", p.name, p.marker))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "=== CJK tagging ===\nConfig: {}\nDatabase: {} (SSL: {})\nEndpoint: {}\nPlaces: {}",
        args.config.display(),
        db_config,
        db_config.ssl_mode,
        endpoint,
        places
    )
}

/// Exécute le marquage CJK
pub async fn cmd_tag(args: &TagArgs, console: Console) -> Result<()> {
    info!("Starting load of WikiData CJK information into database");

    let db_config = resolve_database(args)?;
    let places = load_places()?;
    let sparql = HttpSparqlClient::with_endpoint(&args.endpoint)
        .context("Failed to build SPARQL client")?;

    console.print(&banner(args, &db_config, sparql.endpoint().as_str(), &places));

    let pool = create_pool(&db_config)?;
    let version = check_connection(&pool).await?;
    console.print(&format!("Connected to PostgreSQL {}", version));

    let report = cjk_pg::run(&pool, &sparql, &places).await?;

    info!(summary = %report.summary(), "Done");
    console.print(&report.render());

    if let Some(path) = &args.report {
        report.save_to_file(path)?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
