//! Connexion PostgreSQL
//!
//! Un pool d'une seule connexion: tous les lieux sont traités séquentiellement
//! sur la même session.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime, Timeouts};
use rustls::{ClientConfig, RootCertStore};
use tokio_postgres::NoTls;
use tokio_postgres_rustls::MakeRustlsConnect;
use tracing::debug;

use crate::config::Settings;

/// `sslmode` tel que libpq le comprend (`PGSSLMODE`, `--ssl`)
///
/// `verify-ca` et `verify-full` sont traités comme `require`: avec rustls le
/// certificat serveur est toujours vérifié contre les racines webpki.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SslMode {
    #[default]
    Disable,
    Prefer,
    Require,
}

impl std::str::FromStr for SslMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" => Ok(Self::Disable),
            // tokio-postgres n'a pas de mode `allow`
            "allow" | "prefer" => Ok(Self::Prefer),
            "require" | "verify-ca" | "verify-full" => Ok(Self::Require),
            other => Err(format!(
                "Unknown sslmode '{}' (expected disable, allow, prefer, require, verify-ca or verify-full)",
                other
            )),
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disable => "disable",
            Self::Prefer => "prefer",
            Self::Require => "require",
        })
    }
}

impl From<SslMode> for deadpool_postgres::SslMode {
    fn from(mode: SslMode) -> Self {
        match mode {
            SslMode::Disable => Self::Disable,
            SslMode::Prefer => Self::Prefer,
            SslMode::Require => Self::Require,
        }
    }
}

/// Valeurs fournies par une source de configuration (CLI, fichier YAML)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOverrides {
    pub database: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub ssl_mode: Option<SslMode>,
}

impl From<&Settings> for ConnectionOverrides {
    fn from(settings: &Settings) -> Self {
        Self {
            database: settings.database.clone(),
            host: settings.host.clone(),
            port: settings.port,
            username: settings.username.clone(),
            password: settings.password.clone(),
            ssl_mode: None,
        }
    }
}

/// Paramètres de connexion résolus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Hôte ou répertoire de socket; `None` pour la socket Unix par défaut
    pub host: Option<String>,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: Option<String>,
    pub ssl_mode: SslMode,
}

impl DatabaseConfig {
    /// Résout la configuration: CLI > fichier > variables `PG*` > défauts
    ///
    /// Comme libpq, sans hôte on passe par la socket Unix locale et sans
    /// utilisateur on prend celui du système (`$USER`).
    ///
    /// # Errors
    /// Retourne une erreur si aucun nom de base (ou d'utilisateur) n'est
    /// trouvé, ou si `PGPORT` / `PGSSLMODE` sont invalides.
    pub fn resolve(cli: &ConnectionOverrides, file: &ConnectionOverrides) -> Result<Self> {
        Self::resolve_with_env(cli, file, |key| std::env::var(key).ok())
    }

    /// Comme [`DatabaseConfig::resolve`], avec une source d'environnement explicite
    pub fn resolve_with_env<F>(
        cli: &ConnectionOverrides,
        file: &ConnectionOverrides,
        env: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |cli: &Option<String>, file: &Option<String>, var: &str| {
            cli.clone()
                .or_else(|| file.clone())
                .or_else(|| env(var))
                .filter(|value| !value.is_empty())
        };

        let env_port = env("PGPORT")
            .map(|p| p.trim().parse::<u16>())
            .transpose()
            .context("Invalid PGPORT")?;
        let env_ssl = env("PGSSLMODE")
            .map(|s| s.parse::<SslMode>())
            .transpose()
            .map_err(anyhow::Error::msg)?;

        let dbname = pick(&cli.database, &file.database, "PGDATABASE")
            .context("No database name given (use --database, settings.database or PGDATABASE)")?;
        let user = pick(&cli.username, &file.username, "PGUSER")
            .or_else(|| env("USER"))
            .or_else(|| env("LOGNAME"))
            .context("No database user given (use --username, settings.username or PGUSER)")?;

        Ok(Self {
            host: pick(&cli.host, &file.host, "PGHOST"),
            port: cli.port.or(file.port).or(env_port).unwrap_or(5432),
            dbname,
            user,
            password: pick(&cli.password, &file.password, "PGPASSWORD"),
            ssl_mode: cli
                .ssl_mode
                .or(file.ssl_mode)
                .or(env_ssl)
                .unwrap_or_default(),
        })
    }

    /// Configuration deadpool équivalente (une seule connexion)
    ///
    /// Sans hôte, `host` reste vide et deadpool essaie les sockets Unix
    /// habituelles (`/run/postgresql`, `/var/run/postgresql`, `/tmp`).
    pub fn to_pool_config(&self) -> Config {
        let mut cfg = Config::new();
        cfg.host = self.host.clone();
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = self.password.clone();
        cfg.application_name = Some(env!("CARGO_PKG_NAME").to_string());
        cfg.ssl_mode = Some(self.ssl_mode.into());
        cfg.pool = Some(PoolConfig {
            max_size: 1,
            timeouts: Timeouts {
                wait: Some(Duration::from_secs(30)),
                create: None,
                recycle: None,
            },
            ..Default::default()
        });
        cfg
    }
}

/// `user@host:port/dbname`, sans le mot de passe
impl fmt::Display for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{}/{}",
            self.user,
            self.host.as_deref().unwrap_or("local socket"),
            self.port,
            self.dbname
        )
    }
}

fn rustls_connector() -> MakeRustlsConnect {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    MakeRustlsConnect::new(
        ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth(),
    )
}

/// Crée le pool (une connexion), TLS seulement si le mode SSL le demande
pub fn create_pool(config: &DatabaseConfig) -> Result<Pool> {
    let cfg = config.to_pool_config();

    let pool = if config.ssl_mode == SslMode::Disable {
        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
    } else {
        cfg.create_pool(Some(Runtime::Tokio1), rustls_connector())
    };

    pool.with_context(|| format!("Failed to create database pool for {}", config))
}

/// Ouvre la connexion et renvoie la version du serveur
pub async fn check_connection(pool: &Pool) -> Result<String> {
    let client = pool
        .get()
        .await
        .context("Failed to connect to PostgreSQL")?;
    let version: String = client
        .query_one("SHOW server_version", &[])
        .await
        .context("Connection test failed")?
        .get(0);

    debug!(version = %version, "Connected to PostgreSQL");
    Ok(version)
}
