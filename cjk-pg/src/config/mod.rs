//! Configuration du système
//!
//! Le fichier YAML est celui du chargeur de données externes du style de carte
//! (`external-data.yml`): seule la section `settings` est lue, les autres clés
//! sont ignorées.

pub mod places;

pub use places::{load_places, CjkMarker, Place};

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Nom du fichier de configuration par défaut
pub const DEFAULT_CONFIG_FILE: &str = "external-data.yml";

/// Configuration principale
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

/// Paramètres de connexion PostgreSQL, tous optionnels
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    pub database: Option<String>,

    /// Hôte ou répertoire de socket
    pub host: Option<String>,

    /// Accepte `5432` comme `"5432"`
    #[serde(default, deserialize_with = "deserialize_port")]
    pub port: Option<u16>,

    pub username: Option<String>,

    pub password: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u16),
    Text(String),
}

fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<PortValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PortValue::Number(port)) => Ok(Some(port)),
        Some(PortValue::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid port: {:?}", text))),
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml(&content)
            .context(format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // Un fichier vide est un document YAML nul
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse config YAML")
    }
}
