//! Table des lieux à traiter (embarquée, immuable)

use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wdqs::Qid;

/// Variante de police CJK écrite dans la colonne `cjk`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CjkMarker {
    /// Chinois traditionnel (Taïwan)
    TC,
    /// Hong Kong
    HK,
}

impl CjkMarker {
    pub fn as_str(self) -> &'static str {
        match self {
            CjkMarker::TC => "TC",
            CjkMarker::HK => "HK",
        }
    }
}

impl fmt::Display for CjkMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lieu administratif dont les objets reçoivent un marqueur CJK
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Place {
    /// Item Wikidata du lieu
    pub id: Qid,

    pub marker: CjkMarker,

    /// Nom lisible (logs et rapport)
    pub name: String,

    /// Préfixes de deux caractères de `is_in:zh` désignant le lieu
    #[serde(rename = "is_in:zh", default, skip_serializing_if = "Vec::is_empty")]
    pub is_in_zh: Vec<String>,
}

impl Place {
    pub fn has_prefixes(&self) -> bool {
        !self.is_in_zh.is_empty()
    }
}

/// Charge la table des lieux embarquée, dans l'ordre de déclaration
pub fn load_places() -> Result<Vec<Place>> {
    parse_places(include_str!("presets/places.json"))
}

fn parse_places(json: &str) -> Result<Vec<Place>> {
    let places: Vec<Place> =
        serde_json::from_str(json).context("Failed to parse embedded places table")?;

    // SUBSTR("is_in:zh", 1, 2) ne peut égaler qu'une chaîne de deux caractères
    for place in &places {
        if let Some(prefix) = place.is_in_zh.iter().find(|p| p.chars().count() != 2) {
            anyhow::bail!(
                "is_in:zh prefix {:?} of {} must be exactly 2 characters",
                prefix,
                place.name
            );
        }
    }

    Ok(places)
}
