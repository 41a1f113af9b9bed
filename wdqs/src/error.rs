//! Types d'erreurs pour le crate wdqs

use thiserror::Error;

/// Erreurs pouvant survenir lors de l'interrogation du Wikidata Query Service
#[derive(Debug, Error)]
pub enum WdqsError {
    /// Identifiant Wikidata mal formé (attendu: `Q` suivi de chiffres)
    #[error("Invalid Wikidata item id: {0:?}")]
    InvalidQid(String),

    /// Le serveur a répondu avec un statut HTTP d'erreur
    #[error("Request to {url} failed with status {status}: {message}")]
    Http {
        url: String,
        status: u16,
        message: String,
    },

    /// Erreur réseau (connexion, TLS, timeout, lecture du corps)
    #[error("Network error while querying {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Réponse illisible (JSON SPARQL invalide)
    #[error("Malformed SPARQL response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    /// Endpoint invalide
    #[error("Invalid endpoint URL {url}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Variable obligatoire absente d'un résultat
    #[error("Missing variable ?{variable} in SPARQL binding")]
    MissingVariable { variable: String },
}

impl WdqsError {
    /// Crée une erreur de variable manquante
    pub fn missing_variable(variable: impl Into<String>) -> Self {
        Self::MissingVariable {
            variable: variable.into(),
        }
    }

    /// Convertit une erreur reqwest en distinguant statut HTTP et erreur réseau
    pub(crate) fn from_reqwest(error: reqwest::Error, url: &str) -> Self {
        match error.status() {
            Some(status) => Self::Http {
                url: url.to_string(),
                status: status.as_u16(),
                message: error.to_string(),
            },
            None => Self::Network {
                url: url.to_string(),
                source: error,
            },
        }
    }
}
