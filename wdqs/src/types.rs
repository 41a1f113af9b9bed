//! Types de données partagés (identifiants Wikidata, résultats SPARQL)

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WdqsError;

/// Identifiant d'item Wikidata (ex: `Q865`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Qid(String);

impl Qid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Qid {
    type Err = WdqsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix('Q') {
            Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                Ok(Qid(s.to_string()))
            }
            _ => Err(WdqsError::InvalidQid(s.to_string())),
        }
    }
}

impl TryFrom<String> for Qid {
    type Error = WdqsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Qid> for String {
    fn from(qid: Qid) -> Self {
        qid.0
    }
}

impl fmt::Display for Qid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terme RDF tel que sérialisé dans le format JSON des résultats SPARQL 1.1
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RdfTerm {
    /// `uri`, `literal` ou `bnode`
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(rename = "xml:lang", default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub datatype: Option<String>,
}

/// Une ligne de résultat: variable -> valeur liée
pub type Binding = HashMap<String, RdfTerm>;

/// En-tête d'une réponse SPARQL
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

/// Corps d'une réponse SELECT
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlBindings {
    pub bindings: Vec<Binding>,
}

/// Réponse complète au format `application/sparql-results+json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: SparqlHead,
    pub results: SparqlBindings,
}

impl SparqlResults {
    /// Décode une réponse JSON
    pub fn from_json(body: &str) -> Result<Self, WdqsError> {
        serde_json::from_str(body).map_err(|source| WdqsError::Decode { source })
    }

    pub fn len(&self) -> usize {
        self.results.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.bindings.is_empty()
    }
}

/// Item Wikidata situé dans un lieu, avec ses références OpenStreetMap éventuelles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRecord {
    /// Identifiant Wikidata (dernier segment de l'URI de l'item)
    pub id: String,
    pub label: Option<String>,
    pub node_ref: Option<String>,
    pub way_ref: Option<String>,
    pub relation_ref: Option<String>,
}
