//! # wdqs
//!
//! Client minimal du Wikidata Query Service pour retrouver les références
//! OpenStreetMap des items situés dans un lieu administratif.
//!
//! ## Features
//!
//! - Requête SPARQL "items dans un lieu" (P131) avec références OSM
//!   node (P11693), way (P402) et relation (P10689)
//! - Transport HTTP `reqwest` (rustls), une requête par lieu, sans cache
//! - Classement des items par type de référence OSM
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wdqs::{classify, query_place, HttpSparqlClient, Qid};
//!
//! let client = HttpSparqlClient::new()?;
//! let hong_kong: Qid = "Q8646".parse()?;
//! let records = query_place(&client, &hong_kong, "Hong Kong").await?;
//! let ids = classify(&records);
//! println!("{} nodes, {} ways", ids.nodes.len(), ids.ways.len());
//! ```

pub mod classify;
pub mod client;
pub mod error;
pub mod query;
pub mod types;

pub use classify::{classify, entity_id_from_uri, Classification};
pub use client::{HttpSparqlClient, SparqlClient, DEFAULT_ENDPOINT};
pub use error::WdqsError;
pub use types::{EntityRecord, Qid, SparqlResults};

use tracing::{debug, info};

/// Interroge Wikidata pour les items situés dans `place`
///
/// `name` ne sert qu'aux logs.
///
/// # Errors
/// Erreur réseau, statut HTTP d'erreur, réponse illisible ou ligne sans `?item`.
pub async fn query_place<C>(
    client: &C,
    place: &Qid,
    name: &str,
) -> Result<Vec<EntityRecord>, WdqsError>
where
    C: SparqlClient + ?Sized,
{
    info!("Querying WikiData for OSM data within {}", name);

    let query = query::build_place_query(place);
    debug!(place = %place, "{}", query);

    let results = client.select(&query).await?;

    results
        .results
        .bindings
        .iter()
        .map(EntityRecord::from_binding)
        .collect()
}
