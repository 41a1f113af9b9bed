//! # cjk-pg
//!
//! Renseigne la colonne `cjk` d'une base osm2pgsql pour les objets situés à
//! Taïwan ou à Hong Kong, afin que le style de carte choisisse la variante de
//! police Han adaptée (unification Han).
//!
//! ## Features
//!
//! - Passe `is_in:zh`: préfixes localisés du nom du lieu
//! - Passe Wikidata: items situés dans le lieu (P131) portant une référence OSM
//! - Une transaction par lieu, connexion unique
//! - Rapport JSON optionnel
//!
//! ## Usage CLI
//!
//! ```bash
//! # Paramètres de connexion depuis external-data.yml
//! cjk-pg
//!
//! # Surcharges
//! cjk-pg -c external-data.yml -d gis -H localhost -p 5432 -U osm
//! cjk-pg --report ./cjk-report.json -v
//! ```

pub mod config;
pub mod db;
pub mod report;
pub mod run;
pub mod tagger;

pub use config::{load_places, CjkMarker, Config, Place};
pub use db::pool::{create_pool, ConnectionOverrides, DatabaseConfig, SslMode};
pub use report::{PlaceReport, RunReport};
pub use run::{run, tag_place};
pub use tagger::{FeatureStore, FeatureTable, MatchColumn, TableCounts};
