//! Mise à jour de la colonne `cjk` des tables osm2pgsql
//!
//! Deux passes indépendantes par lieu:
//! - préfixe: les deux premiers caractères de `is_in:zh` appartiennent aux
//!   préfixes du lieu;
//! - Wikidata: la colonne `wikidata` appartient aux identifiants renvoyés par
//!   le Query Service (nodes pour les points, ways + relations pour le reste).

#[cfg(test)]
pub(crate) mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;
use wdqs::Classification;

use crate::config::{CjkMarker, Place};

/// Table osm2pgsql mise à jour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureTable {
    Point,
    Roads,
    Line,
    Polygon,
}

impl FeatureTable {
    /// Ordre de mise à jour
    pub const ALL: [FeatureTable; 4] = [
        FeatureTable::Point,
        FeatureTable::Roads,
        FeatureTable::Line,
        FeatureTable::Polygon,
    ];

    /// Tables issues de ways et de relations
    pub const WAYS_AND_RELATIONS: [FeatureTable; 3] = [
        FeatureTable::Roads,
        FeatureTable::Line,
        FeatureTable::Polygon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FeatureTable::Point => "planet_osm_point",
            FeatureTable::Roads => "planet_osm_roads",
            FeatureTable::Line => "planet_osm_line",
            FeatureTable::Polygon => "planet_osm_polygon",
        }
    }

    /// Libellé pour les logs ("Updated N ...")
    pub fn label(self) -> &'static str {
        match self {
            FeatureTable::Point => "points",
            FeatureTable::Roads => "roads",
            FeatureTable::Line => "other lines",
            FeatureTable::Polygon => "polygons",
        }
    }

    /// `UPDATE` paramétré: `$1` = marqueur, `$2` = liste `text[]`
    pub fn update_sql(self, column: MatchColumn) -> String {
        format!(
            "UPDATE {} SET cjk = $1 WHERE {}",
            self.name(),
            column.predicate()
        )
    }
}

/// Critère de sélection des lignes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchColumn {
    /// Deux premiers caractères de `is_in:zh`
    IsInZhPrefix,
    /// Identifiant Wikidata de l'objet
    Wikidata,
}

impl MatchColumn {
    fn predicate(self) -> &'static str {
        match self {
            MatchColumn::IsInZhPrefix => r#"SUBSTR("is_in:zh", 1, 2) = ANY($2)"#,
            MatchColumn::Wikidata => "wikidata = ANY($2)",
        }
    }
}

/// Destination des mises à jour
#[async_trait(?Send)]
pub trait FeatureStore {
    /// Écrit `marker` dans `cjk` pour les lignes de `table` dont `column`
    /// appartient à `values`. Retourne le nombre de lignes touchées.
    async fn update_cjk(
        &self,
        table: FeatureTable,
        column: MatchColumn,
        marker: CjkMarker,
        values: &[String],
    ) -> Result<u64>;
}

/// Lignes touchées par table (`None`: aucune requête émise)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub point: Option<u64>,
    pub roads: Option<u64>,
    pub line: Option<u64>,
    pub polygon: Option<u64>,
}

impl TableCounts {
    pub fn record(&mut self, table: FeatureTable, rows: u64) {
        *self.slot(table) = Some(rows);
    }

    pub fn get(&self, table: FeatureTable) -> Option<u64> {
        match table {
            FeatureTable::Point => self.point,
            FeatureTable::Roads => self.roads,
            FeatureTable::Line => self.line,
            FeatureTable::Polygon => self.polygon,
        }
    }

    pub fn total(&self) -> u64 {
        FeatureTable::ALL
            .iter()
            .filter_map(|&table| self.get(table))
            .sum()
    }

    /// Nombre de requêtes `UPDATE` émises
    pub fn statements(&self) -> usize {
        FeatureTable::ALL
            .iter()
            .filter(|&&table| self.get(table).is_some())
            .count()
    }

    fn slot(&mut self, table: FeatureTable) -> &mut Option<u64> {
        match table {
            FeatureTable::Point => &mut self.point,
            FeatureTable::Roads => &mut self.roads,
            FeatureTable::Line => &mut self.line,
            FeatureTable::Polygon => &mut self.polygon,
        }
    }
}

async fn update_tables<S>(
    store: &S,
    tables: &[FeatureTable],
    column: MatchColumn,
    marker: CjkMarker,
    values: &[String],
    counts: &mut TableCounts,
) -> Result<()>
where
    S: FeatureStore + ?Sized,
{
    for &table in tables {
        let rows = store.update_cjk(table, column, marker, values).await?;
        info!("Updated {} {}", rows, table.label());
        counts.record(table, rows);
    }
    Ok(())
}

/// Passe préfixe `is_in:zh` sur les quatre tables
///
/// Retourne `None` sans rien exécuter si le lieu n'a pas de préfixe.
pub async fn tag_by_prefix<S>(store: &S, place: &Place) -> Result<Option<TableCounts>>
where
    S: FeatureStore + ?Sized,
{
    if !place.has_prefixes() {
        return Ok(None);
    }

    info!(
        "Searching for is_in:zh tags starting with one of {:?}",
        place.is_in_zh
    );

    let mut counts = TableCounts::default();
    update_tables(
        store,
        &FeatureTable::ALL,
        MatchColumn::IsInZhPrefix,
        place.marker,
        &place.is_in_zh,
        &mut counts,
    )
    .await?;

    Ok(Some(counts))
}

/// Passe Wikidata: nodes -> points, ways + relations -> roads, line, polygon
///
/// Une liste vide n'émet aucune requête pour les tables correspondantes.
pub async fn tag_by_wikidata<S>(
    store: &S,
    marker: CjkMarker,
    classification: &Classification,
) -> Result<TableCounts>
where
    S: FeatureStore + ?Sized,
{
    let mut counts = TableCounts::default();

    info!("WikiData returned {} nodes", classification.nodes.len());
    if !classification.nodes.is_empty() {
        update_tables(
            store,
            &[FeatureTable::Point],
            MatchColumn::Wikidata,
            marker,
            &classification.nodes,
            &mut counts,
        )
        .await?;
    }

    info!(
        "WikiData returned {} ways and {} relations",
        classification.ways.len(),
        classification.relations.len()
    );
    let ways_and_relations = classification.ways_and_relations();
    if !ways_and_relations.is_empty() {
        update_tables(
            store,
            &FeatureTable::WAYS_AND_RELATIONS,
            MatchColumn::Wikidata,
            marker,
            &ways_and_relations,
            &mut counts,
        )
        .await?;
    }

    Ok(counts)
}
