//! Enchaînement des passes pour chaque lieu

use std::time::Instant;

use anyhow::{Context, Result};
use deadpool_postgres::Pool;
use tracing::info;
use wdqs::{classify, query_place, SparqlClient};

use crate::config::Place;
use crate::db::transaction::PlaceTransaction;
use crate::report::{PlaceReport, RunReport};
use crate::tagger::{tag_by_prefix, tag_by_wikidata, FeatureStore};

/// Passe préfixe, requête Wikidata, classement puis passe Wikidata pour un lieu
///
/// Ne commite rien: c'est à l'appelant de valider `store`.
pub async fn tag_place<S, C>(store: &S, sparql: &C, place: &Place) -> Result<PlaceReport>
where
    S: FeatureStore + ?Sized,
    C: SparqlClient + ?Sized,
{
    let mut report = PlaceReport::new(place);

    report.prefix = tag_by_prefix(store, place).await?;

    let records = query_place(sparql, &place.id, &place.name)
        .await
        .with_context(|| format!("WikiData query failed for {}", place.name))?;
    info!("Found {} places in WikiData", records.len());

    let classification = classify(&records);
    report.entities = records.len();
    report.nodes = classification.nodes.len();
    report.ways = classification.ways.len();
    report.relations = classification.relations.len();

    report.by_wikidata = tag_by_wikidata(store, place.marker, &classification).await?;

    Ok(report)
}

/// Traite les lieux dans l'ordre, une transaction par lieu
///
/// Une erreur interrompt le run: la transaction du lieu courant est annulée,
/// les lieux précédents restent commités.
pub async fn run<C>(pool: &Pool, sparql: &C, places: &[Place]) -> Result<RunReport>
where
    C: SparqlClient + ?Sized,
{
    let started_at = Instant::now();
    let mut report = RunReport::new();

    let mut client = pool
        .get()
        .await
        .context("Failed to get connection from pool")?;

    for place in places {
        info!(place = %place.name, id = %place.id, marker = %place.marker, "Processing place");

        let tx = PlaceTransaction::begin(&mut client, place).await?;

        match tag_place(&tx, sparql, place).await {
            Ok(place_report) => {
                tx.commit().await?;
                report.record_place(place_report);
            }
            Err(e) => {
                tx.rollback(&format!("{:#}", e)).await;
                return Err(e);
            }
        }
    }

    report.set_duration(started_at.elapsed());
    Ok(report)
}
