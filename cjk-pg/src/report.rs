//! Rapport d'exécution
//!
//! Compteurs par lieu collectés pendant les passes, affichés en fin de run et
//! optionnellement sauvegardés en JSON.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{CjkMarker, Place};
use crate::tagger::{FeatureTable, TableCounts};

/// Résultat du traitement d'un lieu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceReport {
    pub name: String,
    pub wikidata_id: String,
    pub marker: CjkMarker,

    /// Passe `is_in:zh` (`None` si le lieu n'a pas de préfixe)
    pub prefix: Option<TableCounts>,

    /// Nombre de lignes renvoyées par Wikidata
    pub entities: usize,
    pub nodes: usize,
    pub ways: usize,
    pub relations: usize,

    /// Passe Wikidata
    pub by_wikidata: TableCounts,
}

impl PlaceReport {
    pub fn new(place: &Place) -> Self {
        Self {
            name: place.name.clone(),
            wikidata_id: place.id.to_string(),
            marker: place.marker,
            prefix: None,
            entities: 0,
            nodes: 0,
            ways: 0,
            relations: 0,
            by_wikidata: TableCounts::default(),
        }
    }

    /// Lignes touchées par les deux passes (une ligne peut compter deux fois)
    pub fn rows_updated(&self) -> u64 {
        self.prefix.map_or(0, |c| c.total()) + self.by_wikidata.total()
    }
}

/// Rapport complet d'un run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub duration_secs: f64,
    pub places: Vec<PlaceReport>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre un lieu commité
    pub fn record_place(&mut self, place: PlaceReport) {
        self.places.push(place);
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    pub fn rows_updated(&self) -> u64 {
        self.places.iter().map(PlaceReport::rows_updated).sum()
    }

    /// Rapport lisible pour la console
    pub fn render(&self) -> String {
        let rule = "=".repeat(60);
        let mut lines = vec![
            String::new(),
            rule.clone(),
            "CJK TAGGING REPORT".to_string(),
            rule.clone(),
            format!("Duration: {:.2}s", self.duration_secs),
        ];

        for place in &self.places {
            lines.push(format!(
                "\n--- {} ({}, {}) ---",
                place.name, place.wikidata_id, place.marker
            ));
            lines.push(match &place.prefix {
                Some(counts) => format!("is_in:zh  : {}", format_counts(counts)),
                None => "is_in:zh  : skipped".to_string(),
            });
            lines.push(format!(
                "WikiData  : {} results, {} nodes, {} ways, {} relations",
                place.entities, place.nodes, place.ways, place.relations
            ));
            lines.push(format!("wikidata  : {}", format_counts(&place.by_wikidata)));
        }

        lines.push(format!("\nTotal rows updated: {}", self.rows_updated()));
        lines.push(rule);
        lines.join("\n")
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        let places: Vec<String> = self
            .places
            .iter()
            .map(|p| format!("{} {}", p.name, p.rows_updated()))
            .collect();
        format!(
            "{} places, {} rows updated ({})",
            self.places.len(),
            self.rows_updated(),
            places.join(", ")
        )
    }
}

fn format_counts(counts: &TableCounts) -> String {
    FeatureTable::ALL
        .iter()
        .map(|&table| match counts.get(table) {
            Some(rows) => format!("{} {}", rows, table.label()),
            None => format!("- {}", table.label()),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_places;

    fn taiwan_report() -> PlaceReport {
        let places = load_places().unwrap();
        let mut report = PlaceReport::new(&places[0]);
        let mut prefix = TableCounts::default();
        for table in FeatureTable::ALL {
            prefix.record(table, 2);
        }
        report.prefix = Some(prefix);
        report.by_wikidata.record(FeatureTable::Point, 5);
        report
    }

    #[test]
    fn test_place_report_new() {
        let places = load_places().unwrap();
        let report = PlaceReport::new(&places[1]);
        assert_eq!(report.name, "Hong Kong");
        assert_eq!(report.wikidata_id, "Q8646");
        assert_eq!(report.marker, CjkMarker::HK);
        assert_eq!(report.rows_updated(), 0);
    }

    #[test]
    fn test_rows_updated() {
        let mut run = RunReport::new();
        run.record_place(taiwan_report());
        assert_eq!(run.places[0].rows_updated(), 13);
        assert_eq!(run.rows_updated(), 13);
    }

    #[test]
    fn test_summary() {
        let mut run = RunReport::new();
        run.record_place(taiwan_report());
        let summary = run.summary();
        assert!(summary.contains("1 places"));
        assert!(summary.contains("Taiwan 13"));
    }

    #[test]
    fn test_render() {
        let mut run = RunReport::new();
        run.record_place(taiwan_report());
        let text = run.render();
        assert!(text.contains("--- Taiwan (Q865, TC) ---"));
        assert!(text.contains("wikidata  : 5 points, - roads, - other lines, - polygons"));
        assert!(text.contains("Total rows updated: 13"));
    }

    #[test]
    fn test_format_counts() {
        let mut counts = TableCounts::default();
        counts.record(FeatureTable::Roads, 4);
        assert_eq!(
            format_counts(&counts),
            "- points, 4 roads, - other lines, - polygons"
        );
    }

    #[test]
    fn test_save_to_file() {
        let mut run = RunReport::new();
        run.record_place(taiwan_report());
        run.set_duration(Duration::from_millis(1500));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        run.save_to_file(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["duration_secs"], 1.5);
        assert_eq!(json["places"][0]["marker"], "TC");
        assert_eq!(json["places"][0]["by_wikidata"]["point"], 5);
        assert!(json["places"][0]["by_wikidata"]["roads"].is_null());
    }
}
