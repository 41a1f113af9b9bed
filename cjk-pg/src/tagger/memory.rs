//! Implémentation en mémoire de [`FeatureStore`] pour les tests

use std::cell::RefCell;
use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;

use super::{FeatureStore, FeatureTable, MatchColumn};
use crate::config::CjkMarker;

/// Colonnes utiles d'une ligne osm2pgsql
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub is_in_zh: Option<String>,
    pub wikidata: Option<String>,
    pub cjk: Option<String>,
}

impl Row {
    pub fn is_in_zh(value: &str) -> Self {
        Self {
            is_in_zh: Some(value.to_string()),
            ..Default::default()
        }
    }

    pub fn wikidata(value: &str) -> Self {
        Self {
            wikidata: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn matches(&self, column: MatchColumn, values: &HashSet<&str>) -> bool {
        match column {
            // SUBSTR(x, 1, 2) compte en caractères
            MatchColumn::IsInZhPrefix => self
                .is_in_zh
                .as_deref()
                .map(|text| text.chars().take(2).collect::<String>())
                .is_some_and(|head| values.contains(head.as_str())),
            MatchColumn::Wikidata => self
                .wikidata
                .as_deref()
                .is_some_and(|id| values.contains(id)),
        }
    }
}

/// Identifiant d'une ligne insérée
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowId(usize);

#[derive(Default)]
pub struct MemoryStore {
    rows: RefCell<Vec<(FeatureTable, Row)>>,
    statements: RefCell<Vec<(FeatureTable, MatchColumn)>>,
    failing: RefCell<Option<FeatureTable>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, table: FeatureTable, row: Row) -> RowId {
        let mut rows = self.rows.borrow_mut();
        rows.push((table, row));
        RowId(rows.len() - 1)
    }

    pub fn cjk(&self, id: RowId) -> Option<String> {
        self.rows.borrow()[id.0].1.cjk.clone()
    }

    /// Requêtes exécutées avec succès, dans l'ordre
    pub fn statements(&self) -> Vec<(FeatureTable, MatchColumn)> {
        self.statements.borrow().clone()
    }

    /// Fait échouer toute mise à jour de `table`
    pub fn fail_on(&self, table: FeatureTable) {
        *self.failing.borrow_mut() = Some(table);
    }

    /// Copie des valeurs `cjk` de toutes les lignes
    pub fn snapshot(&self) -> Vec<Option<String>> {
        self.rows
            .borrow()
            .iter()
            .map(|(_, row)| row.cjk.clone())
            .collect()
    }
}

#[async_trait(?Send)]
impl FeatureStore for MemoryStore {
    async fn update_cjk(
        &self,
        table: FeatureTable,
        column: MatchColumn,
        marker: CjkMarker,
        values: &[String],
    ) -> Result<u64> {
        if *self.failing.borrow() == Some(table) {
            anyhow::bail!("simulated failure on {}", table.name());
        }

        let values: HashSet<&str> = values.iter().map(String::as_str).collect();
        let mut updated = 0;
        for (row_table, row) in self.rows.borrow_mut().iter_mut() {
            if *row_table == table && row.matches(column, &values) {
                row.cjk = Some(marker.as_str().to_string());
                updated += 1;
            }
        }

        self.statements.borrow_mut().push((table, column));
        Ok(updated)
    }
}
