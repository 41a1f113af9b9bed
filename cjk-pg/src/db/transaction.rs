//! Transaction par lieu
//!
//! Chaque lieu est commité séparément: une erreur pendant le traitement d'un
//! lieu annule ses mises à jour sans toucher aux lieux déjà commités.

use anyhow::{Context, Result};
use async_trait::async_trait;
use deadpool_postgres::{Object, Transaction};
use tracing::{debug, error, info};

use crate::config::{CjkMarker, Place};
use crate::tagger::{FeatureStore, FeatureTable, MatchColumn};

/// Transaction ouverte pour le traitement d'un lieu
pub struct PlaceTransaction<'a> {
    transaction: Transaction<'a>,
    place_name: String,
}

impl<'a> PlaceTransaction<'a> {
    /// Démarre la transaction d'un lieu
    ///
    /// # Errors
    /// Retourne une erreur si la transaction ne peut pas être démarrée
    pub async fn begin(client: &'a mut Object, place: &Place) -> Result<Self> {
        let transaction = client
            .transaction()
            .await
            .context("Failed to begin transaction")?;

        debug!(place = %place.name, "Transaction started");

        Ok(Self {
            transaction,
            place_name: place.name.clone(),
        })
    }

    /// Accède à la transaction sous-jacente
    pub fn transaction(&self) -> &Transaction<'a> {
        &self.transaction
    }

    /// Valide les mises à jour du lieu
    pub async fn commit(self) -> Result<()> {
        self.transaction
            .commit()
            .await
            .with_context(|| format!("Failed to commit updates for {}", self.place_name))?;

        info!(place = %self.place_name, "Committed");
        Ok(())
    }

    /// Annule les mises à jour du lieu
    ///
    /// La transaction est également annulée si elle est droppée sans commit.
    pub async fn rollback(self, reason: &str) {
        error!(place = %self.place_name, reason = %reason, "Rolling back place updates");

        if let Err(e) = self.transaction.rollback().await {
            error!(error = %e, "Explicit rollback failed (will rollback on drop anyway)");
        }
    }
}

#[async_trait(?Send)]
impl FeatureStore for Transaction<'_> {
    async fn update_cjk(
        &self,
        table: FeatureTable,
        column: MatchColumn,
        marker: CjkMarker,
        values: &[String],
    ) -> Result<u64> {
        let sql = table.update_sql(column);
        debug!(sql = %sql, values = values.len(), "Executing update");

        self.execute(sql.as_str(), &[&marker.as_str(), &values])
            .await
            .with_context(|| format!("Failed to update {}", table.name()))
    }
}

#[async_trait(?Send)]
impl FeatureStore for PlaceTransaction<'_> {
    async fn update_cjk(
        &self,
        table: FeatureTable,
        column: MatchColumn,
        marker: CjkMarker,
        values: &[String],
    ) -> Result<u64> {
        self.transaction
            .update_cjk(table, column, marker, values)
            .await
    }
}
