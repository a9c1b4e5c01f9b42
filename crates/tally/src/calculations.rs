//! Calculation create/read/update/delete.
//!
//! Every write validates its input, evaluates the result and persists both
//! in one store call. The evaluator re-checks division by zero on its own,
//! so a value that slipped past validation still never reaches the store.

use std::sync::Arc;

use tally_core::{
    validate_calculation_create, validate_calculation_update, Calculation, CalculationCreate,
    CalculationId, CalculationUpdate, NewCalculation, UserId,
};
use tally_store::{CalculationFilter, Store, StoreError};

use crate::error::{Result, TallyError};

const SAVE_FAILED: &str = "Calculation could not be saved";

/// Calculation operations over a shared store.
pub struct CalculationService<S: Store> {
    store: Arc<S>,
}

impl<S: Store> Clone for CalculationService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Store> CalculationService<S> {
    pub(crate) fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate, evaluate and persist a calculation, optionally owned by
    /// `owner`.
    ///
    /// Fails with [`TallyError::UserNotFound`] if `owner` does not exist.
    pub async fn create(
        &self,
        owner: Option<UserId>,
        input: &CalculationCreate,
    ) -> Result<Calculation> {
        let valid = validate_calculation_create(input)?;

        if let Some(owner) = owner {
            if self.store.get_user(owner).await?.is_none() {
                return Err(TallyError::UserNotFound(owner));
            }
        }

        let mut new_calc = NewCalculation::new(valid.a, valid.b, valid.kind);
        if let Some(owner) = owner {
            new_calc = new_calc.owner(owner);
        }
        let new_calc = new_calc.evaluated()?;
        tracing::debug!(
            a = new_calc.a,
            b = new_calc.b,
            kind = %new_calc.kind,
            result = ?new_calc.result,
            "calculation evaluated"
        );

        let calc = self
            .store
            .insert_calculation(&new_calc)
            .await
            .map_err(|e| save_error(e, owner))?;
        tracing::info!(id = %calc.id, kind = %calc.kind, "calculation created");
        Ok(calc)
    }

    /// Get a calculation by id.
    pub async fn get(&self, id: CalculationId) -> Result<Option<Calculation>> {
        Ok(self.store.get_calculation(id).await?)
    }

    /// Browse calculations, ordered by id.
    pub async fn list(&self, filter: &CalculationFilter) -> Result<Vec<Calculation>> {
        Ok(self.store.list_calculations(filter).await?)
    }

    /// Count calculations matching `filter`.
    pub async fn count(&self, filter: &CalculationFilter) -> Result<u64> {
        Ok(self.store.count_calculations(filter).await?)
    }

    /// Apply a partial update and recompute the result.
    ///
    /// The payload is validated on its own first, then merged with the
    /// stored record and the merged `(type, b)` pair is checked again. An
    /// update that changes nothing returns the stored record untouched,
    /// `updated_at` included.
    pub async fn update(
        &self,
        id: CalculationId,
        input: &CalculationUpdate,
    ) -> Result<Calculation> {
        let changes = validate_calculation_update(input)?;

        let mut calc = self
            .store
            .get_calculation(id)
            .await?
            .ok_or(TallyError::CalculationNotFound(id))?;

        if !changes.apply_to(&mut calc)? {
            tracing::debug!(id = %id, "update changes nothing");
            return Ok(calc);
        }
        calc.save_result()?;

        let updated = self
            .store
            .update_calculation(&calc)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => TallyError::CalculationNotFound(id),
                other => save_error(other, None),
            })?;
        tracing::info!(id = %updated.id, kind = %updated.kind, "calculation updated");
        Ok(updated)
    }

    /// Delete a calculation.
    pub async fn delete(&self, id: CalculationId) -> Result<()> {
        if !self.store.delete_calculation(id).await? {
            return Err(TallyError::CalculationNotFound(id));
        }
        tracing::info!(id = %id, "calculation deleted");
        Ok(())
    }
}

fn save_error(e: StoreError, owner: Option<UserId>) -> TallyError {
    match (e, owner) {
        (StoreError::ForeignKeyViolation, Some(owner)) => TallyError::UserNotFound(owner),
        (e, _) => {
            tracing::error!(error = %e, "calculation save failed");
            TallyError::CalculationSaveFailed(SAVE_FAILED.into())
        }
    }
}
