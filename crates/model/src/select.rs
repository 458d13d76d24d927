//! Selection of the known columns present in a changes table.

use macrobeta_primitives::{Asset, ChangesTable, Factor};

use crate::ModelError;

/// Assets and factors available for one estimation.
///
/// Both lists are non-empty and keep the order of the known lists they were
/// selected from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedColumns {
    assets: Vec<Asset>,
    factors: Vec<Factor>,
}

impl SelectedColumns {
    /// Assets to regress.
    #[must_use]
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Factors every asset is regressed on.
    #[must_use]
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }
}

/// Intersects ordered lists of known assets and factors with a table's columns.
#[derive(Debug, Clone)]
pub struct ColumnSelector {
    assets: Vec<Asset>,
    factors: Vec<Factor>,
}

impl ColumnSelector {
    /// Selector over every known asset and factor.
    #[must_use]
    pub fn new() -> Self {
        Self::with_known(Asset::ALL.to_vec(), Factor::ALL.to_vec())
    }

    /// Selector over custom known lists.
    #[must_use]
    pub const fn with_known(assets: Vec<Asset>, factors: Vec<Factor>) -> Self {
        Self { assets, factors }
    }

    /// Select the known columns present in `changes`.
    ///
    /// # Errors
    /// Returns `ModelError::NoAssetColumns` or `ModelError::NoFactorColumns`
    /// when either selection is empty.
    pub fn select(&self, changes: &ChangesTable) -> Result<SelectedColumns, ModelError> {
        let assets: Vec<Asset> =
            self.assets.iter().copied().filter(|a| changes.contains(*a)).collect();
        if assets.is_empty() {
            return Err(ModelError::NoAssetColumns);
        }

        let factors: Vec<Factor> =
            self.factors.iter().copied().filter(|f| changes.contains(*f)).collect();
        if factors.is_empty() {
            return Err(ModelError::NoFactorColumns);
        }

        Ok(SelectedColumns { assets, factors })
    }
}

impl Default for ColumnSelector {
    fn default() -> Self {
        Self::new()
    }
}
