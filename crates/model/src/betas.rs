//! Beta estimation across all assets of a changes table.

use macrobeta_math::{PValueDistribution, two_sided_p_value};
use macrobeta_primitives::{Asset, ChangesTable, Factor, RegressionResult, ResultTable};
use tracing::debug;

use crate::{
    AlignedSample, ColumnSelector, DesignMatrix, HacCovarianceEstimator, ModelError,
    OlsEstimator, ResultAggregator,
};

/// Configuration for beta estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetaConfig {
    /// Truncation lag of the Newey-West kernel.
    pub maxlags: usize,
    /// Reference distribution of the t-statistics.
    pub pvalue: PValueDistribution,
    /// Whether to scale the HAC covariance by n / (n - k).
    pub small_sample_correction: bool,
}

impl Default for BetaConfig {
    fn default() -> Self {
        Self { maxlags: 5, pvalue: PValueDistribution::Normal, small_sample_correction: false }
    }
}

/// Regresses every known asset on every known factor present in a table.
///
/// Assets are processed sequentially in their known order. Any failure aborts
/// the whole estimation.
#[derive(Debug, Clone, Default)]
pub struct BetaEstimator {
    config: BetaConfig,
    selector: ColumnSelector,
}

impl BetaEstimator {
    /// Create a new estimator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BetaConfig::default())
    }

    /// Create a new estimator with custom configuration.
    #[must_use]
    pub fn with_config(config: BetaConfig) -> Self {
        Self { config, selector: ColumnSelector::new() }
    }

    /// Restrict the known assets and factors.
    #[must_use]
    pub fn with_selector(mut self, selector: ColumnSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &BetaConfig {
        &self.config
    }

    /// Estimate betas of all present assets on all present factors.
    ///
    /// # Errors
    /// Returns `ModelError` if no asset or factor is present, or if any asset's
    /// regression fails.
    pub fn estimate(&self, changes: &ChangesTable) -> Result<ResultTable, ModelError> {
        let selected = self.selector.select(changes)?;

        let mut aggregator = ResultAggregator::new();
        for asset in selected.assets() {
            aggregator.extend(self.estimate_asset(changes, *asset, selected.factors())?);
        }

        debug!(
            assets = selected.assets().len(),
            factors = selected.factors().len(),
            rows = aggregator.len(),
            "estimated betas"
        );
        Ok(aggregator.finish())
    }

    /// Estimate one asset's regression on `factors`.
    ///
    /// Returns one row per parameter, intercept first.
    ///
    /// # Errors
    /// Returns `ModelError::NoFactorColumns` for an empty factor list,
    /// `ModelError::MissingColumn` for absent columns, and the design, fit or
    /// lag errors of the asset's regression.
    pub fn estimate_asset(
        &self,
        changes: &ChangesTable,
        asset: Asset,
        factors: &[Factor],
    ) -> Result<Vec<RegressionResult>, ModelError> {
        if factors.is_empty() {
            return Err(ModelError::NoFactorColumns);
        }

        let sample = AlignedSample::new(changes, asset, factors)?;
        let design = DesignMatrix::build(&sample)?;
        let fit = OlsEstimator.fit(asset, sample.response(), &design)?;
        let std_errors = HacCovarianceEstimator::new(self.config.maxlags)
            .with_small_sample_correction(self.config.small_sample_correction)
            .standard_errors(&design, &fit)?;

        let nobs = design.nobs();
        let df = nobs - design.ncols();
        debug!(%asset, nobs, r2 = fit.r_squared, "fitted asset");

        design
            .parameters()
            .iter()
            .zip(fit.coefficients.iter().zip(std_errors.iter()))
            .map(|(parameter, (coef, se))| -> Result<RegressionResult, ModelError> {
                let t = coef / se;
                let p = two_sided_p_value(t, self.config.pvalue, df)?;
                Ok(RegressionResult {
                    asset,
                    parameter: *parameter,
                    coef: *coef,
                    t,
                    p,
                    r2: fit.r_squared,
                    nobs,
                })
            })
            .collect()
    }
}

/// Estimate betas with default settings and truncation lag `maxlags`.
///
/// # Errors
/// Returns `ModelError::InvalidLag` for a negative lag, before any asset is
/// processed, and otherwise the errors of [`BetaEstimator::estimate`].
pub fn estimate_betas(changes: &ChangesTable, maxlags: i64) -> Result<ResultTable, ModelError> {
    let maxlags = usize::try_from(maxlags)
        .map_err(|_| ModelError::InvalidLag { maxlags, nobs: changes.height() })?;
    BetaEstimator::with_config(BetaConfig { maxlags, ..BetaConfig::default() }).estimate(changes)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use macrobeta_primitives::{Date, Instrument, Parameter};
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use rand_distr::Normal;
    use rstest::rstest;

    use super::*;

    fn dates(n: usize) -> Vec<Date> {
        (0..n as i32).map(|d| Date::from_num_days_from_ce_opt(738_500 + d).unwrap()).collect()
    }

    /// Synthetic market: each asset loads on every factor with AR(1) noise.
    fn synthetic(n: usize, seed: u64, columns: &[Instrument]) -> ChangesTable {
        let mut rng = StdRng::seed_from_u64(seed);
        let shock = Normal::<f64>::new(0.0, 1.0).unwrap();

        let factors: Vec<(Factor, Vec<f64>)> = Factor::ALL
            .iter()
            .map(|f| (*f, (0..n).map(|_| rng.sample(shock)).collect()))
            .collect();

        let mut table: Vec<(Instrument, Vec<Option<f64>>)> = Vec::new();
        for (i, asset) in Asset::ALL.iter().enumerate() {
            if !columns.contains(&(*asset).into()) {
                continue;
            }
            let mut noise = 0.0;
            let values = (0..n)
                .map(|t| {
                    noise = 0.5 * noise + rng.sample(shock);
                    let loading: f64 = factors
                        .iter()
                        .enumerate()
                        .map(|(j, (_, x))| (i + j) as f64 * 0.2 * x[t])
                        .sum();
                    Some(0.05 + loading + noise)
                })
                .collect();
            table.push(((*asset).into(), values));
        }
        for (factor, values) in factors {
            if columns.contains(&factor.into()) {
                table.push((factor.into(), values.into_iter().map(Some).collect()));
            }
        }

        ChangesTable::from_columns(dates(n), table).unwrap()
    }

    #[test]
    fn empty_table_is_a_configuration_error() {
        let changes = ChangesTable::from_columns(dates(10), Vec::new()).unwrap();

        let err = estimate_betas(&changes, 5).unwrap_err();

        assert!(err.is_configuration());
    }

    #[test]
    fn factors_only_is_a_configuration_error() {
        let changes = synthetic(30, 1, &[Factor::EurUsd.into(), Factor::BundBp.into()]);
        let err = estimate_betas(&changes, 5).unwrap_err();
        assert!(matches!(err, ModelError::NoAssetColumns));
    }

    #[test]
    fn single_factor_two_assets() {
        let changes = synthetic(
            60,
            2,
            &[Asset::EuroStoxx50.into(), Asset::Xlu.into(), Factor::EurUsd.into()],
        );

        let table = estimate_betas(&changes, 5).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.assets(), vec![Asset::EuroStoxx50, Asset::Xlu]);
        for asset in [Asset::EuroStoxx50, Asset::Xlu] {
            assert!(table.get(asset, Parameter::Const).is_some());
            assert!(table.get(asset, Factor::EurUsd.into()).is_some());
        }
    }

    #[test]
    fn keys_are_unique_and_sorted() {
        let changes = synthetic(120, 3, &Instrument::ALL);

        let table = estimate_betas(&changes, 5).unwrap();

        assert_eq!(table.len(), Asset::ALL.len() * (Factor::ALL.len() + 1));
        assert!(table.rows().windows(2).all(|w| w[0].key() < w[1].key()));
    }

    #[test]
    fn rows_share_asset_fit_statistics() {
        let changes = synthetic(200, 4, &Instrument::ALL);
        let table = estimate_betas(&changes, 5).unwrap();

        for asset in Asset::ALL {
            let rows: Vec<_> = table.rows().iter().filter(|r| r.asset == asset).collect();
            assert_eq!(rows.len(), 4);
            assert!(rows.iter().all(|r| r.nobs == 200 && r.r2 == rows[0].r2));
            assert!(rows.iter().all(|r| (0.0..=1.0).contains(&r.p)));
        }
    }

    #[test]
    fn loadings_are_recovered() {
        let changes = synthetic(2000, 5, &Instrument::ALL);
        let table = estimate_betas(&changes, 5).unwrap();

        // Sp500 is the fourth asset: loadings 0.6, 0.8, 1.0.
        let sp500 = |f: Factor| table.get(Asset::Sp500, f.into()).unwrap().coef;
        assert_relative_eq!(sp500(Factor::EurUsd), 0.6, epsilon = 0.1);
        assert_relative_eq!(sp500(Factor::BundBp), 0.8, epsilon = 0.1);
        assert_relative_eq!(sp500(Factor::Ust10yBp), 1.0, epsilon = 0.1);
        assert!(table.get(Asset::Sp500, Factor::Ust10yBp.into()).unwrap().p < 1e-6);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(5)]
    #[case(20)]
    fn lags_change_only_standard_errors(#[case] maxlags: i64) {
        let changes = synthetic(150, 6, &Instrument::ALL);
        let baseline = estimate_betas(&changes, 0).unwrap();

        let table = estimate_betas(&changes, maxlags).unwrap();

        for (a, b) in baseline.rows().iter().zip(table.rows()) {
            assert_eq!(a.key(), b.key());
            assert_eq!(a.coef, b.coef);
            assert_eq!(a.r2, b.r2);
        }
    }

    #[test]
    fn negative_lag_is_rejected_first() {
        let err = estimate_betas(&ChangesTable::default(), -1).unwrap_err();
        assert!(matches!(err, ModelError::InvalidLag { maxlags: -1, .. }));
    }

    #[test]
    fn lag_at_sample_size_is_rejected() {
        let changes = synthetic(8, 7, &[Asset::Eufn.into(), Factor::EurUsd.into()]);
        assert!(estimate_betas(&changes, 7).is_ok());
        assert!(matches!(
            estimate_betas(&changes, 8),
            Err(ModelError::InvalidLag { maxlags: 8, nobs: 8 })
        ));
    }

    #[test]
    fn insufficient_observations() {
        let changes = synthetic(
            2,
            8,
            &[Asset::Xlu.into(), Factor::EurUsd.into(), Factor::Ust10yBp.into()],
        );

        let err = estimate_betas(&changes, 0).unwrap_err();

        assert!(matches!(
            err,
            ModelError::InsufficientObservations { asset: Asset::Xlu, nobs: 2, columns: 3 }
        ));
    }

    #[test]
    fn single_date_is_too_short_not_degenerate() {
        let changes = ChangesTable::from_columns(
            dates(1),
            vec![(Asset::Xlu.into(), vec![Some(0.3)]), (Factor::EurUsd.into(), vec![Some(0.1)])],
        )
        .unwrap();

        let err = estimate_betas(&changes, 0).unwrap_err();

        assert!(matches!(
            err,
            ModelError::InsufficientObservations { asset: Asset::Xlu, nobs: 1, columns: 2 }
        ));
    }

    #[test]
    fn failure_on_one_asset_aborts_all() {
        let base = synthetic(50, 9, &[Asset::Eufn.into(), Factor::EurUsd.into()]);
        let mut xlu = vec![None; 50];
        xlu[10] = Some(0.4);
        xlu[20] = Some(-0.2);
        let changes = ChangesTable::from_columns(
            base.dates().to_vec(),
            vec![
                (Asset::Eufn.into(), base.column(Asset::Eufn).unwrap().to_vec()),
                (Asset::Xlu.into(), xlu),
                (Factor::EurUsd.into(), base.column(Factor::EurUsd).unwrap().to_vec()),
            ],
        )
        .unwrap();

        let err = estimate_betas(&changes, 1).unwrap_err();

        assert!(matches!(
            err,
            ModelError::InsufficientObservations { asset: Asset::Xlu, nobs: 2, columns: 2 }
        ));
    }

    #[test]
    fn student_t_p_values_are_larger() {
        let changes = synthetic(40, 10, &Instrument::ALL);
        let normal = BetaEstimator::new().estimate(&changes).unwrap();
        let student = BetaEstimator::with_config(BetaConfig {
            pvalue: PValueDistribution::StudentT,
            ..BetaConfig::default()
        })
        .estimate(&changes)
        .unwrap();

        for (n, s) in normal.rows().iter().zip(student.rows()) {
            assert_eq!(n.t, s.t);
            assert!(s.p >= n.p);
        }
    }

    #[test]
    fn estimate_single_asset() {
        let changes = synthetic(80, 11, &Instrument::ALL);

        let rows = BetaEstimator::new()
            .estimate_asset(&changes, Asset::Eufn, &[Factor::BundBp])
            .unwrap();

        let params: Vec<_> = rows.iter().map(|r| r.parameter).collect();
        assert_eq!(params, vec![Parameter::Const, Factor::BundBp.into()]);
        assert!(matches!(
            BetaEstimator::new().estimate_asset(&changes, Asset::Eufn, &[]),
            Err(ModelError::NoFactorColumns)
        ));
    }
}
