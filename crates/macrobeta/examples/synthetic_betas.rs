//! Example: Betas on a Synthetic Market
//!
//! This example runs the whole pipeline without network access:
//! 1. Simulating daily closes for four assets, an FX rate and two yields
//! 2. Converting closes to percent and basis-point changes
//! 3. Estimating betas with Newey-West standard errors at several lags
//!
//! Run with: `cargo run --example synthetic_betas --features full`

use macrobeta::{
    model::{BetaConfig, BetaEstimator, PValueDistribution, estimate_betas},
    primitives::{Asset, Date, Factor, Instrument, Parameter, PriceTable},
    utils::build_changes,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::Normal;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Trading days to simulate.
const DAYS: usize = 520;

/// True loadings (percent per percent, percent per basis point) of each asset
/// on EURUSD, BUND_BP and UST10Y_BP.
const LOADINGS: [(Asset, [f64; 3]); 4] = [
    (Asset::EuroStoxx50, [-0.40, 0.010, 0.004]),
    (Asset::Eufn, [-0.20, 0.030, 0.010]),
    (Asset::Xlu, [0.05, -0.005, -0.020]),
    (Asset::Sp500, [0.10, 0.002, -0.010]),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== macrobeta on a synthetic market ===\n");

    let prices = simulate_prices(DAYS, 42)?;
    let series = prices.instruments().count();
    println!("Simulated {} days of closes for {series} series", prices.height());

    let changes = build_changes(&prices)?;
    println!("Daily changes: {} dates\n", changes.height());

    // Step 1: default settings
    let table = estimate_betas(&changes, 5)?;
    println!("{table}\n");

    // Step 2: compare against the true loadings
    println!("{:<12} {:<10} {:>10} {:>10}", "asset", "factor", "true", "estimated");
    for (asset, loadings) in LOADINGS {
        for (factor, truth) in Factor::ALL.into_iter().zip(loadings) {
            if let Some(row) = table.get(asset, Parameter::from(factor)) {
                let (asset, factor) = (asset.name(), factor.name());
                println!("{asset:<12} {factor:<10} {truth:>10.4} {:>10.4}", row.coef);
            }
        }
    }

    // Step 3: standard errors widen with the lag, coefficients do not move
    println!("\nt-statistics of SP500 on UST10Y_BP by lag:");
    for maxlags in [0, 5, 10, 20] {
        let estimator = BetaEstimator::with_config(BetaConfig {
            maxlags,
            pvalue: PValueDistribution::StudentT,
            small_sample_correction: true,
        });
        let table = estimator.estimate(&changes)?;
        if let Some(row) = table.get(Asset::Sp500, Factor::Ust10yBp.into()) {
            println!("  maxlags={maxlags:<3} coef={:.4} t={:.2} p={:.4}", row.coef, row.t, row.p);
        }
    }

    Ok(())
}

/// Geometric random walks for prices, arithmetic ones for yields.
fn simulate_prices(days: usize, seed: u64) -> Result<PriceTable, Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = Date::from_ymd_opt(2022, 1, 3).ok_or("invalid start date")?;
    let dates: Vec<Date> = start.iter_days().take(days).collect();

    // Factor changes: EURUSD in percent, yields in basis points.
    let fx = Normal::<f64>::new(0.0, 0.5)?;
    let rates = Normal::<f64>::new(0.0, 5.0)?;
    let factor_changes: Vec<[f64; 3]> =
        (0..days).map(|_| [rng.sample(fx), rng.sample(rates), rng.sample(rates)]).collect();

    let mut columns: Vec<(Instrument, Vec<Option<f64>>)> = Vec::new();

    let idiosyncratic = Normal::<f64>::new(0.0, 0.8)?;
    for (asset, loadings) in LOADINGS {
        let mut price = 100.0;
        let closes = factor_changes
            .iter()
            .map(|x| {
                let systematic: f64 = loadings.iter().zip(x).map(|(b, f)| b * f).sum();
                let change = systematic + rng.sample(idiosyncratic);
                price *= 1.0 + change / 100.0;
                Some(price)
            })
            .collect();
        columns.push((asset.into(), closes));
    }

    let mut eurusd = 1.10;
    let mut bund = 2.00;
    let mut ust = 4.00;
    let (mut fx_closes, mut bund_closes, mut ust_closes) = (Vec::new(), Vec::new(), Vec::new());
    for [dfx, dbund, dust] in &factor_changes {
        eurusd *= 1.0 + dfx / 100.0;
        bund += dbund / 100.0;
        ust += dust / 100.0;
        fx_closes.push(Some(eurusd));
        bund_closes.push(Some(bund));
        ust_closes.push(Some(ust));
    }
    columns.push((Factor::EurUsd.into(), fx_closes));
    columns.push((Factor::BundBp.into(), bund_closes));
    columns.push((Factor::Ust10yBp.into(), ust_closes));

    Ok(PriceTable::from_columns(dates, columns)?)
}
