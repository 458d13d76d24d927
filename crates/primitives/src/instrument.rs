//! The closed set of series the engine reads.

use std::fmt;

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::{Asset, Factor};

/// How a price level is turned into a daily change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Percentage change of a price level.
    #[display("pct")]
    Percent,
    /// Difference of a yield quoted in percent, expressed in basis points.
    #[display("bp")]
    BasisPoints,
}

/// Any known series: an asset or a factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Serialize, Deserialize)]
pub enum Instrument {
    /// A regressed asset.
    Asset(Asset),
    /// A regressor factor.
    Factor(Factor),
}

impl Instrument {
    /// Every known instrument: assets first, then factors.
    pub const ALL: [Self; 7] = [
        Self::Asset(Asset::EuroStoxx50),
        Self::Asset(Asset::Eufn),
        Self::Asset(Asset::Xlu),
        Self::Asset(Asset::Sp500),
        Self::Factor(Factor::EurUsd),
        Self::Factor(Factor::BundBp),
        Self::Factor(Factor::Ust10yBp),
    ];

    /// Column name of the instrument's change series.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Asset(asset) => asset.name(),
            Self::Factor(factor) => factor.name(),
        }
    }

    /// Column name of the price level the change series is derived from.
    #[must_use]
    pub const fn price_name(self) -> &'static str {
        match self {
            Self::Factor(Factor::BundBp) => "BUND",
            Self::Factor(Factor::Ust10yBp) => "UST10Y",
            other => other.name(),
        }
    }

    /// Change convention of the instrument.
    #[must_use]
    pub const fn change_kind(self) -> ChangeKind {
        match self {
            Self::Factor(Factor::BundBp | Factor::Ust10yBp) => ChangeKind::BasisPoints,
            Self::Asset(_) | Self::Factor(Factor::EurUsd) => ChangeKind::Percent,
        }
    }

    /// Look up an instrument by its change column name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.name() == name)
    }

    /// Look up an instrument by its price column name.
    #[must_use]
    pub fn from_price_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.price_name() == name)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_use_basis_points() {
        assert_eq!(Instrument::from(Factor::BundBp).change_kind(), ChangeKind::BasisPoints);
        assert_eq!(Instrument::from(Factor::Ust10yBp).change_kind(), ChangeKind::BasisPoints);
        assert_eq!(Instrument::from(Factor::EurUsd).change_kind(), ChangeKind::Percent);
        assert_eq!(Instrument::from(Asset::Xlu).change_kind(), ChangeKind::Percent);
    }

    #[test]
    fn price_names_differ_only_for_rates() {
        assert_eq!(Instrument::from(Factor::Ust10yBp).price_name(), "UST10Y");
        assert_eq!(Instrument::from(Factor::BundBp).price_name(), "BUND");
        assert_eq!(Instrument::from(Asset::Eufn).price_name(), "EUFN");
        assert_eq!(Instrument::from_price_name("UST10Y"), Some(Factor::Ust10yBp.into()));
        assert_eq!(Instrument::from_price_name("UST10Y_BP"), None);
    }

    #[test]
    fn change_kind_display() {
        assert_eq!(ChangeKind::Percent.to_string(), "pct");
        assert_eq!(ChangeKind::BasisPoints.to_string(), "bp");
    }
}
