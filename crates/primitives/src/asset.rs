//! Asset type definitions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::TableError;

/// An asset whose daily returns are regressed on the macro factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    /// Euro Stoxx 50 index.
    #[serde(rename = "EUROSTOXX50")]
    EuroStoxx50,
    /// iShares MSCI Europe Financials ETF.
    #[serde(rename = "EUFN")]
    Eufn,
    /// Utilities Select Sector SPDR ETF.
    #[serde(rename = "XLU")]
    Xlu,
    /// S&P 500 index.
    #[serde(rename = "SP500")]
    Sp500,
}

impl Asset {
    /// Every known asset, in selection order.
    pub const ALL: [Self; 4] = [Self::EuroStoxx50, Self::Eufn, Self::Xlu, Self::Sp500];

    /// Canonical column name of the asset.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EuroStoxx50 => "EUROSTOXX50",
            Self::Eufn => "EUFN",
            Self::Xlu => "XLU",
            Self::Sp500 => "SP500",
        }
    }

    /// Look up an asset by its canonical column name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|asset| asset.name() == name)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Asset {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| TableError::UnknownColumn(s.to_string()))
    }
}
