//! Factor-related type definitions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::TableError;

/// A macro factor whose daily change is used as a regressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Factor {
    /// EUR/USD spot, daily percentage change.
    #[serde(rename = "EURUSD")]
    EurUsd,
    /// 10Y Bund yield, daily change in basis points.
    #[serde(rename = "BUND_BP")]
    BundBp,
    /// 10Y US Treasury yield, daily change in basis points.
    #[serde(rename = "UST10Y_BP")]
    Ust10yBp,
}

impl Factor {
    /// Every known factor, in selection order.
    pub const ALL: [Self; 3] = [Self::EurUsd, Self::BundBp, Self::Ust10yBp];

    /// Canonical column name of the factor's change series.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EurUsd => "EURUSD",
            Self::BundBp => "BUND_BP",
            Self::Ust10yBp => "UST10Y_BP",
        }
    }

    /// Look up a factor by its canonical column name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|factor| factor.name() == name)
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Factor {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| TableError::UnknownColumn(s.to_string()))
    }
}

/// Name of the intercept regressor.
pub const CONST_PARAMETER: &str = "const";

/// A regressor of the design matrix: the intercept or one factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Parameter {
    /// The intercept (alpha).
    Const,
    /// Sensitivity to a factor (beta).
    Factor(Factor),
}

impl Parameter {
    /// Name of the parameter as it appears in the result table.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Const => CONST_PARAMETER,
            Self::Factor(factor) => factor.name(),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Factor> for Parameter {
    fn from(factor: Factor) -> Self {
        Self::Factor(factor)
    }
}

impl From<Parameter> for String {
    fn from(parameter: Parameter) -> Self {
        parameter.name().to_string()
    }
}

impl FromStr for Parameter {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == CONST_PARAMETER {
            return Ok(Self::Const);
        }
        s.parse::<Factor>().map(Self::Factor)
    }
}

impl TryFrom<String> for Parameter {
    type Error = TableError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
