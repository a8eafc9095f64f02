use std::fmt;

use serde::{Deserialize, Serialize};

/// Column holding the democracy outcome score in `vdem_variables`.
pub const OUTCOME_KEY: &str = "EDI";
pub const OUTCOME_LABEL: &str = "Electoral Democracy Index";

/// The seven digital society practice indicators, in radar-axis order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Indicator {
    #[serde(rename = "COM")]
    Com,
    #[serde(rename = "OMP")]
    Omp,
    #[serde(rename = "PEC")]
    Pec,
    #[serde(rename = "GD")]
    Gd,
    #[serde(rename = "PD")]
    Pd,
    #[serde(rename = "OMF")]
    Omf,
    #[serde(rename = "SMV")]
    Smv,
}

impl Indicator {
    pub const ALL: [Indicator; 7] = [
        Indicator::Com,
        Indicator::Omp,
        Indicator::Pec,
        Indicator::Gd,
        Indicator::Pd,
        Indicator::Omf,
        Indicator::Smv,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Column name in `dsp_variables`.
    pub fn key(self) -> &'static str {
        match self {
            Indicator::Com => "COM",
            Indicator::Omp => "OMP",
            Indicator::Pec => "PEC",
            Indicator::Gd => "GD",
            Indicator::Pd => "PD",
            Indicator::Omf => "OMF",
            Indicator::Smv => "SMV",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Indicator::Com => "Online Media Consumption",
            Indicator::Omp => "Online Media Perspectives",
            Indicator::Pec => "Political/Election Communication",
            Indicator::Gd => "Government Disinformation",
            Indicator::Pd => "Party Disinformation",
            Indicator::Omf => "Online Media Fractionalization",
            Indicator::Smv => "Social Media Violence",
        }
    }

    /// Harm-type indicators are coded so that a higher value means less of the harm.
    pub fn higher_is_less_harm(self) -> bool {
        matches!(
            self,
            Indicator::Gd | Indicator::Pd | Indicator::Omf | Indicator::Smv
        )
    }

    pub fn from_key(key: &str) -> Option<Indicator> {
        Self::ALL
            .into_iter()
            .find(|ind| ind.key().eq_ignore_ascii_case(key.trim()))
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/indicators.rs"]
mod tests;
