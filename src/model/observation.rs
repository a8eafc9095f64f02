use serde::{Deserialize, Serialize};

use crate::aggregate::scale::normalize;
use crate::model::indicators::Indicator;

/// One value per indicator. NaN marks a value that could not be coerced.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorValues {
    #[serde(rename = "COM")]
    pub com: f64,
    #[serde(rename = "OMP")]
    pub omp: f64,
    #[serde(rename = "PEC")]
    pub pec: f64,
    #[serde(rename = "GD")]
    pub gd: f64,
    #[serde(rename = "PD")]
    pub pd: f64,
    #[serde(rename = "OMF")]
    pub omf: f64,
    #[serde(rename = "SMV")]
    pub smv: f64,
}

impl IndicatorValues {
    pub fn get(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Com => self.com,
            Indicator::Omp => self.omp,
            Indicator::Pec => self.pec,
            Indicator::Gd => self.gd,
            Indicator::Pd => self.pd,
            Indicator::Omf => self.omf,
            Indicator::Smv => self.smv,
        }
    }

    pub fn set(&mut self, indicator: Indicator, value: f64) {
        let slot = match indicator {
            Indicator::Com => &mut self.com,
            Indicator::Omp => &mut self.omp,
            Indicator::Pec => &mut self.pec,
            Indicator::Gd => &mut self.gd,
            Indicator::Pd => &mut self.pd,
            Indicator::Omf => &mut self.omf,
            Indicator::Smv => &mut self.smv,
        };
        *slot = value;
    }

    pub fn from_fn(mut f: impl FnMut(Indicator) -> f64) -> Self {
        let mut values = Self::default();
        for indicator in Indicator::ALL {
            values.set(indicator, f(indicator));
        }
        values
    }

    pub fn iter(&self) -> impl Iterator<Item = (Indicator, f64)> + '_ {
        Indicator::ALL.into_iter().map(|ind| (ind, self.get(ind)))
    }
}

/// A single country-year record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub country_name: String,
    pub country_code: String,
    pub year: i32,
    #[serde(flatten)]
    pub indicators: IndicatorValues,
    #[serde(rename = "EDI")]
    pub outcome: f64,
}

impl Observation {
    pub fn indicator(&self, indicator: Indicator) -> f64 {
        self.indicators.get(indicator)
    }
}

/// A joined row whose year is not an integer. It has no lookup key, but its
/// finite values still count toward ranges and the outcome population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnkeyedRow {
    pub country_name: String,
    pub country_code: String,
    /// Year cell as coerced; NaN when unreadable.
    pub year: f64,
    #[serde(flatten)]
    pub indicators: IndicatorValues,
    #[serde(rename = "EDI")]
    pub outcome: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    /// Used when a column has no finite values at all.
    pub const FALLBACK: MinMax = MinMax { min: 0.0, max: 1.0 };

    pub fn normalize(&self, value: f64) -> f64 {
        normalize(value, self.min, self.max)
    }

    /// Running min/max over finite values, `FALLBACK` when nothing finite was seen.
    pub fn of_finite(values: impl IntoIterator<Item = f64>) -> MinMax {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            if !v.is_finite() {
                continue;
            }
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        if min.is_finite() && max.is_finite() {
            MinMax { min, max }
        } else {
            MinMax::FALLBACK
        }
    }
}
