pub mod loader;

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::aggregate::scale::percentile;
use crate::model::indicators::Indicator;
use crate::model::observation::{MinMax, Observation, UnkeyedRow};

pub use loader::{DatasetLoader, LoadState, default_loader};

/// Immutable country-year dataset with its derived indices.
#[derive(Debug, Clone)]
pub struct Dataset {
    observations: Vec<Observation>,
    countries: Vec<String>,
    years_by_country: HashMap<String, Vec<i32>>,
    rows_by_country: HashMap<String, BTreeMap<i32, usize>>,
    min_max: [MinMax; Indicator::COUNT],
    outcome_values: Vec<f64>,
    duplicate_keys: usize,
    unkeyed: Vec<UnkeyedRow>,
}

impl Dataset {
    /// Builds every index in one pass over `observations`.
    ///
    /// `(country_name, year)` is the lookup key; when it repeats, the later row wins
    /// and the overwrite is counted in [`Dataset::duplicate_keys`].
    pub fn from_observations(observations: Vec<Observation>) -> Dataset {
        Self::from_rows(observations, Vec::new())
    }

    /// Like [`Dataset::from_observations`], plus rows with no usable year. Those
    /// rows stay out of every lookup but feed `min_max_for` and `outcome_values`.
    pub fn from_rows(observations: Vec<Observation>, unkeyed: Vec<UnkeyedRow>) -> Dataset {
        for row in &unkeyed {
            warn!(
                country = row.country_name.as_str(),
                code = row.country_code.as_str(),
                year = row.year,
                "non-integer year, row kept out of the country-year index"
            );
        }

        let mut rows_by_country: HashMap<String, BTreeMap<i32, usize>> = HashMap::new();
        let mut duplicate_keys = 0usize;
        for (idx, obs) in observations.iter().enumerate() {
            let years = rows_by_country.entry(obs.country_name.clone()).or_default();
            if years.insert(obs.year, idx).is_some() {
                duplicate_keys += 1;
                warn!(
                    country = obs.country_name.as_str(),
                    code = obs.country_code.as_str(),
                    year = obs.year,
                    "duplicate country-year key, keeping the later row"
                );
            }
        }

        let mut countries: Vec<String> = rows_by_country.keys().cloned().collect();
        countries.sort();

        let years_by_country: HashMap<String, Vec<i32>> = rows_by_country
            .iter()
            .map(|(country, years)| (country.clone(), years.keys().copied().collect()))
            .collect();

        let min_max = Indicator::ALL.map(|ind| {
            MinMax::of_finite(
                observations
                    .iter()
                    .map(|obs| obs.indicator(ind))
                    .chain(unkeyed.iter().map(|row| row.indicators.get(ind))),
            )
        });

        let outcome_values: Vec<f64> = observations
            .iter()
            .map(|obs| obs.outcome)
            .chain(unkeyed.iter().map(|row| row.outcome))
            .filter(|v| v.is_finite())
            .collect();

        debug!(
            rows = observations.len(),
            countries = countries.len(),
            outcome_values = outcome_values.len(),
            duplicate_keys,
            unkeyed = unkeyed.len(),
            "built dataset indices"
        );

        Dataset {
            observations,
            countries,
            years_by_country,
            rows_by_country,
            min_max,
            outcome_values,
            duplicate_keys,
            unkeyed,
        }
    }

    /// Distinct country names, sorted ascending.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Years with data for `country`, ascending. Empty for an unknown country.
    pub fn years_for(&self, country: &str) -> &[i32] {
        self.years_by_country
            .get(country)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn latest_year_for(&self, country: &str) -> Option<i32> {
        self.years_for(country).last().copied()
    }

    pub fn row_for(&self, country: &str, year: i32) -> Option<&Observation> {
        let idx = self.rows_by_country.get(country)?.get(&year)?;
        self.observations.get(*idx)
    }

    /// Finite outcome scores across every row, for percentile ranking.
    pub fn outcome_values(&self) -> &[f64] {
        &self.outcome_values
    }

    pub fn min_max_for(&self, indicator: Indicator) -> MinMax {
        self.min_max[indicator.index()]
    }

    /// Inclusive-rank percentile of `value` in the outcome population.
    /// `None` when the population is empty.
    pub fn outcome_percentile(&self, value: f64) -> Option<f64> {
        if self.outcome_values.is_empty() {
            return None;
        }
        Some(percentile(value, &self.outcome_values))
    }

    /// Case-insensitive substring match over `countries()`, order preserved.
    pub fn search_countries(&self, query: &str) -> Vec<&str> {
        let needle = query.trim().to_lowercase();
        self.countries
            .iter()
            .filter(|c| needle.is_empty() || c.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Rows whose key was overwritten by a later row with the same key.
    pub fn duplicate_keys(&self) -> usize {
        self.duplicate_keys
    }

    /// Rows kept without a lookup key because their year is not an integer.
    pub fn unkeyed_rows(&self) -> &[UnkeyedRow] {
        &self.unkeyed
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/dataset/mod.rs"]
mod tests;
