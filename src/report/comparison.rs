use serde::Serialize;

use crate::config::ComparisonDefaults;
use crate::dataset::Dataset;
use crate::model::indicators::Indicator;
use crate::model::observation::Observation;

pub const RADIAL_TICKS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

pub fn radial_tick_label(tick: f64) -> &'static str {
    match tick {
        t if t == 0.0 => "Min",
        t if t == 0.25 => "25%",
        t if t == 0.5 => "50%",
        t if t == 0.75 => "75%",
        t if t == 1.0 => "Max",
        _ => "",
    }
}

/// A country plus the year shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub country: String,
    pub year: Option<i32>,
}

impl Selection {
    /// Keeps `year` when the country has data for it, otherwise picks the most recent year.
    pub fn resolve(dataset: &Dataset, country: &str, year: Option<i32>) -> Selection {
        let years = dataset.years_for(country);
        let year = match year {
            Some(y) if years.contains(&y) => Some(y),
            _ => years.last().copied(),
        };
        Selection {
            country: country.to_string(),
            year,
        }
    }

    pub fn label(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.country, year),
            None => self.country.clone(),
        }
    }
}

pub fn default_selections(
    dataset: &Dataset,
    defaults: &ComparisonDefaults,
) -> (Selection, Selection) {
    let countries = dataset.countries();
    let has = |name: &str| countries.iter().any(|c| c == name);

    let primary = if has(&defaults.primary) {
        defaults.primary.clone()
    } else {
        countries.first().cloned().unwrap_or_default()
    };
    let secondary = if has(&defaults.secondary) {
        defaults.secondary.clone()
    } else {
        countries
            .get(1)
            .or_else(|| countries.first())
            .cloned()
            .unwrap_or_default()
    };

    (
        Selection::resolve(dataset, &primary, None),
        Selection::resolve(dataset, &secondary, None),
    )
}

/// One spoke of the radar: normalized values for plotting, raw values for the tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    pub key: Indicator,
    pub label: &'static str,
    pub primary: f64,
    pub secondary: f64,
    pub primary_raw: f64,
    pub secondary_raw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeCard {
    pub country: String,
    pub year: i32,
    pub score: f64,
    pub percentile: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarComparison {
    pub primary: Selection,
    pub secondary: Selection,
    /// Empty unless both sides resolved to a row.
    pub axes: Vec<RadarAxis>,
    pub primary_card: Option<OutcomeCard>,
    pub secondary_card: Option<OutcomeCard>,
}

impl RadarComparison {
    pub fn build(dataset: &Dataset, primary: Selection, secondary: Selection) -> RadarComparison {
        let row1 = primary.year.and_then(|y| dataset.row_for(&primary.country, y));
        let row2 = secondary
            .year
            .and_then(|y| dataset.row_for(&secondary.country, y));

        let axes = match (row1, row2) {
            (Some(r1), Some(r2)) => Indicator::ALL
                .into_iter()
                .map(|ind| {
                    let range = dataset.min_max_for(ind);
                    RadarAxis {
                        key: ind,
                        label: ind.label(),
                        primary: range.normalize(r1.indicator(ind)),
                        secondary: range.normalize(r2.indicator(ind)),
                        primary_raw: r1.indicator(ind),
                        secondary_raw: r2.indicator(ind),
                    }
                })
                .collect(),
            _ => Vec::new(),
        };

        let card = |row: Option<&Observation>| {
            row.map(|r| OutcomeCard {
                country: r.country_name.clone(),
                year: r.year,
                score: r.outcome,
                percentile: if r.outcome.is_finite() {
                    dataset.outcome_percentile(r.outcome)
                } else {
                    None
                },
            })
        };

        RadarComparison {
            primary_card: card(row1),
            secondary_card: card(row2),
            primary,
            secondary,
            axes,
        }
    }

    pub fn has_chart(&self) -> bool {
        !self.axes.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/comparison.rs"]
mod tests;
