use std::io::Write;

use crate::model::indicators::{Indicator, OUTCOME_KEY};
use crate::model::observation::Observation;

fn cell(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        String::new()
    }
}

/// Writes the joined table; NaN cells are left empty.
pub fn write_observations<W: Write>(writer: W, observations: &[Observation]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["country_name", "country_code", "year"];
    header.extend(Indicator::ALL.iter().map(|ind| ind.key()));
    header.push(OUTCOME_KEY);
    wtr.write_record(&header)?;

    for obs in observations {
        let mut record = vec![
            obs.country_name.clone(),
            obs.country_code.clone(),
            obs.year.to_string(),
        ];
        record.extend(obs.indicators.iter().map(|(_, v)| cell(v)));
        record.push(cell(obs.outcome));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/export.rs"]
mod tests;
