use crate::dataset::Dataset;
use crate::model::indicators::{Indicator, OUTCOME_KEY, OUTCOME_LABEL};
use crate::report::comparison::{OutcomeCard, RADIAL_TICKS, RadarComparison, radial_tick_label};

const BAR_WIDTH: usize = 20;

/// Three decimals, or an em dash for a missing value.
pub fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.3}")
    } else {
        "\u{2014}".to_string()
    }
}

pub fn render_comparison(cmp: &RadarComparison) -> String {
    let mut out = String::new();
    out.push_str("DSP Variables Comparison\n");
    out.push_str("========================\n\n");
    out.push_str(&format!("Country 1: {}\n", cmp.primary.label()));
    out.push_str(&format!("Country 2: {}\n\n", cmp.secondary.label()));

    if cmp.has_chart() {
        let scale: Vec<String> = RADIAL_TICKS
            .iter()
            .map(|t| radial_tick_label(*t).to_string())
            .collect();
        out.push_str(&format!("Radial scale: {}\n\n", scale.join(" | ")));
        for axis in &cmp.axes {
            out.push_str(&format!("{} ({})\n", axis.label, axis.key));
            out.push_str(&format!(
                "  1 {} Value: {}  Normalized: {}\n",
                bar(axis.primary),
                format_value(axis.primary_raw),
                format_value(axis.primary)
            ));
            out.push_str(&format!(
                "  2 {} Value: {}  Normalized: {}\n",
                bar(axis.secondary),
                format_value(axis.secondary_raw),
                format_value(axis.secondary)
            ));
        }
        out.push('\n');
    } else {
        out.push_str("No data for the selected country-year pair.\n\n");
    }

    out.push_str(&format!("{OUTCOME_KEY}\n"));
    for card in [&cmp.primary_card, &cmp.secondary_card].into_iter().flatten() {
        out.push_str(&render_card(card));
    }
    out.push_str(&format!(
        "{OUTCOME_KEY} measures electoral democracy (0-1). Higher = stronger democracy.\n"
    ));
    out
}

fn render_card(card: &OutcomeCard) -> String {
    let percentile = match card.percentile {
        Some(p) => format!("{p:.1}% percentile"),
        None => "percentile unavailable".to_string(),
    };
    format!(
        "- {} ({}): {} score {}, {}\n",
        card.country,
        card.year,
        OUTCOME_KEY,
        format_value(card.score),
        percentile
    )
}

fn bar(normalized: f64) -> String {
    let filled = if normalized.is_finite() {
        (normalized.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

pub fn render_summary(resource: &str, dataset: &Dataset) -> String {
    let mut out = String::new();
    out.push_str(&format!("resource\t{resource}\n"));
    out.push_str(&format!("rows\t{}\n", dataset.len()));
    out.push_str(&format!("countries\t{}\n", dataset.countries().len()));
    out.push_str(&format!("duplicate_keys\t{}\n", dataset.duplicate_keys()));
    out.push_str(&format!("unkeyed_rows\t{}\n", dataset.unkeyed_rows().len()));
    out.push_str(&format!(
        "outcome_values\t{}\n",
        dataset.outcome_values().len()
    ));
    let year_span = dataset
        .observations()
        .iter()
        .map(|o| o.year)
        .fold(None, |acc: Option<(i32, i32)>, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        });
    if let Some((lo, hi)) = year_span {
        out.push_str(&format!("years\t{lo}-{hi}\n"));
    }
    out.push_str("indicator\tmin\tmax\tlabel\n");
    for ind in Indicator::ALL {
        let range = dataset.min_max_for(ind);
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            ind.key(),
            format_value(range.min),
            format_value(range.max),
            ind.label()
        ));
    }
    out.push_str(&format!("outcome\t{OUTCOME_KEY}\t{OUTCOME_LABEL}\n"));
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
