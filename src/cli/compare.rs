use clap::Args;

use crate::cli::load_for_view;
use crate::config::Settings;
use crate::dataset::{Dataset, DatasetLoader};
use crate::input::DatasetSource;
use crate::report::comparison::{RadarComparison, Selection, default_selections};
use crate::report::json::comparison_json;
use crate::report::text::render_comparison;

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// First country (defaults to the configured primary)
    #[arg(long)]
    pub(crate) country1: Option<String>,

    /// Year for the first country (defaults to its most recent year)
    #[arg(long)]
    pub(crate) year1: Option<i32>,

    /// Second country (defaults to the configured secondary)
    #[arg(long)]
    pub(crate) country2: Option<String>,

    #[arg(long)]
    pub(crate) year2: Option<i32>,

    #[arg(long, value_enum, default_value = "text")]
    pub(crate) format: OutputFormat,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub async fn handle<S: DatasetSource>(
    args: CompareArgs,
    loader: &DatasetLoader<S>,
    settings: &Settings,
) -> anyhow::Result<()> {
    let dataset = load_for_view(loader).await?;
    let (primary, secondary) = select(&dataset, &args, settings)?;
    let cmp = RadarComparison::build(&dataset, primary, secondary);
    match args.format {
        OutputFormat::Text => print!("{}", render_comparison(&cmp)),
        OutputFormat::Json => println!("{}", comparison_json(&cmp)?),
    }
    Ok(())
}

pub(crate) fn select(
    dataset: &Dataset,
    args: &CompareArgs,
    settings: &Settings,
) -> anyhow::Result<(Selection, Selection)> {
    let (default1, default2) = default_selections(dataset, &settings.defaults);
    let primary = pick(dataset, args.country1.as_deref(), args.year1, default1)?;
    let secondary = pick(dataset, args.country2.as_deref(), args.year2, default2)?;
    Ok((primary, secondary))
}

fn pick(
    dataset: &Dataset,
    country: Option<&str>,
    year: Option<i32>,
    fallback: Selection,
) -> anyhow::Result<Selection> {
    let country = match country {
        Some(c) => c,
        None => fallback.country.as_str(),
    };
    if dataset.years_for(country).is_empty() {
        let suggestions = dataset.search_countries(country);
        if suggestions.is_empty() {
            anyhow::bail!("no data for country: {country}");
        }
        anyhow::bail!(
            "no data for country: {country} (did you mean: {})",
            suggestions.join(", ")
        );
    }
    Ok(Selection::resolve(dataset, country, year))
}
