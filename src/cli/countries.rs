use clap::Args;

use crate::cli::load_for_view;
use crate::dataset::DatasetLoader;
use crate::input::DatasetSource;

#[derive(Args, Debug)]
pub struct CountriesArgs {
    /// Case-insensitive substring filter
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(Args, Debug)]
pub struct YearsArgs {
    #[arg(long)]
    pub(crate) country: String,
}

pub async fn handle_countries<S: DatasetSource>(
    args: CountriesArgs,
    loader: &DatasetLoader<S>,
) -> anyhow::Result<()> {
    let dataset = load_for_view(loader).await?;
    let matches = dataset.search_countries(args.search.as_deref().unwrap_or(""));
    if matches.is_empty() {
        println!("No country found.");
        return Ok(());
    }
    println!("country\tfirst_year\tlast_year\tn_years");
    for country in matches {
        let years = dataset.years_for(country);
        let (first, last) = match (years.first(), years.last()) {
            (Some(f), Some(l)) => (f.to_string(), l.to_string()),
            _ => (String::new(), String::new()),
        };
        println!("{country}\t{first}\t{last}\t{}", years.len());
    }
    Ok(())
}

pub async fn handle_years<S: DatasetSource>(
    args: YearsArgs,
    loader: &DatasetLoader<S>,
) -> anyhow::Result<()> {
    let dataset = load_for_view(loader).await?;
    let years = dataset.years_for(&args.country);
    if years.is_empty() {
        anyhow::bail!("no data for country: {}", args.country);
    }
    for year in years {
        println!("{year}");
    }
    Ok(())
}
