use std::time::Instant;

use clap::Args;
use tracing::info;

use crate::cli::load_for_view;
use crate::dataset::{Dataset, DatasetLoader};
use crate::input::DatasetSource;
use crate::report::text::render_summary;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Exit with an error on duplicate country-year keys or rows without an integer year
    #[arg(long, default_value_t = false)]
    pub(crate) strict: bool,
}

pub async fn handle<S: DatasetSource>(
    args: ValidateArgs,
    loader: &DatasetLoader<S>,
) -> anyhow::Result<()> {
    let start = Instant::now();
    info!(stage = "validate", "starting stage");
    let dataset = load_for_view(loader).await?;
    print!("{}", render_summary(&loader.resource(), &dataset));
    info!(
        stage = "validate",
        elapsed_ms = start.elapsed().as_millis(),
        "finished stage"
    );
    if args.strict {
        strict_check(&dataset)?;
    }
    Ok(())
}

pub(crate) fn strict_check(dataset: &Dataset) -> anyhow::Result<()> {
    if dataset.duplicate_keys() > 0 {
        anyhow::bail!(
            "{} duplicate country-year keys (later rows were kept)",
            dataset.duplicate_keys()
        );
    }
    let unkeyed = dataset.unkeyed_rows().len();
    if unkeyed > 0 {
        anyhow::bail!("{unkeyed} rows have a non-integer year and are not addressable");
    }
    Ok(())
}
