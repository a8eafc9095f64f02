use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::resolve_settings;
use crate::dataset::{Dataset, DatasetLoader};
use crate::input::{DatasetSource, FileSource};
use crate::view::ViewScope;

mod compare;
mod countries;
mod export;
mod validate;

#[derive(Parser, Debug)]
#[command(
    name = "dsp-radar",
    version,
    about = "Digital society practice radar comparison"
)]
pub struct Cli {
    /// Dataset artifact (SQLite, optionally gzip-compressed)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Optional TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Countries(countries::CountriesArgs),
    Years(countries::YearsArgs),
    Compare(compare::CompareArgs),
    Validate(validate::ValidateArgs),
    Export(export::ExportArgs),
}

impl Cli {
    pub async fn dispatch(self) -> anyhow::Result<()> {
        let settings = resolve_settings(self.config.as_deref())?;
        let loader = DatasetLoader::new(FileSource::new(
            settings.dataset_path(self.dataset.as_deref()),
        ));
        match self.command {
            Command::Countries(args) => countries::handle_countries(args, &loader).await,
            Command::Years(args) => countries::handle_years(args, &loader).await,
            Command::Compare(args) => compare::handle(args, &loader, &settings).await,
            Command::Validate(args) => validate::handle(args, &loader).await,
            Command::Export(args) => export::handle(args, &loader).await,
        }
    }
}

/// Loads the dataset inside a view scope owned by the running command.
pub(crate) async fn load_for_view<S: DatasetSource>(
    loader: &DatasetLoader<S>,
) -> anyhow::Result<Arc<Dataset>> {
    let scope = ViewScope::new();
    let resource = loader.resource();
    info!(resource = resource.as_str(), "loading dataset");
    match scope.guard().resolve(&resource, loader.load()).await {
        Some(Ok(dataset)) => Ok(dataset),
        Some(Err(message)) => anyhow::bail!(message),
        None => anyhow::bail!("view closed before {resource} finished loading"),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/cli/mod.rs"]
mod tests;
