use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::cli::load_for_view;
use crate::dataset::DatasetLoader;
use crate::input::DatasetSource;
use crate::report::export::write_observations;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output CSV path
    #[arg(long)]
    pub(crate) out: PathBuf,
}

pub async fn handle<S: DatasetSource>(
    args: ExportArgs,
    loader: &DatasetLoader<S>,
) -> anyhow::Result<()> {
    let dataset = load_for_view(loader).await?;
    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(&args.out)?;
    write_observations(BufWriter::new(file), dataset.observations())?;
    info!(
        out = %args.out.to_string_lossy(),
        rows = dataset.len(),
        "exported observations"
    );
    Ok(())
}
