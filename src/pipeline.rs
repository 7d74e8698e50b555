// src/pipeline.rs

use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

use crate::{
    error::{Error, Result},
    fetch::Fetcher,
    types::Category,
    write::write_item,
};

/// What a completed run wrote, per category in processing order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub written: Vec<(Category, Vec<PathBuf>)>,
}

impl RunSummary {
    pub fn total_files(&self) -> usize {
        self.written.iter().map(|(_, files)| files.len()).sum()
    }
}

/// Fetch experiments then datasets and write one CSV per item into
/// `output_dir`, creating it if needed.
///
/// The first error stops the run. Files already written for an earlier
/// category stay on disk.
pub async fn run(fetcher: &Fetcher, output_dir: &Path) -> Result<RunSummary> {
    fs::create_dir_all(output_dir).map_err(|e| Error::write(output_dir, e))?;

    let mut summary = RunSummary {
        output_dir: output_dir.to_path_buf(),
        written: Vec::with_capacity(Category::ALL.len()),
    };

    for category in Category::ALL {
        let files = download_category(fetcher, category, output_dir).await?;
        summary.written.push((category, files));
    }

    info!(
        dir = %output_dir.display(),
        files = summary.total_files(),
        "run complete"
    );
    Ok(summary)
}

#[instrument(level = "info", skip(fetcher, output_dir))]
async fn download_category(
    fetcher: &Fetcher,
    category: Category,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let items = fetcher.fetch(category).await?;

    let mut files = Vec::with_capacity(items.len());
    for item in &items {
        files.push(write_item(item, category, output_dir)?);
    }

    info!(count = files.len(), "wrote {} files", category);
    Ok(files)
}
