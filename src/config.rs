// src/config.rs

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use url::Url;

use crate::{
    error::{Error, Result},
    types::check_path_component,
};

pub const DEFAULT_BASE_URL: &str = "https://api.example.com/projects";
pub const DEFAULT_OUTPUT_ROOT: &str = "output";

/// Everything a run needs, resolved up front and passed down explicitly.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: Url,
    pub project_id: String,
    pub api_key: String,
    /// Directory the CSVs land in.
    pub output_dir: PathBuf,
}

impl Config {
    /// Validate raw settings. An absent `output_dir` becomes
    /// `<output_root>/<project_id>_<YYYYmmdd_HHMMSS>` stamped with `now`.
    pub fn new(
        base_url: &str,
        project_id: Option<String>,
        api_key: Option<String>,
        output_root: &Path,
        output_dir: Option<PathBuf>,
        now: DateTime<Local>,
    ) -> Result<Self> {
        let project_id = non_empty(project_id, "project id")?;
        // it names the output directory
        check_path_component(&project_id)
            .map_err(|why| Error::config(format!("project id {:?}: {}", project_id, why)))?;
        let api_key = non_empty(api_key, "API key")?;

        let base_url = Url::parse(base_url)
            .map_err(|e| Error::config(format!("invalid base URL {:?}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base URL must be an http(s) URL, got {}",
                base_url
            )));
        }

        let output_dir =
            output_dir.unwrap_or_else(|| timestamped_output_dir(output_root, &project_id, now));

        Ok(Config {
            base_url,
            project_id,
            api_key,
            output_dir,
        })
    }
}

fn non_empty(value: Option<String>, what: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::config(format!("missing {}", what))),
    }
}

/// `<root>/<project_id>_<YYYYmmdd_HHMMSS>`
pub fn timestamped_output_dir(root: &Path, project_id: &str, now: DateTime<Local>) -> PathBuf {
    let ts = now.format("%Y%m%d_%H%M%S");
    root.join(format!("{}_{}", project_id, ts))
}
