//! Recommendation report persistence

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rightsize_lib::models::Recommendation;

/// Serialize the run's recommendations to a timestamped JSON file in
/// `dir` and return the file's absolute path.
pub fn write_recommendations(
    recommendations: &[Recommendation],
    dir: &Path,
) -> Result<PathBuf> {
    let data = serde_json::to_string_pretty(recommendations)
        .context("failed to serialize recommendations")?;

    let filename = format!(
        "recommendations-{}.json",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let path = dir.join(filename);

    std::fs::write(&path, data)
        .with_context(|| format!("failed to write {}", path.display()))?;

    path.canonicalize()
        .with_context(|| format!("failed to resolve {}", path.display()))
}
