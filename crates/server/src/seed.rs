use std::{fs, path::Path};

use anyhow::Context;
use shared::protocol::QuestionGroupsResponse;
use storage::Storage;
use tracing::info;

/// Imports the question bank at `path` when the database holds no questions yet.
///
/// The file uses the same shape as the `GET /api/questions` body. Returns the
/// number of questions imported.
pub async fn seed_if_empty(storage: &Storage, path: &Path) -> anyhow::Result<usize> {
    let existing = storage.count_questions().await?;
    if existing > 0 {
        info!(existing, "question bank already populated; skipping seed");
        return Ok(0);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file '{}'", path.display()))?;
    let payload: QuestionGroupsResponse = serde_json::from_str(&raw)
        .with_context(|| format!("seed file '{}' is not a questions payload", path.display()))?;
    let groups = payload.groups.without_empty_groups();
    groups
        .validate()
        .with_context(|| format!("seed file '{}' is inconsistent", path.display()))?;

    let imported = storage.import_groups(&groups).await?;
    info!(imported, path = %path.display(), "seeded question bank");
    Ok(imported)
}

#[cfg(test)]
#[path = "tests/seed_tests.rs"]
mod tests;
