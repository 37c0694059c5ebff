//! Batch manifests: a JSON array of [`PublishItem`]s on disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::post::types::PublishItem;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load a manifest. Relative filenames are resolved against the manifest's directory.
pub fn load_manifest(path: &Path) -> Result<Vec<PublishItem>, ManifestError> {
    let content = fs::read_to_string(path)?;
    let mut items: Vec<PublishItem> = serde_json::from_str(&content)?;

    if let Some(base) = path.parent() {
        for item in &mut items {
            let file = Path::new(&item.filename);
            if file.is_relative() {
                item.filename = base.join(file).to_string_lossy().into_owned();
            }
        }
    }

    tracing::debug!(path = ?path, items = items.len(), "Manifest loaded");
    Ok(items)
}
