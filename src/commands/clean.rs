//! Clean the public directory

use anyhow::{Context, Result};
use std::fs;

use crate::Quill;

/// Remove everything `generate` wrote
pub fn run(quill: &Quill) -> Result<()> {
    if quill.public_dir.exists() {
        fs::remove_dir_all(&quill.public_dir)
            .with_context(|| format!("removing {}", quill.public_dir.display()))?;
        tracing::info!("Deleted: {:?}", quill.public_dir);
    }

    Ok(())
}
