//! Persisting rendered letters.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes one letter per attendee into an output directory.
#[derive(Debug, Clone)]
pub struct LetterWriter {
    output_dir: PathBuf,
}

impl LetterWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Location of the letter for `id`.
    pub fn letter_path(&self, id: &str) -> PathBuf {
        self.output_dir.join(format!("thanks_{}.html", id))
    }

    /// Save a letter, creating the output directory on first use and
    /// overwriting any earlier letter for the same id.
    pub fn save(&self, id: &str, letter: &str) -> Result<PathBuf> {
        if !self.output_dir.exists() {
            std::fs::create_dir_all(&self.output_dir).with_context(|| {
                format!(
                    "Failed to create output directory {}",
                    self.output_dir.display()
                )
            })?;
        }

        let path = self.letter_path(id);
        let mut content = letter.to_string();
        if !content.ends_with('\n') {
            content.push('\n');
        }

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write letter to {}", path.display()))?;
        debug!("Saved letter {}", path.display());

        Ok(path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
