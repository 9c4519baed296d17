// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::parser::models::ParsedDocument;
use crate::utils::error::StorageError;

/// Owns the output directory and derives the per-report output paths:
/// `report.pdf` yields `report.xlsx`, `report_report.pdf` and
/// `report_summary.json`.
pub struct OutputManager {
    base_dir: PathBuf,
}

impl OutputManager {
    /// Creates a new OutputManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self {
            base_dir: base_path,
        })
    }

    fn stem(input: &Path) -> &str {
        input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output")
    }

    pub fn excel_path(&self, input: &Path) -> PathBuf {
        self.base_dir.join(format!("{}.xlsx", Self::stem(input)))
    }

    pub fn report_path(&self, input: &Path) -> PathBuf {
        self.base_dir
            .join(format!("{}_report.pdf", Self::stem(input)))
    }

    pub fn summary_path(&self, input: &Path) -> PathBuf {
        self.base_dir
            .join(format!("{}_summary.json", Self::stem(input)))
    }

    pub fn debug_text_path(&self, input: &Path, suffix: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}_{}.txt", Self::stem(input), suffix))
    }

    /// Saves the machine-readable summary of a parse: the full group/record
    /// structure plus counts and an extraction timestamp.
    pub fn save_summary(
        &self,
        input: &Path,
        doc: &ParsedDocument,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.summary_path(input);

        let summary = serde_json::json!({
            "source_file": input.file_name().and_then(|n| n.to_str()),
            "group_count": doc.groups.len(),
            "source_count": doc.record_count(),
            "groups": &doc.groups,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let summary_str = serde_json::to_string_pretty(&summary)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, summary_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved summary to {}", file_path.display());

        Ok(file_path)
    }
}
