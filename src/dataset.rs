//! Reference dataset summary.
//!
//! The dataset the model was trained on ships alongside the artifact but is
//! never consulted by the prediction path; it is summarized once at startup
//! for the health endpoint and the startup log. A missing file is a
//! warning, not a failure.

use anyhow::Context;
use std::path::{Path, PathBuf};

/// Header and row count of the reference dataset file.
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub path: PathBuf,
    pub columns: Vec<String>,
    pub rows: usize,
}

impl DatasetSummary {
    /// Reads the file and summarizes its header and data row count.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reference dataset not found at path: {}", path.display()))?;

        let mut lines = content.lines();
        let header = lines
            .next()
            .with_context(|| format!("reference dataset at {} is empty", path.display()))?;

        let columns: Vec<String> = header.split(',').map(|c| c.trim().to_string()).collect();
        let rows = lines.filter(|l| !l.trim().is_empty()).count();

        Ok(Self {
            path: path.to_path_buf(),
            columns,
            rows,
        })
    }

    /// Loads the summary, demoting any failure to a warning.
    pub fn load_optional(path: impl AsRef<Path>) -> Option<Self> {
        match Self::load(path) {
            Ok(summary) => {
                tracing::info!(
                    "Reference dataset loaded: {} ({} rows, {} columns)",
                    summary.path.display(),
                    summary.rows,
                    summary.columns.len()
                );
                Some(summary)
            }
            Err(e) => {
                tracing::warn!("Reference dataset unavailable: {:#}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn summarizes_header_and_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Age,Gender,Annual Income,Premium Amount").unwrap();
        writeln!(file, "30,0,50000,1250.0").unwrap();
        writeln!(file, "45,1,80000,1810.5").unwrap();
        file.flush().unwrap();

        let summary = DatasetSummary::load(file.path()).unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.columns[0], "Age");
        assert_eq!(summary.columns.len(), 4);
    }

    #[test]
    fn missing_file_is_an_error_with_the_path() {
        let err = DatasetSummary::load("/nope/data.csv").unwrap_err();
        assert!(format!("{:#}", err).contains("/nope/data.csv"));
    }

    #[test]
    fn load_optional_swallows_missing_file() {
        assert!(DatasetSummary::load_optional("/nope/data.csv").is_none());
    }
}
