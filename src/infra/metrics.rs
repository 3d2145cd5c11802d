// ============================================================
// Layer 6 — Loss History Logger
// ============================================================
// Records the training loss curves of iterative models to a CSV
// file so they can be plotted after the run.
//
// Only models that train in epochs report a loss curve; the
// closed-form and tree models leave nothing here.
//
// Output file: workspace/loss_history.csv
//
// Example CSV output:
//   model,epoch,loss
//   Neural Network,0,0.498211
//   Neural Network,20,0.211034
//   ...
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

pub const LOSS_FILE: &str = "loss_history.csv";

/// Appends (model, epoch, loss) rows to a CSV file.
pub struct LossLogger {
    csv_path: PathBuf,
}

impl LossLogger {
    /// Start a fresh log in `dir`, replacing any previous run's file.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;

        let csv_path = dir.join(LOSS_FILE);
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "model,epoch,loss")?;
        tracing::debug!("Created loss CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    pub fn log(&self, model: &str, epoch: usize, loss: f64) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot append to '{}'", self.csv_path.display()))?;

        writeln!(f, "{},{},{:.6}", model, epoch, loss)?;
        Ok(())
    }

    /// Log a whole curve; returns how many rows were written.
    pub fn log_history(&self, model: &str, history: &[(usize, f64)]) -> Result<usize> {
        for &(epoch, loss) in history {
            self.log(model, epoch, loss)?;
        }
        if !history.is_empty() {
            tracing::debug!("Logged {} loss points for {}", history.len(), model);
        }
        Ok(history.len())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_written_once_and_rows_appended() {
        let dir = tempfile::tempdir().unwrap();
        let logger = LossLogger::create(dir.path()).unwrap();

        let n = logger.log_history("Neural Network", &[(0, 0.5), (20, 0.25)]).unwrap();
        assert_eq!(n, 2);
        logger.log_history("Linear Regression", &[]).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["model,epoch,loss", "Neural Network,0,0.500000", "Neural Network,20,0.250000"]);
    }

    #[test]
    fn test_create_replaces_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        LossLogger::create(dir.path()).unwrap().log("a", 1, 1.0).unwrap();

        let logger = LossLogger::create(dir.path()).unwrap();
        let text = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
