// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Reads a previously processed dataset from CSV, and writes
// feature tables back out in the same layout.
//
// Expected layout:
//
//   NDVI,Canopy_Cover_Percent,Soil_Carbon_Percent,Carbon_Sequestration_tCO2e_ha
//   0.512,43.1,2.7,41.9
//   ...
//
// Every column other than the target is treated as a feature,
// in header order, so extra engineered columns are picked up
// without code changes.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::domain::sample::{CarbonSample, FeatureTable, TARGET};
use crate::domain::traits::SampleSource;

/// Loads a feature table from a CSV file.
/// Implements the SampleSource trait from Layer 3.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl SampleSource for CsvLoader {
    fn load(&self) -> Result<FeatureTable> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .with_context(|| format!("Cannot open dataset '{}'", self.path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Cannot read header of '{}'", self.path.display()))?
            .clone();

        let Some(target_idx) = headers.iter().position(|h| h == TARGET) else {
            bail!("'{}' has no '{}' column", self.path.display(), TARGET);
        };

        let feature_names: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != target_idx)
            .map(|(_, h)| h.to_string())
            .collect();

        let mut samples = Vec::new();
        for (row, record) in reader.records().enumerate() {
            // +2: one for the header, one for 1-based line numbers
            let line = row + 2;
            let record = record
                .with_context(|| format!("Malformed row at {}:{}", self.path.display(), line))?;

            let mut features = Vec::with_capacity(feature_names.len());
            let mut target = 0.0;
            for (i, cell) in record.iter().enumerate() {
                let value: f64 = cell.parse().with_context(|| {
                    format!(
                        "Non-numeric value '{}' in column '{}' at {}:{}",
                        cell,
                        &headers[i],
                        self.path.display(),
                        line
                    )
                })?;
                if !value.is_finite() {
                    bail!(
                        "Non-finite value '{}' in column '{}' at {}:{}",
                        cell,
                        &headers[i],
                        self.path.display(),
                        line
                    );
                }
                if i == target_idx {
                    target = value;
                } else {
                    features.push(value);
                }
            }
            samples.push(CarbonSample::new(features, target));
        }

        tracing::info!("Loaded {} samples from '{}'", samples.len(), self.path.display());
        FeatureTable::new(feature_names, samples)
    }
}

/// Load `path` when it exists, otherwise fall back to `fallback`.
pub fn load_or_generate(path: &Path, fallback: &dyn SampleSource) -> Result<FeatureTable> {
    let loader = CsvLoader::new(path);
    if loader.exists() {
        tracing::info!("Loading preprocessed data from '{}'", path.display());
        loader.load()
    } else {
        tracing::warn!(
            "Preprocessed data '{}' not found, creating synthetic data",
            path.display()
        );
        fallback.load()
    }
}

/// Write a feature table as CSV with the target as the last column.
pub fn write_csv(table: &FeatureTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;

    let mut header: Vec<&str> = table.feature_names.iter().map(String::as_str).collect();
    header.push(TARGET);
    writer.write_record(&header)?;

    for s in &table.samples {
        let mut row: Vec<String> = s.features.iter().map(|v| v.to_string()).collect();
        row.push(s.target.to_string());
        writer.write_record(&row)?;
    }
    writer.flush()?;

    tracing::debug!("Wrote {} rows to '{}'", table.len(), path.display());
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::UniformGenerator;
    use std::fs;

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.csv");

        let table = UniformGenerator::new(25, 42).load().unwrap();
        write_csv(&table, &path).unwrap();

        let loaded = CsvLoader::new(&path).load().unwrap();
        // `f64::to_string` prints the shortest exact representation.
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_target_column_can_be_anywhere() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(
            &path,
            "Carbon_Sequestration_tCO2e_ha,NDVI,Extra\n10.5,0.4,1\n20.0, 0.6 ,2\n",
        )
        .unwrap();

        let t = CsvLoader::new(&path).load().unwrap();
        assert_eq!(t.feature_names, vec!["NDVI", "Extra"]);
        assert_eq!(t.samples[1].features, vec![0.6, 2.0]);
        assert_eq!(t.samples[1].target, 20.0);
    }

    #[test]
    fn test_missing_target_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "NDVI,Canopy_Cover_Percent\n0.4,50\n").unwrap();

        let err = CsvLoader::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Carbon_Sequestration_tCO2e_ha"));
    }

    #[test]
    fn test_non_numeric_cell_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "NDVI,Carbon_Sequestration_tCO2e_ha\n0.4,12\nabc,13\n").unwrap();

        let err = CsvLoader::new(&path).load().unwrap_err();
        assert!(format!("{err:#}").contains(":3"));
    }

    #[test]
    fn test_non_finite_cell_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        for cell in ["inf", "-inf", "NaN"] {
            let path = dir.path().join("data.csv");
            fs::write(&path, format!("NDVI,Carbon_Sequestration_tCO2e_ha\n0.4,12\n0.5,13\n{cell},14\n")).unwrap();

            let err = CsvLoader::new(&path).load().unwrap_err();
            let msg = format!("{err:#}");
            assert!(msg.contains(":4"), "{msg}");
            assert!(msg.contains(cell), "{msg}");
        }
    }

    #[test]
    fn test_fallback_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let t = load_or_generate(&path, &UniformGenerator::new(10, 1)).unwrap();
        assert_eq!(t.len(), 10);
    }
}
