//! File discovery for the raw input directory
//!
//! Finds the monthly measurement files and resolves the lookup tables and the
//! optional XEMA meteorological file. Monthly files may sit directly in the
//! input directory or in per-year subdirectories:
//! ```text
//! input/
//!   qualitat_aire_contaminants.csv
//!   2025_qualitat_aire_estacions.csv
//!   2023/
//!     2023_01_Gener_qualitat_aire_BCN.csv
//!     2023_02_Febrer_qualitat_aire_BCN.csv
//!   2024_01_Gener_qualitat_aire_BCN.csv
//! ```

use crate::error::{AqiError, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File discovery component for the input directory
#[derive(Debug)]
pub struct FileDiscovery {
    input_path: PathBuf,
    monthly_pattern: Pattern,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(input_path: PathBuf, monthly_pattern: &str) -> Result<Self> {
        let monthly_pattern = Pattern::new(monthly_pattern).map_err(|e| {
            AqiError::configuration(format!("Invalid file pattern '{}': {}", monthly_pattern, e))
        })?;

        Ok(Self {
            input_path,
            monthly_pattern,
        })
    }

    /// All monthly files under the input directory, sorted by path
    pub fn discover_monthly_files(&self) -> Result<Vec<PathBuf>> {
        if !self.input_path.is_dir() {
            return Err(AqiError::InputNotFound {
                path: self.input_path.clone(),
            });
        }

        debug!(
            "Searching for '{}' in: {}",
            self.monthly_pattern,
            self.input_path.display()
        );

        let files = find_matching(&self.input_path, &self.monthly_pattern)?;

        debug!("Found {} monthly files", files.len());
        Ok(files)
    }

    /// Resolve a lookup table by file name, searching subdirectories if needed
    pub fn resolve_lookup(&self, file_name: &str) -> Result<PathBuf> {
        let direct = self.input_path.join(file_name);
        if direct.is_file() {
            return Ok(direct);
        }

        let pattern = Pattern::new(&Pattern::escape(file_name)).map_err(|e| {
            AqiError::configuration(format!("Invalid file name '{}': {}", file_name, e))
        })?;

        find_matching(&self.input_path, &pattern)?
            .into_iter()
            .next()
            .ok_or(AqiError::InputNotFound { path: direct })
    }

    /// First file matching the meteo pattern, if any
    pub fn find_meteo_file(&self, pattern: &str) -> Result<Option<PathBuf>> {
        let pattern = Pattern::new(pattern).map_err(|e| {
            AqiError::configuration(format!("Invalid file pattern '{}': {}", pattern, e))
        })?;

        Ok(find_matching(&self.input_path, &pattern)?.into_iter().next())
    }
}

/// Walk `root` and collect files whose name matches `pattern`
fn find_matching(root: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| AqiError::ProcessingFailed {
            path: root.to_path_buf(),
            reason: format!("Directory traversal failed: {}", e),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| pattern.matches(name));

        if matches {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MONTHLY_FILE_PATTERN, POLLUTANTS_FILE, STATIONS_FILE};
    use std::fs;
    use tempfile::TempDir;

    fn create_input_tree(temp_dir: &TempDir) -> PathBuf {
        let input = temp_dir.path().join("input");
        let year_dir = input.join("2023");
        fs::create_dir_all(&year_dir).unwrap();

        fs::write(year_dir.join("2023_02_Febrer_qualitat_aire_BCN.csv"), "x").unwrap();
        fs::write(year_dir.join("2023_01_Gener_qualitat_aire_BCN.csv"), "x").unwrap();
        fs::write(input.join("2024_01_Gener_qualitat_aire_BCN.csv"), "x").unwrap();
        fs::write(input.join(POLLUTANTS_FILE), "x").unwrap();
        fs::write(year_dir.join(STATIONS_FILE), "x").unwrap();
        fs::write(input.join("notes.txt"), "x").unwrap();
        fs::write(
            input.join("Dades_meteorològiques_diàries_de_la_XEMA_20260111.csv"),
            "x",
        )
        .unwrap();

        input
    }

    #[test]
    fn test_discover_monthly_files_recursively_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let input = create_input_tree(&temp_dir);

        let discovery = FileDiscovery::new(input, MONTHLY_FILE_PATTERN).unwrap();
        let files = discovery.discover_monthly_files().unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "2023_01_Gener_qualitat_aire_BCN.csv",
                "2023_02_Febrer_qualitat_aire_BCN.csv",
                "2024_01_Gener_qualitat_aire_BCN.csv",
            ]
        );
    }

    #[test]
    fn test_missing_input_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let discovery = FileDiscovery::new(missing.clone(), MONTHLY_FILE_PATTERN).unwrap();
        match discovery.discover_monthly_files() {
            Err(AqiError::InputNotFound { path }) => assert_eq!(path, missing),
            other => panic!("Expected InputNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_lookup_direct_and_nested() {
        let temp_dir = TempDir::new().unwrap();
        let input = create_input_tree(&temp_dir);
        let discovery = FileDiscovery::new(input.clone(), MONTHLY_FILE_PATTERN).unwrap();

        assert_eq!(
            discovery.resolve_lookup(POLLUTANTS_FILE).unwrap(),
            input.join(POLLUTANTS_FILE)
        );
        assert_eq!(
            discovery.resolve_lookup(STATIONS_FILE).unwrap(),
            input.join("2023").join(STATIONS_FILE)
        );
        assert!(matches!(
            discovery.resolve_lookup("absent.csv"),
            Err(AqiError::InputNotFound { .. })
        ));
    }

    #[test]
    fn test_find_meteo_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = create_input_tree(&temp_dir);
        let discovery = FileDiscovery::new(input, MONTHLY_FILE_PATTERN).unwrap();

        let meteo = discovery
            .find_meteo_file(crate::constants::METEO_FILE_PATTERN)
            .unwrap();
        assert!(meteo.is_some());
        assert!(discovery.find_meteo_file("*.parquet").unwrap().is_none());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(FileDiscovery::new(PathBuf::from("."), "[").is_err());
    }
}
