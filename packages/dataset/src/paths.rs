//! Locations of the CSV files read at start-up.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Data directory and file names of the three input tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetPaths {
    /// Directory holding the CSV files.
    pub data_dir: PathBuf,
    /// Cleaned accident records (comma-separated).
    pub accidents_file: String,
    /// Population by department (semicolon-separated).
    pub population_file: String,
    /// Commune/department/region reference table (comma-separated).
    pub departments_file: String,
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            accidents_file: "accidents-velos_clean.csv".to_string(),
            population_file: "pop_par_dep.csv".to_string(),
            departments_file: "communes-departement-region.csv".to_string(),
        }
    }
}

impl DatasetPaths {
    /// Uses `data_dir` with the default file names.
    #[must_use]
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Path of the accident records file.
    #[must_use]
    pub fn accidents(&self) -> PathBuf {
        self.data_dir.join(&self.accidents_file)
    }

    /// Path of the population file.
    #[must_use]
    pub fn population(&self) -> PathBuf {
        self.data_dir.join(&self.population_file)
    }

    /// Path of the department reference file.
    #[must_use]
    pub fn departments(&self) -> PathBuf {
        self.data_dir.join(&self.departments_file)
    }
}
