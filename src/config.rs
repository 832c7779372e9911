use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Maps city names to their trip-record CSV paths.
///
/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "chicago": "data/chicago.csv",
///   "new york city": "data/new_york_city.csv"
/// }
/// ```
pub struct CityConfig {
    entries: BTreeMap<String, PathBuf>,
}

impl CityConfig {
    /// Loads the config from a JSON file at `path`. City names are normalized to
    /// lowercase so they match validated user input.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read city config {path}"))?;
        let raw: BTreeMap<String, PathBuf> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse city config {path}"))?;

        let entries = raw
            .into_iter()
            .map(|(city, file)| (city.to_lowercase(), file))
            .collect();

        Ok(Self { entries })
    }

    /// Builds the default three-city mapping rooted at `data_dir`.
    pub fn with_data_dir(data_dir: &str) -> Self {
        let dir = Path::new(data_dir);
        let entries = [
            ("chicago", "chicago.csv"),
            ("new york city", "new_york_city.csv"),
            ("washington", "washington.csv"),
        ]
        .into_iter()
        .map(|(city, file)| (city.to_string(), dir.join(file)))
        .collect();

        Self { entries }
    }

    /// Returns the CSV path for `city`, if one is configured.
    pub fn path_for(&self, city: &str) -> Option<&Path> {
        self.entries.get(city).map(PathBuf::as_path)
    }

    /// Iterates over configured city names in alphabetical order.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over all `(city, path)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }
}
