use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{BikeshareError, Result};
use crate::selection::{City, Vocabulary};

/// Expected city vocabulary, in order.
pub const EXPECTED_CITIES: [&str; 3] = ["chicago", "new york city", "washington"];

/// One registered data source.
#[derive(Debug, Clone)]
pub struct CitySource {
    pub name: String,
    pub file_name: String,
}

/// Ordered mapping from city name to its CSV file under `data_dir`.
#[derive(Debug, Clone)]
pub struct CityCatalog {
    data_dir: PathBuf,
    sources: Vec<CitySource>,
}

impl CityCatalog {
    /// The stock catalog: every `City`, in declaration order.
    pub fn standard(data_dir: impl Into<PathBuf>) -> Self {
        let sources = City::ALL
            .iter()
            .map(|city| CitySource {
                name: city.input_name().to_string(),
                file_name: city.file_name().to_string(),
            })
            .collect();
        Self::from_sources(data_dir, sources)
    }

    pub fn from_sources(data_dir: impl Into<PathBuf>, sources: Vec<CitySource>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sources,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name.clone()).collect()
    }

    /// Startup integrity check: names and order must equal `EXPECTED_CITIES`.
    pub fn verify(&self) -> Result<()> {
        let found = self.names();
        if found.iter().map(String::as_str).eq(EXPECTED_CITIES) {
            debug!("city catalog verified: {:?}", found);
            Ok(())
        } else {
            Err(BikeshareError::CityCatalogMismatch {
                expected: EXPECTED_CITIES.iter().map(|s| s.to_string()).collect(),
                found,
            })
        }
    }

    /// Full path of the CSV backing `city`.
    pub fn path_for(&self, city: City) -> Result<PathBuf> {
        self.sources
            .iter()
            .find(|s| s.name == city.input_name())
            .map(|s| self.data_dir.join(&s.file_name))
            .ok_or_else(|| BikeshareError::UnknownCity(city.input_name().to_string()))
    }
}
