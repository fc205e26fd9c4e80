//! Where the dataset comes from
//!
//! The compiler only ever sees a [`Dataset`]. How it gets populated is up to a
//! [`DatasetSource`]:
//! - `FileDatasetSource`: reads a JSON (or, with `data-loading`, YAML/TOML) file
//! - `MemoryDatasetSource`: hands out a dataset built in memory (tests, embedding)

use std::path::{Path, PathBuf};

use log::debug;

use super::dataset::Dataset;
use crate::utils::error::{GenError, GenResult};

/// Trait for anything that can produce the canonical dataset
pub trait DatasetSource {
    /// Load the dataset. Called once per compiler run.
    fn load(&self) -> GenResult<Dataset>;

    /// Human-readable origin, used in log output
    fn describe(&self) -> String;
}

/// Serialization format of a dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Yaml,
    Toml,
}

impl DatasetFormat {
    /// Pick a format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(DatasetFormat::Json),
            "yaml" | "yml" => Some(DatasetFormat::Yaml),
            "toml" => Some(DatasetFormat::Toml),
            _ => None,
        }
    }
}

/// Decode dataset text in the given format. `origin` is only used for errors.
pub fn parse_dataset(text: &str, format: DatasetFormat, origin: &Path) -> GenResult<Dataset> {
    let parsed: Result<Dataset, String> = match format {
        DatasetFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        #[cfg(feature = "data-loading")]
        DatasetFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        #[cfg(feature = "data-loading")]
        DatasetFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        #[cfg(not(feature = "data-loading"))]
        DatasetFormat::Yaml | DatasetFormat::Toml => Err(format!(
            "{:?} datasets need the `data-loading` feature",
            format
        )),
    };
    parsed.map_err(|message| GenError::dataset_format(origin, message))
}

/// Reads the dataset from a file on disk
pub struct FileDatasetSource {
    path: PathBuf,
    format: Option<DatasetFormat>,
}

impl FileDatasetSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format: None,
        }
    }

    /// Override extension-based format detection
    pub fn with_format(mut self, format: DatasetFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for FileDatasetSource {
    fn load(&self) -> GenResult<Dataset> {
        if !self.path.is_file() {
            return Err(GenError::missing_input(&self.path));
        }
        let format = self
            .format
            .or_else(|| DatasetFormat::from_path(&self.path))
            .ok_or_else(|| {
                GenError::dataset_format(
                    &self.path,
                    "unknown extension (expected .json, .yaml, .yml or .toml)",
                )
            })?;

        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| GenError::io(format!("reading {}", self.path.display()), e))?;
        debug!("parsing {} as {:?}", self.path.display(), format);
        parse_dataset(&text, format, &self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Dataset already held in memory
pub struct MemoryDatasetSource {
    dataset: Dataset,
}

impl MemoryDatasetSource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

impl DatasetSource for MemoryDatasetSource {
    fn load(&self) -> GenResult<Dataset> {
        Ok(self.dataset.clone())
    }

    fn describe(&self) -> String {
        format!("<memory: unicodeit {}>", self.dataset.version)
    }
}
