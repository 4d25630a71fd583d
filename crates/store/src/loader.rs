//! The dataset loader.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tethys_io::read_observations;
use tethys_schema::Observation;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::filter::Filters;
use crate::info::DatasetInfo;

/// File extension of canonical dataset files.
pub const DATASET_EXTENSION: &str = "parquet";

/// Serves canonical datasets from a store directory.
///
/// One file per dataset name directly under the root; reads are full-file
/// loads with filters applied in memory. Derived metadata is cached per
/// dataset keyed by file modification time, so repeat
/// [`DataLoader::get_dataset_info`] calls only rescan after a rewrite.
#[derive(Debug)]
pub struct DataLoader {
    data_dir: PathBuf,
    info_cache: HashMap<String, (SystemTime, DatasetInfo)>,
}

impl DataLoader {
    /// Create a loader over the given store directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            info_cache: HashMap::new(),
        }
    }

    /// The store directory this loader serves.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The file a dataset name resolves to.
    fn dataset_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.{DATASET_EXTENSION}"))
    }

    /// List available dataset names, sorted.
    ///
    /// Only files with the canonical extension directly under the store
    /// directory count; subdirectories are not searched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Store`] if the directory cannot be read.
    pub fn list_datasets(&self) -> Result<Vec<String>, StoreError> {
        let entries = std::fs::read_dir(&self.data_dir).map_err(|e| StoreError::Store {
            path: self.data_dir.clone(),
            reason: e.to_string(),
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Store {
                path: self.data_dir.clone(),
                reason: e.to_string(),
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(DATASET_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Load a dataset and apply `filters`.
    ///
    /// The whole file is read and the filters evaluated row by row; an
    /// unrestricted [`Filters`] returns every row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatasetNotFound`] if no file matches `name`, or
    /// [`StoreError::Read`] on decoding failure.
    pub fn load_dataset(
        &self,
        name: &str,
        filters: &Filters,
    ) -> Result<Vec<Observation>, StoreError> {
        let path = self.dataset_path(name);
        if !path.exists() {
            return Err(StoreError::DatasetNotFound {
                name: name.to_string(),
                path,
            });
        }

        let mut observations = read_observations(&path)?;
        let total = observations.len();
        if !filters.is_unrestricted() {
            observations.retain(|o| filters.matches(o));
        }

        info!(
            dataset = name,
            total,
            returned = observations.len(),
            "loaded dataset"
        );
        Ok(observations)
    }

    /// Compute (or serve from cache) the derived metadata for a dataset.
    ///
    /// The scan result is cached keyed by the file's modification time, so
    /// unchanged files are not rescanned; a rewrite invalidates the entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatasetNotFound`] if no file matches `name`.
    pub fn get_dataset_info(&mut self, name: &str) -> Result<DatasetInfo, StoreError> {
        let path = self.dataset_path(name);
        if !path.exists() {
            return Err(StoreError::DatasetNotFound {
                name: name.to_string(),
                path,
            });
        }

        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| StoreError::Store {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        if let Some((cached_at, info)) = self.info_cache.get(name) {
            if *cached_at == modified {
                debug!(dataset = name, "metadata cache hit");
                return Ok(info.clone());
            }
        }

        let observations = read_observations(&path)?;
        let info = DatasetInfo::from_observations(&observations);
        self.info_cache
            .insert(name.to_string(), (modified, info.clone()));

        debug!(
            dataset = name,
            rows = info.n_observations,
            "computed dataset metadata"
        );
        Ok(info)
    }
}
