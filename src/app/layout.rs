//! Processor-specific storage of retrieved orbit files
//!
//! SNAP looks for zipped orbit files under its auxdata tree, bucketed by
//! satellite, year and month:
//!
//! ```text
//! ~/.snap/auxdata/Orbits/Sentinel-1/POEORB/S1A/2021/01/<name>.EOF.zip
//! ```
//!
//! ISCE reads raw orbit files from an `orbits` directory next to the SLCs:
//!
//! ```text
//! <data_directory>/<orbit_pass>/orbits/<name>.EOF
//! ```
//!
//! All writes go to a temporary sibling first and are renamed into place.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::app::inventory::Inventory;
use crate::app::models::{ProcessorMode, RetrievalJob};
use crate::constants::files;
use crate::errors::{ConfigError, ConfigResult, RetrievalError, RetrievalResult};

/// Storage roots for both processor layouts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SNAP POEORB root; `None` means `~/.snap/auxdata/Orbits/Sentinel-1/POEORB`
    pub snap_root: Option<PathBuf>,
}

impl StorageConfig {
    /// SNAP root, falling back to the user's SNAP auxdata directory
    pub fn resolve_snap_root(&self) -> ConfigResult<PathBuf> {
        match &self.snap_root {
            Some(root) => Ok(root.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(files::SNAP_POEORB_SUBDIR))
                .ok_or_else(|| ConfigError::MissingDirectory {
                    what: "home".to_string(),
                }),
        }
    }
}

/// Where and how a retrieved orbit file is stored
#[derive(Debug, Clone, PartialEq)]
pub struct StorageLayout {
    mode: ProcessorMode,
    snap_root: PathBuf,
    isce_directory: PathBuf,
}

impl StorageLayout {
    pub fn new(mode: ProcessorMode, snap_root: PathBuf, isce_directory: PathBuf) -> Self {
        Self {
            mode,
            snap_root,
            isce_directory,
        }
    }

    /// Layout for the given inventory's data directory and orbit pass
    pub fn for_inventory(
        mode: ProcessorMode,
        config: &StorageConfig,
        inventory: &Inventory,
    ) -> ConfigResult<Self> {
        let isce_directory = inventory
            .data_directory()
            .join(inventory.orbit_pass().dir_name())
            .join(files::ISCE_ORBITS_DIRNAME);
        Ok(Self::new(mode, config.resolve_snap_root()?, isce_directory))
    }

    pub fn mode(&self) -> ProcessorMode {
        self.mode
    }

    /// Final path of the stored file for `job`
    ///
    /// # Errors
    ///
    /// Returns `RetrievalError::InvalidLayoutKey` when the candidate has no
    /// usable file name, or, for SNAP, no satellite prefix or the
    /// representative date has no year and month.
    pub fn target_path(&self, job: &RetrievalJob) -> RetrievalResult<PathBuf> {
        let file_name = file_name(job)?;
        match self.mode {
            ProcessorMode::Isce => Ok(self.isce_directory.join(file_name)),
            ProcessorMode::Snap => {
                let satellite = job
                    .satellite_prefix()
                    .ok_or_else(|| invalid_key(job, &job.candidate))?;
                let (year, month) = job
                    .year_month()
                    .ok_or_else(|| invalid_key(job, &job.representative_date))?;
                Ok(self
                    .snap_root
                    .join(satellite)
                    .join(year)
                    .join(month)
                    .join(format!("{}.{}", file_name, files::ZIP_EXTENSION)))
            }
        }
    }

    /// Store `bytes` for `job` and return the final path
    pub async fn persist(&self, job: &RetrievalJob, bytes: Vec<u8>) -> RetrievalResult<PathBuf> {
        let path = self.target_path(job)?;
        let contents = match self.mode {
            ProcessorMode::Isce => bytes,
            ProcessorMode::Snap => {
                let entry = file_name(job)?.to_string();
                tokio::task::spawn_blocking(move || zip_single(&entry, &bytes))
                    .await
                    .map_err(|e| {
                        RetrievalError::Io(std::io::Error::new(
                            std::io::ErrorKind::Other,
                            e.to_string(),
                        ))
                    })??
            }
        };

        write_atomic(&path, &contents).await?;
        Ok(path)
    }
}

fn file_name(job: &RetrievalJob) -> RetrievalResult<&str> {
    Path::new(&job.candidate)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| invalid_key(job, &job.candidate))
}

fn invalid_key(job: &RetrievalJob, key: &str) -> RetrievalError {
    RetrievalError::InvalidLayoutKey {
        name: job.candidate.clone(),
        key: key.to_string(),
    }
}

/// Deflated zip archive holding one entry
fn zip_single(entry_name: &str, bytes: &[u8]) -> RetrievalResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    writer.start_file(entry_name, options)?;
    writer.write_all(bytes)?;
    Ok(writer.finish()?.into_inner())
}

/// Write via a temporary sibling and rename into place
async fn write_atomic(destination: &Path, contents: &[u8]) -> RetrievalResult<()> {
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temp_path = destination.with_extension(format!(
        "{}{}",
        destination
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or(""),
        files::TEMP_FILE_SUFFIX
    ));

    let written = write_temp(&temp_path, contents).await;
    discard_on_error(&temp_path, written).await?;

    if let Err(_e) = tokio::fs::rename(&temp_path, destination).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(RetrievalError::AtomicOperationFailed {
            temp_path,
            final_path: destination.to_path_buf(),
        });
    }
    Ok(())
}

async fn write_temp(temp_path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(temp_path).await?;
    file.write_all(contents).await?;
    file.flush().await
}

/// Remove a partly written temporary file when its write failed
async fn discard_on_error<T>(temp_path: &Path, result: std::io::Result<T>) -> RetrievalResult<T> {
    if result.is_err() {
        let _ = tokio::fs::remove_file(temp_path).await;
    }
    Ok(result?)
}
