//! Local SLC inventory
//!
//! Acquisitions live as zipped SLC products under
//! `<data_directory>/<orbit_pass>/slc/`. The inventory tells which satellites
//! are present and which acquisition identifiers belong to each.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::app::models::OrbitPass;
use crate::constants::files;
use crate::errors::{InventoryError, InventoryResult};

/// SLC products of one orbit pass
#[derive(Debug, Clone)]
pub struct Inventory {
    data_directory: PathBuf,
    orbit_pass: OrbitPass,
    slc_directory: PathBuf,
}

impl Inventory {
    pub fn new(data_directory: impl Into<PathBuf>, orbit_pass: OrbitPass) -> Self {
        let data_directory = data_directory.into();
        let slc_directory = data_directory
            .join(orbit_pass.dir_name())
            .join(files::SLC_DIRNAME);
        Self {
            data_directory,
            orbit_pass,
            slc_directory,
        }
    }

    pub fn data_directory(&self) -> &Path {
        &self.data_directory
    }

    pub fn orbit_pass(&self) -> OrbitPass {
        self.orbit_pass
    }

    pub fn slc_directory(&self) -> &Path {
        &self.slc_directory
    }

    /// File names of every SLC zip in the inventory, sorted
    pub fn slc_files(&self) -> InventoryResult<Vec<String>> {
        let directory = glob::Pattern::escape(&self.slc_directory.to_string_lossy());
        let pattern = format!("{}/{}", directory, files::SLC_GLOB);

        let mut names = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = entry?;
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Known satellite prefixes appearing in any SLC file name
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NoSatellites` when none of `known` appears.
    pub fn satellites(&self, known: &[String]) -> InventoryResult<Vec<String>> {
        let files = self.slc_files()?;
        let found: BTreeSet<String> = known
            .iter()
            .filter(|satellite| files.iter().any(|file| file.contains(satellite.as_str())))
            .cloned()
            .collect();

        if found.is_empty() {
            return Err(InventoryError::NoSatellites {
                directory: self.slc_directory.clone(),
            });
        }
        Ok(found.into_iter().collect())
    }

    /// SLC file names containing `satellite`
    pub fn acquisition_ids(&self, satellite: &str) -> InventoryResult<Vec<String>> {
        Ok(self
            .slc_files()?
            .into_iter()
            .filter(|name| name.contains(satellite))
            .collect())
    }
}
