//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

use std::path::Path;

use courtcut_core::store::{Catalog, JsonFileStore};
use courtcut_core::{CoreConfig, external};

use crate::error::{CliErrorContext, CliResult};

pub mod analyze;
pub mod clips;
pub mod coverage;
pub mod edit;
pub mod stop;
pub mod sync;
pub mod zone;

/// Opens the persisted catalog under the work directory.
pub fn open_catalog(config: &CoreConfig) -> CliResult<Catalog<JsonFileStore>> {
    let store = JsonFileStore::open(config.store_dir())
        .cli_with_context(|| format!("Failed to open store in {}", config.work_dir.display()))?;
    Ok(Catalog::new(store))
}

/// Duration of a media file through ffprobe, or `None` when it cannot be read.
pub fn probe_duration(path: &Path) -> Option<f64> {
    if !path.is_file() {
        return None;
    }
    match external::get_media_info(path) {
        Ok(info) => info.duration,
        Err(e) => {
            log::warn!("Could not probe {}: {}", path.display(), e);
            None
        }
    }
}

/// Frame rate of a media file through ffprobe, or `None` when it cannot be read.
pub fn probe_frame_rate(path: &Path) -> Option<f64> {
    if !path.is_file() {
        return None;
    }
    match external::get_media_info(path) {
        Ok(info) => info.frame_rate,
        Err(e) => {
            log::warn!("Could not probe {}: {}", path.display(), e);
            None
        }
    }
}
