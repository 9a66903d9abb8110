use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::PathBuf,
};

use tracing::{debug, info, warn};

use crate::{config::HelioConfig, error::HelioError};

use super::PreparedExamples;

const CACHE_FILE_EXT: &str = "bin";
const CACHE_VERSION: &str = "v1"; // Increment if cache format changes

/// Cache file path for the current data file and pipeline parameters.
///
/// The grouping/windowing/split parameters are part of the filename so a
/// config change never resurrects a stale preparation.
fn get_cache_path(config: &HelioConfig) -> Result<PathBuf, HelioError> {
    let cache_dir = config
        .cache_dir
        .as_ref()
        .ok_or_else(|| HelioError::ConfigError("Cache directory is not configured.".to_string()))?;

    let stem = config
        .data_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("data");
    let filename = format!(
        "{}_{}-{}_{}_{}-{}-{}_{}.{}",
        stem,
        config.min_readings_per_day,
        config.max_readings_per_day,
        config.sequence_length,
        config.split_modulus,
        config.test_remainder,
        config.validation_remainder,
        CACHE_VERSION,
        CACHE_FILE_EXT
    );
    Ok(cache_dir.join(filename))
}

/// Loads the prepared dataset from the cache if enabled, valid, and present.
pub fn load_from_cache(config: &HelioConfig) -> Result<Option<PreparedExamples>, HelioError> {
    if !config.cache_enabled {
        return Ok(None);
    }

    let cache_path = get_cache_path(config)?;

    if !cache_path.exists() {
        debug!("Cache miss (file not found): {}", cache_path.display());
        return Ok(None);
    }

    debug!("Attempting to load from cache: {}", cache_path.display());
    match File::open(&cache_path) {
        Ok(file) => {
            let mut reader = BufReader::new(file);
            match bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard()) {
                Ok(data) => {
                    info!(
                        "Cache hit: loaded prepared dataset from {}",
                        cache_path.display()
                    );
                    Ok(Some(data))
                }
                Err(e) => {
                    warn!(
                        "Failed to deserialize cache file {}: {}. Ignoring cache.",
                        cache_path.display(),
                        e
                    );
                    Ok(None) // Treat as cache miss
                }
            }
        }
        Err(e) => {
            warn!(
                "Failed to open cache file {}: {}. Ignoring cache.",
                cache_path.display(),
                e
            );
            Ok(None) // Treat as cache miss
        }
    }
}

/// Saves the prepared dataset to the cache if enabled.
pub fn save_to_cache(config: &HelioConfig, data: &PreparedExamples) -> Result<(), HelioError> {
    if !config.cache_enabled {
        return Ok(());
    }

    let cache_path = get_cache_path(config)?;

    debug!("Attempting to save to cache: {}", cache_path.display());

    if let Some(parent_dir) = cache_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }

    match File::create(&cache_path) {
        Ok(file) => {
            let mut buffered_writer = BufWriter::new(file);
            match bincode::serde::encode_into_std_write(
                data,
                &mut buffered_writer,
                bincode::config::standard(),
            ) {
                Ok(_) => {
                    debug!(
                        "Saved prepared dataset to cache: {}",
                        cache_path.display()
                    );
                    Ok(())
                }
                Err(e) => {
                    warn!(
                        "Failed to serialize cache file {}: {}",
                        cache_path.display(),
                        e
                    );
                    // Cache write failures never abort a run
                    Ok(())
                }
            }
        }
        Err(e) => {
            warn!(
                "Failed to create cache file {}: {}",
                cache_path.display(),
                e
            );
            Ok(())
        }
    }
}
