//! Configuration for the publisher harness
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling harness tuning without recompilation. The feed buffer depth
//! and the synthetic window metrics used when fabricating posture events
//! can be adjusted via the config file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete harness configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub feed: FeedConfig,
    pub window: WindowConfig,
}

/// Live feed channel parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Capacity of the broadcast feed; subscribers lagging past this many
    /// snapshots lose the oldest ones (last-value-wins model)
    pub buffer: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { buffer: 64 }
    }
}

/// Window metrics used when fabricating synthetic posture events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window width in pixels
    pub width: i32,
    /// Window height in pixels
    pub height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        // Portrait phone-sized window
        Self {
            width: 1080,
            height: 1920,
        }
    }
}

impl Default for TrackerConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// * `TrackerConfig` - Loaded configuration, or defaults if the file
    ///   is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded harness configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Invalid JSON in {:?} ({}); falling back to defaults",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Could not read {:?} ({}); falling back to defaults",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
