//! Editor configuration
//!
//! Tunables of the editable layer, stored as JSON. Values missing from a
//! file fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Configuration of an editable layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Screen-space slack in pixels when hitting lines and polygon
    /// outlines of the selected element
    pub element_pick_tolerance_px: f32,
    /// Extra pixels added around a drag handle's rendered radius
    pub overlay_pick_padding_px: f32,
    /// Buffer size of the layer event channel
    pub event_channel_capacity: usize,
    /// Default `tracing` filter directive
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            element_pick_tolerance_px: 8.0,
            overlay_pick_padding_px: 4.0,
            event_channel_capacity: 256,
            log_filter: "info".to_string(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from a JSON file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: EditorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a JSON file, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("element_pick_tolerance_px", self.element_pick_tolerance_px),
            ("overlay_pick_padding_px", self.overlay_pick_padding_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTolerance { field, value }.into());
            }
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity.into());
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::EmptyLogFilter.into());
        }
        Ok(())
    }
}
