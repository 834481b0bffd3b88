//! Client configuration
//!
//! Loaded from TOML; every field has a default so a partial (or missing)
//! file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SightingError};
use crate::types::Coordinates;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub popup_policy: PopupPolicy,
    #[serde(default)]
    pub messages: Messages,
}

impl ClientConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a file, falling back to defaults when absent
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SightingError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the sighting server (no trailing slash)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Initial map view and tile source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,
    #[serde(default = "default_center_lng")]
    pub center_lng: f64,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(default = "default_tile_url")]
    pub tile_url: String,
    #[serde(default = "default_attribution")]
    pub attribution: String,
}

impl MapConfig {
    pub fn center(&self) -> Coordinates {
        Coordinates::new(self.center_lat, self.center_lng)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lng: default_center_lng(),
            zoom: default_zoom(),
            tile_url: default_tile_url(),
            attribution: default_attribution(),
        }
    }
}

/// Which marker popups are opened when markers are created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupPolicy {
    /// Popups stay closed until the user opens one
    OpenNone,
    /// After a resync only the last marker in fetch order is open; a
    /// freshly reported sighting opens its own popup
    #[default]
    OpenNewest,
}

/// User-facing text catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub sign_in_prompt: String,
    pub ready_to_report: String,
    pub locating: String,
    pub report_succeeded: String,
    pub report_failed: String,
    pub location_failed: String,
    pub location_unsupported: String,
    pub delete_succeeded: String,
    pub delete_not_owner: String,
    pub delete_failed: String,
    pub popup_title: String,
    pub popup_reported_at: String,
    pub popup_delete_button: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            sign_in_prompt: "Sign in to start reporting.".into(),
            ready_to_report: "Choose a location and press a report button.".into(),
            locating: "Getting your location...".into(),
            report_succeeded: "Your sighting has been reported!".into(),
            report_failed: "Reporting failed.".into(),
            location_failed: "Could not get your location.".into(),
            location_unsupported: "Location is not supported on this device.".into(),
            delete_succeeded: "Your report has been deleted.".into(),
            delete_not_owner: "This report was not registered by your account and cannot be deleted.".into(),
            delete_failed: "Deleting the report failed.".into(),
            popup_title: "A bear was sighted!".into(),
            popup_reported_at: "Reported at:".into(),
            popup_delete_button: "Delete this report".into(),
        }
    }
}

// Defaults
fn default_base_url() -> String { "http://localhost:81".to_string() }
fn default_timeout_secs() -> u64 { 10 }
fn default_center_lat() -> f64 { 35.681236 }
fn default_center_lng() -> f64 { 139.767125 }
fn default_zoom() -> u8 { 13 }
fn default_tile_url() -> String {
    "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}
fn default_attribution() -> String {
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
        .to_string()
}
