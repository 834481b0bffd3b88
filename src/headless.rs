//! In-memory collaborators for running the engine without a browser
//!
//! Used by the command-line host and by tests.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::config::MapConfig;
use crate::error::GeolocationError;
use crate::providers::{CredentialCallback, GeolocationProvider, IdentityProvider, MapProvider, UiSurface};
use crate::session::UiEnablement;
use crate::types::{Coordinates, CredentialToken};

/// Handle for a marker on a [`HeadlessMap`]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MarkerKey(u64);

/// One marker as the renderer sees it
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessMarker {
    pub at: Coordinates,
    pub popup: Option<String>,
    pub open: bool,
}

/// Marker layer kept in memory.
///
/// Like common map renderers, opening a popup closes whichever popup was
/// open before.
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    markers: BTreeMap<u64, HeadlessMarker>,
    next_key: u64,
    center: Coordinates,
    zoom: u8,
    tile_url: Option<String>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        let view = MapConfig::default();
        Self {
            markers: BTreeMap::new(),
            next_key: 0,
            center: view.center(),
            zoom: view.zoom,
            tile_url: None,
        }
    }

    /// Pan the viewport, as a user dragging the map would
    pub fn pan_to(&mut self, center: Coordinates) {
        self.center = center;
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn tile_url(&self) -> Option<&str> {
        self.tile_url.as_deref()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Markers in creation order
    pub fn markers(&self) -> impl Iterator<Item = &HeadlessMarker> + '_ {
        self.markers.values()
    }

    /// Popup html of every open popup
    pub fn open_popups(&self) -> Vec<&str> {
        self.markers
            .values()
            .filter(|m| m.open)
            .filter_map(|m| m.popup.as_deref())
            .collect()
    }
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new()
    }
}

impl MapProvider for HeadlessMap {
    type Handle = MarkerKey;

    fn create_map(&mut self, view: &MapConfig) {
        self.center = view.center();
        self.zoom = view.zoom;
        self.tile_url = Some(view.tile_url.clone());
    }

    fn add_marker(&mut self, at: Coordinates) -> MarkerKey {
        let key = self.next_key;
        self.next_key += 1;
        self.markers.insert(
            key,
            HeadlessMarker {
                at,
                popup: None,
                open: false,
            },
        );
        MarkerKey(key)
    }

    fn remove_marker(&mut self, handle: MarkerKey) {
        self.markers.remove(&handle.0);
    }

    fn bind_popup(&mut self, handle: &MarkerKey, html: &str) {
        if let Some(marker) = self.markers.get_mut(&handle.0) {
            marker.popup = Some(html.to_string());
        }
    }

    fn open_popup(&mut self, handle: &MarkerKey) {
        if !self.markers.contains_key(&handle.0) {
            return;
        }
        for (key, marker) in self.markers.iter_mut() {
            marker.open = *key == handle.0;
        }
    }

    fn center(&self) -> Coordinates {
        self.center
    }
}

/// Geolocation that always answers the same way
#[derive(Debug, Clone)]
pub struct FixedGeolocation {
    answer: Result<Coordinates, GeolocationError>,
}

impl FixedGeolocation {
    pub fn at(position: Coordinates) -> Self {
        Self {
            answer: Ok(position),
        }
    }

    pub fn failing(error: GeolocationError) -> Self {
        Self { answer: Err(error) }
    }

    /// A device without any geolocation capability
    pub fn unsupported() -> Self {
        Self::failing(GeolocationError::Unsupported)
    }
}

#[async_trait]
impl GeolocationProvider for FixedGeolocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.answer.clone()
    }
}

/// Identity widget that hands over a token supplied by the host
#[derive(Debug, Default)]
pub struct TokenIdentity {
    callback: Option<CredentialCallback>,
}

impl TokenIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete sign-in with `token`; false if no engine is registered
    pub fn complete_sign_in(&self, token: CredentialToken) -> bool {
        match &self.callback {
            Some(callback) => callback.deliver(token),
            None => false,
        }
    }
}

impl IdentityProvider for TokenIdentity {
    fn register(&mut self, callback: CredentialCallback) {
        self.callback = Some(callback);
    }
}

/// UI that writes to the terminal
#[derive(Debug, Default)]
pub struct ConsoleUi;

impl UiSurface for ConsoleUi {
    fn apply_enablement(&self, state: &UiEnablement) {
        tracing::debug!(
            report_enabled = state.report_enabled,
            logout_visible = state.logout_visible,
            "UI enablement updated"
        );
        println!("{}", state.status);
    }

    fn set_status(&self, message: &str) {
        println!("{}", message);
    }

    fn acknowledge(&self, message: &str) {
        println!("[!] {}", message);
    }
}
