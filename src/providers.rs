//! Collaborators outside the synchronization engine
//!
//! The map renderer, the device geolocation service, the identity-provider
//! widget and the page chrome are all reached through these traits. See
//! [`headless`](crate::headless) for in-memory implementations.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::config::MapConfig;
use crate::error::GeolocationError;
use crate::session::UiEnablement;
use crate::types::{Coordinates, CredentialToken};

/// Marker layer of the map renderer.
///
/// A `Handle` is the renderer's object for one marker. Removing a marker
/// consumes its handle.
pub trait MapProvider: Send {
    type Handle: Send;

    /// Center the map and attach the tile layer
    fn create_map(&mut self, view: &MapConfig);

    fn add_marker(&mut self, at: Coordinates) -> Self::Handle;

    fn remove_marker(&mut self, handle: Self::Handle);

    /// Replace the popup content of a marker
    fn bind_popup(&mut self, handle: &Self::Handle, html: &str);

    fn open_popup(&mut self, handle: &Self::Handle);

    /// Current center of the viewport
    fn center(&self) -> Coordinates;
}

/// Device position service
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Page chrome: controls, status line and blocking acknowledgments
pub trait UiSurface: Send + Sync {
    /// Enable/disable report controls and toggle the sign-in/out controls
    fn apply_enablement(&self, state: &UiEnablement);

    /// Replace the status line
    fn set_status(&self, message: &str);

    /// Show a message the user must dismiss
    fn acknowledge(&self, message: &str);
}

/// Hands credential tokens from the identity widget to the engine.
///
/// Created by [`SightingApp::register_identity`](crate::SightingApp::register_identity)
/// and passed to the provider exactly once.
#[derive(Debug, Clone)]
pub struct CredentialCallback {
    tx: mpsc::UnboundedSender<CredentialToken>,
}

impl CredentialCallback {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<CredentialToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Deliver a token; returns false once the engine is gone
    pub fn deliver(&self, token: CredentialToken) -> bool {
        self.tx.send(token).is_ok()
    }
}

/// Identity-provider widget
pub trait IdentityProvider {
    /// Register the engine's credential entry point
    fn register(&mut self, callback: CredentialCallback);
}
