//! Page-lifetime orchestrator
//!
//! Wires [`SessionGate`], [`OverlaySync`], [`ReportFlow`] and [`DeleteFlow`]
//! together and owns them for the life of the page. Every operation takes
//! `&mut self`, so one flow finishes before the next one starts and a late
//! resync can never overwrite a newer delete.
//!
//! ```text
//!   identity widget ──token──▶ on_credential ──▶ SessionGate ──▶ UiSurface
//!                                                    │
//!                                                    ▼ session
//!   report/delete controls ──▶ ReportFlow/DeleteFlow ──▶ OverlaySync ──▶ MapProvider
//! ```

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::SightingApi;
use crate::config::ClientConfig;
use crate::delete::{DeleteFlow, DeleteOutcome};
use crate::overlay::OverlaySync;
use crate::providers::{
    CredentialCallback, GeolocationProvider, IdentityProvider, MapProvider, UiSurface,
};
use crate::report::{ReportFlow, ReportOutcome};
use crate::session::SessionGate;
use crate::store::SightingStore;
use crate::types::{Coordinates, CredentialToken, Session, SightingId};

pub struct SightingApp<M: MapProvider> {
    config: ClientConfig,
    gate: SessionGate,
    overlay: OverlaySync<M>,
    reports: ReportFlow,
    deletes: DeleteFlow,
    credentials: Option<mpsc::UnboundedReceiver<CredentialToken>>,
}

impl<M: MapProvider> SightingApp<M> {
    pub fn new(
        config: ClientConfig,
        api: Arc<dyn SightingApi>,
        map: M,
        geolocation: Arc<dyn GeolocationProvider>,
        ui: Arc<dyn UiSurface>,
    ) -> Self {
        let messages = config.messages.clone();
        Self {
            gate: SessionGate::new(api.clone(), ui.clone(), messages.clone()),
            overlay: OverlaySync::new(api.clone(), map, &config),
            reports: ReportFlow::new(api.clone(), geolocation, ui.clone(), messages.clone()),
            deletes: DeleteFlow::new(api, ui, messages),
            credentials: None,
            config,
        }
    }

    pub fn session(&self) -> &Session {
        self.gate.session()
    }

    pub fn overlay(&self) -> &OverlaySync<M> {
        &self.overlay
    }

    pub fn store(&self) -> &SightingStore {
        self.overlay.store()
    }

    pub fn map(&self) -> &M {
        self.overlay.map()
    }

    pub fn map_mut(&mut self) -> &mut M {
        self.overlay.map_mut()
    }

    /// Hand the identity widget its callback. Replaces any earlier registration.
    pub fn register_identity(&mut self, provider: &mut dyn IdentityProvider) {
        let (callback, rx) = CredentialCallback::channel();
        if self.credentials.replace(rx).is_some() {
            warn!("Identity provider registered twice; earlier callback disconnected");
        }
        provider.register(callback);
    }

    /// Page load: set up the map, publish the signed-out UI, then check the
    /// session and load sightings.
    pub async fn start(&mut self) {
        info!(server = %self.config.server.base_url, "Starting sighting client");
        self.overlay.map_mut().create_map(&self.config.map);
        self.gate.publish();
        self.check_session().await;
    }

    /// Re-read the session from the server and rebuild markers for it.
    ///
    /// Sightings are reloaded even when the session check fails.
    pub async fn check_session(&mut self) {
        if let Ok(session) = self.gate.refresh().await {
            self.overlay.apply_session(&session);
        }
        let _ = self.overlay.full_resync().await;
    }

    /// Entry point for credentials from the identity widget
    pub async fn on_credential(&mut self, token: CredentialToken) {
        if let Ok(session) = self.gate.login(&token).await {
            self.overlay.apply_session(&session);
            let _ = self.overlay.full_resync().await;
        }
    }

    /// Process every credential delivered so far; returns how many
    pub async fn process_credentials(&mut self) -> usize {
        let mut pending = Vec::new();
        if let Some(rx) = self.credentials.as_mut() {
            while let Ok(token) = rx.try_recv() {
                pending.push(token);
            }
        }

        let count = pending.len();
        for token in pending {
            self.on_credential(token).await;
        }
        if count > 0 {
            debug!(count, "Processed credentials");
        }
        count
    }

    /// Wait for the next credential and process it; false once the identity
    /// provider is gone or none was registered
    pub async fn next_credential(&mut self) -> bool {
        let token = match self.credentials.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        };

        match token {
            Some(token) => {
                self.on_credential(token).await;
                true
            }
            None => false,
        }
    }

    pub async fn logout(&mut self) {
        if let Ok(session) = self.gate.logout().await {
            self.overlay.apply_session(&session);
            let _ = self.overlay.full_resync().await;
        }
    }

    /// Re-fetch sightings without touching the session
    pub async fn resync(&mut self) -> bool {
        self.overlay.full_resync().await.is_ok()
    }

    pub async fn report_from_device(&mut self) -> ReportOutcome {
        self.reports.report_from_device(&mut self.overlay).await
    }

    pub async fn report_from_map_center(&mut self) -> ReportOutcome {
        self.reports.report_from_map_center(&mut self.overlay).await
    }

    pub async fn report_at(&mut self, lat: f64, lng: f64) -> ReportOutcome {
        self.reports
            .report_at(&mut self.overlay, Coordinates::new(lat, lng))
            .await
    }

    pub async fn delete_sighting(&mut self, id: &SightingId) -> DeleteOutcome {
        self.deletes.delete_sighting(&mut self.overlay, id).await
    }
}
