//! Submitting new sightings
//!
//! Store and markers change only after the server confirms the report.
//! Session state is not re-checked here: report controls are disabled while
//! signed out, and the server rejects writes without a session anyway.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::SightingApi;
use crate::config::Messages;
use crate::error::{GeolocationError, SightingError};
use crate::overlay::OverlaySync;
use crate::providers::{GeolocationProvider, MapProvider, UiSurface};
use crate::types::{Coordinates, Sighting};

/// How a report attempt ended
#[derive(Debug)]
pub enum ReportOutcome {
    /// Server created the sighting and it is on the map
    Reported(Sighting),
    /// Device position unavailable; nothing was sent
    LocationFailed(GeolocationError),
    /// Server refused or could not be reached
    Failed(SightingError),
}

impl ReportOutcome {
    pub fn is_reported(&self) -> bool {
        matches!(self, ReportOutcome::Reported(_))
    }
}

pub struct ReportFlow {
    api: Arc<dyn SightingApi>,
    geolocation: Arc<dyn GeolocationProvider>,
    ui: Arc<dyn UiSurface>,
    messages: Messages,
}

impl ReportFlow {
    pub fn new(
        api: Arc<dyn SightingApi>,
        geolocation: Arc<dyn GeolocationProvider>,
        ui: Arc<dyn UiSurface>,
        messages: Messages,
    ) -> Self {
        Self {
            api,
            geolocation,
            ui,
            messages,
        }
    }

    /// Report at the device's current position
    pub async fn report_from_device<M: MapProvider>(
        &self,
        overlay: &mut OverlaySync<M>,
    ) -> ReportOutcome {
        self.ui.set_status(&self.messages.locating);

        match self.geolocation.current_position().await {
            Ok(position) => self.report_at(overlay, position).await,
            Err(e) => {
                warn!(error = %e, "Geolocation failed");
                let message = match e {
                    GeolocationError::Unsupported => &self.messages.location_unsupported,
                    _ => &self.messages.location_failed,
                };
                self.ui.acknowledge(message);
                self.ui.set_status(message);
                ReportOutcome::LocationFailed(e)
            }
        }
    }

    /// Report at the center of the current map view
    pub async fn report_from_map_center<M: MapProvider>(
        &self,
        overlay: &mut OverlaySync<M>,
    ) -> ReportOutcome {
        let center = overlay.map().center();
        self.report_at(overlay, center).await
    }

    pub async fn report_at<M: MapProvider>(
        &self,
        overlay: &mut OverlaySync<M>,
        at: Coordinates,
    ) -> ReportOutcome {
        match self.api.create_sighting(at).await {
            Ok(sighting) => {
                info!(sighting_id = %sighting.id, lat = at.lat, lng = at.lng, "Sighting reported");
                // A duplicate id is logged by the overlay; the report itself stands
                let _ = overlay.add_one(sighting.clone());
                self.ui.set_status(&self.messages.report_succeeded);
                self.ui.acknowledge(&self.messages.report_succeeded);
                ReportOutcome::Reported(sighting)
            }
            Err(e) => {
                match &e {
                    SightingError::Unauthorized => warn!("Report refused: no server session"),
                    other => error!(error = %other, "Error reporting sighting"),
                }
                self.ui.acknowledge(&self.messages.report_failed);
                self.ui.set_status(&self.messages.report_failed);
                ReportOutcome::Failed(e)
            }
        }
    }
}
