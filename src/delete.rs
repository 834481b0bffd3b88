//! Removing owned sightings
//!
//! Ownership is decided by the server. A refusal because the sighting
//! belongs to someone else is an expected outcome with its own message.

use std::sync::Arc;
use tracing::{error, info};

use crate::api::SightingApi;
use crate::config::Messages;
use crate::error::SightingError;
use crate::overlay::OverlaySync;
use crate::providers::{MapProvider, UiSurface};
use crate::types::SightingId;

/// How a delete attempt ended
#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted,
    /// The sighting belongs to another reporter
    NotOwner,
    Failed(SightingError),
}

pub struct DeleteFlow {
    api: Arc<dyn SightingApi>,
    ui: Arc<dyn UiSurface>,
    messages: Messages,
}

impl DeleteFlow {
    pub fn new(api: Arc<dyn SightingApi>, ui: Arc<dyn UiSurface>, messages: Messages) -> Self {
        Self { api, ui, messages }
    }

    pub async fn delete_sighting<M: MapProvider>(
        &self,
        overlay: &mut OverlaySync<M>,
        id: &SightingId,
    ) -> DeleteOutcome {
        match self.api.delete_sighting(id).await {
            Ok(()) => {
                info!(sighting_id = %id, "Sighting deleted");
                overlay.remove_one(id);
                self.ui.set_status(&self.messages.delete_succeeded);
                self.ui.acknowledge(&self.messages.delete_succeeded);
                DeleteOutcome::Deleted
            }
            Err(SightingError::AuthorizationDenied(_)) => {
                info!(sighting_id = %id, "Delete refused: not the reporter");
                self.ui.acknowledge(&self.messages.delete_not_owner);
                DeleteOutcome::NotOwner
            }
            Err(e) => {
                error!(sighting_id = %id, error = %e, "Error deleting sighting");
                self.ui.acknowledge(&self.messages.delete_failed);
                DeleteOutcome::Failed(e)
            }
        }
    }
}
