//! Reconciles the sighting cache with the map's marker layer
//!
//! `OverlaySync` exclusively owns both the [`SightingStore`] and the marker
//! handles. After every completed resync the marker ids equal the ids last
//! fetched from the server. A failed fetch leaves both at their last good
//! state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::api::SightingApi;
use crate::config::{ClientConfig, Messages, PopupPolicy};
use crate::error::Result;
use crate::popup;
use crate::providers::MapProvider;
use crate::store::SightingStore;
use crate::types::{Session, Sighting, SightingId};

pub struct OverlaySync<M: MapProvider> {
    api: Arc<dyn SightingApi>,
    map: M,
    store: SightingStore,
    markers: HashMap<SightingId, M::Handle>,
    /// Session the popups were last rendered for
    viewer: Session,
    messages: Messages,
    policy: PopupPolicy,
}

impl<M: MapProvider> OverlaySync<M> {
    pub fn new(api: Arc<dyn SightingApi>, map: M, config: &ClientConfig) -> Self {
        Self {
            api,
            map,
            store: SightingStore::new(),
            markers: HashMap::new(),
            viewer: Session::anonymous(),
            messages: config.messages.clone(),
            policy: config.popup_policy,
        }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn store(&self) -> &SightingStore {
        &self.store
    }

    pub fn viewer(&self) -> &Session {
        &self.viewer
    }

    pub fn marker_ids(&self) -> HashSet<SightingId> {
        self.markers.keys().cloned().collect()
    }

    pub fn has_marker(&self, id: &SightingId) -> bool {
        self.markers.contains_key(id)
    }

    /// Adopt a new session and re-render every popup for it
    pub fn apply_session(&mut self, session: &Session) {
        if &self.viewer == session {
            return;
        }
        self.viewer = session.clone();

        for sighting in self.store.iter() {
            if let Some(handle) = self.markers.get(&sighting.id) {
                let content = popup::render(sighting, &self.viewer, &self.messages);
                self.map.bind_popup(handle, &content.html);
            }
        }
        debug!(markers = self.markers.len(), "Popups re-rendered for new session");
    }

    /// Refetch every sighting and rebuild all markers from scratch.
    ///
    /// Returns the number of markers placed.
    pub async fn full_resync(&mut self) -> Result<usize> {
        let sightings = match self.api.list_sightings().await {
            Ok(sightings) => sightings,
            Err(e) => {
                error!(error = %e, "Error loading sightings; keeping current markers");
                return Err(e);
            }
        };

        self.store.replace_all(sightings);

        for (_, handle) in self.markers.drain() {
            self.map.remove_marker(handle);
        }

        let mut newest = None;
        for sighting in self.store.iter() {
            let handle = Self::place(&mut self.map, sighting, &self.viewer, &self.messages);
            newest = Some(sighting.id.clone());
            self.markers.insert(sighting.id.clone(), handle);
        }

        if self.policy == PopupPolicy::OpenNewest {
            if let Some(handle) = newest.and_then(|id| self.markers.get(&id)) {
                self.map.open_popup(handle);
            }
        }

        info!(markers = self.markers.len(), "Sightings resynchronized");
        Ok(self.markers.len())
    }

    /// Place one marker for a sighting the server just created
    pub fn add_one(&mut self, sighting: Sighting) -> Result<()> {
        if let Err(e) = self.store.add(sighting.clone()) {
            warn!(error = %e, "Created sighting already cached");
            return Err(e);
        }

        let handle = Self::place(&mut self.map, &sighting, &self.viewer, &self.messages);
        if self.policy == PopupPolicy::OpenNewest {
            self.map.open_popup(&handle);
        }
        self.markers.insert(sighting.id, handle);
        Ok(())
    }

    /// Drop one marker and evict its record.
    ///
    /// A record that is already gone is not an error; returns the evicted
    /// record if there was one.
    pub fn remove_one(&mut self, id: &SightingId) -> Option<Sighting> {
        if let Some(handle) = self.markers.remove(id) {
            self.map.remove_marker(handle);
        }

        match self.store.remove(id) {
            Ok(sighting) => Some(sighting),
            Err(e) => {
                debug!(error = %e, "Sighting already evicted");
                None
            }
        }
    }

    fn place(map: &mut M, sighting: &Sighting, viewer: &Session, messages: &Messages) -> M::Handle {
        let handle = map.add_marker(sighting.coordinates());
        let content = popup::render(sighting, viewer, messages);
        map.bind_popup(&handle, &content.html);
        handle
    }
}
