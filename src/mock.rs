//! In-memory server and UI doubles for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::api::SightingApi;
use crate::error::{Result, SightingError};
use crate::providers::UiSurface;
use crate::session::UiEnablement;
use crate::types::{Coordinates, CredentialToken, LoginStatus, Sighting, SightingId, UserId};

#[derive(Debug, Default)]
struct ServerState {
    sightings: Vec<Sighting>,
    session_user: Option<UserId>,
    tokens: HashMap<String, UserId>,
    offline: bool,
    create_failure: Option<u16>,
    next_id: u64,
    forced_id: Option<SightingId>,
    timestamp: String,
}

/// Mock sighting server.
///
/// Behaves like the real server: one cookie session, ownership checked on
/// delete, 401 for writes without a session. Can be taken offline to
/// simulate transport failures.
pub struct MockSightingApi {
    state: Mutex<ServerState>,
    list_calls: AtomicU32,
}

impl MockSightingApi {
    /// Create an empty server with no session.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ServerState {
                next_id: 1,
                timestamp: "T".to_string(),
                ..Default::default()
            }),
            list_calls: AtomicU32::new(0),
        }
    }

    /// Seed the server with sightings.
    pub fn with_sightings(self, sightings: Vec<Sighting>) -> Self {
        self.set_sightings(sightings);
        self
    }

    /// Replace the server's sightings.
    pub fn set_sightings(&self, sightings: Vec<Sighting>) {
        self.state().sightings = sightings;
    }

    /// Current server-side sightings.
    pub fn sightings(&self) -> Vec<Sighting> {
        self.state().sightings.clone()
    }

    /// Put the server session into a signed-in state.
    pub fn sign_in_as(&self, user: impl Into<UserId>) {
        self.state().session_user = Some(user.into());
    }

    /// Make `token` a valid credential for `user`.
    pub fn accept_token(&self, token: impl Into<String>, user: impl Into<UserId>) {
        self.state().tokens.insert(token.into(), user.into());
    }

    /// Fail every request with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    /// Answer creates with `status` instead of succeeding.
    pub fn fail_creates_with(&self, status: Option<u16>) {
        self.state().create_failure = status;
    }

    /// Id for the next created sighting.
    pub fn assign_next_id(&self, id: impl Into<SightingId>) {
        self.state().forced_id = Some(id.into());
    }

    /// Timestamp stamped on created sightings.
    pub fn set_timestamp(&self, timestamp: impl Into<String>) {
        self.state().timestamp = timestamp.into();
    }

    /// Number of list requests served.
    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn state(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn online(&self) -> Result<MutexGuard<'_, ServerState>> {
        let state = self.state();
        if state.offline {
            return Err(SightingError::Transport("connection refused".to_string()));
        }
        Ok(state)
    }
}

impl Default for MockSightingApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SightingApi for MockSightingApi {
    async fn check_login(&self) -> Result<LoginStatus> {
        let state = self.online()?;
        Ok(LoginStatus {
            logged_in: state.session_user.is_some(),
            user_id: state.session_user.clone(),
        })
    }

    async fn login(&self, token: &CredentialToken) -> Result<()> {
        let mut state = self.online()?;
        match state.tokens.get(token.expose()).cloned() {
            Some(user) => {
                state.session_user = Some(user);
                Ok(())
            }
            None => Err(SightingError::LoginRejected { status: 400 }),
        }
    }

    async fn logout(&self) -> Result<()> {
        let mut state = self.online()?;
        state.session_user = None;
        Ok(())
    }

    async fn list_sightings(&self) -> Result<Vec<Sighting>> {
        let state = self.online()?;
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(state.sightings.clone())
    }

    async fn create_sighting(&self, at: Coordinates) -> Result<Sighting> {
        let mut state = self.online()?;

        let reporter = state.session_user.clone().ok_or(SightingError::Unauthorized)?;

        if let Some(status) = state.create_failure {
            return Err(SightingError::Server {
                status,
                message: "Failed to save location.".to_string(),
            });
        }

        let id = match state.forced_id.take() {
            Some(id) => id,
            None => {
                let id = SightingId::new(state.next_id.to_string());
                state.next_id += 1;
                id
            }
        };

        let sighting = Sighting {
            id,
            lat: at.lat,
            lng: at.lng,
            timestamp: state.timestamp.clone(),
            reporter_id: reporter,
        };
        state.sightings.push(sighting.clone());
        Ok(sighting)
    }

    async fn delete_sighting(&self, id: &SightingId) -> Result<()> {
        let mut state = self.online()?;

        let requester = state.session_user.clone().ok_or(SightingError::Unauthorized)?;

        let index = state
            .sightings
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| SightingError::Server {
                status: 404,
                message: "Location not found".to_string(),
            })?;

        if state.sightings[index].reporter_id != requester {
            return Err(SightingError::AuthorizationDenied(id.clone()));
        }

        state.sightings.remove(index);
        Ok(())
    }
}

/// One call made against a [`RecordingUi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Enablement(UiEnablement),
    Status(String),
    Acknowledgment(String),
}

/// UI double that records every update in order.
#[derive(Debug, Default)]
pub struct RecordingUi {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.lock().clone()
    }

    pub fn enablements(&self) -> Vec<UiEnablement> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Enablement(state) => Some(state.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_enablement(&self) -> Option<UiEnablement> {
        self.enablements().pop()
    }

    /// Status line history, including the status carried by enablement updates
    pub fn statuses(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Enablement(state) => Some(state.status.clone()),
                UiEvent::Status(message) => Some(message.clone()),
                UiEvent::Acknowledgment(_) => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<String> {
        self.statuses().pop()
    }

    pub fn acknowledgments(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Acknowledgment(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_acknowledgment(&self) -> Option<String> {
        self.acknowledgments().pop()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<UiEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl UiSurface for RecordingUi {
    fn apply_enablement(&self, state: &UiEnablement) {
        self.lock().push(UiEvent::Enablement(state.clone()));
    }

    fn set_status(&self, message: &str) {
        self.lock().push(UiEvent::Status(message.to_string()));
    }

    fn acknowledge(&self, message: &str) {
        self.lock().push(UiEvent::Acknowledgment(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sighting(id: &str, reporter: &str) -> Sighting {
        Sighting {
            id: id.into(),
            lat: 0.0,
            lng: 0.0,
            timestamp: "T".into(),
            reporter_id: reporter.into(),
        }
    }

    #[tokio::test]
    async fn test_mock_server_ownership() {
        let api = MockSightingApi::new().with_sightings(vec![sighting("1", "u1"), sighting("2", "u2")]);
        api.sign_in_as("u1");

        let denied = api.delete_sighting(&"2".into()).await.unwrap_err();
        assert!(matches!(denied, SightingError::AuthorizationDenied(_)));

        api.delete_sighting(&"1".into()).await.unwrap();
        assert_eq!(api.sightings().len(), 1);

        let missing = api.delete_sighting(&"9".into()).await.unwrap_err();
        assert!(matches!(missing, SightingError::Server { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_mock_server_requires_session_for_writes() {
        let api = MockSightingApi::new();

        let err = api.create_sighting(Coordinates::new(1.0, 2.0)).await.unwrap_err();
        assert!(matches!(err, SightingError::Unauthorized));
        assert!(api.sightings().is_empty());
    }

    #[tokio::test]
    async fn test_mock_server_offline() {
        let api = MockSightingApi::new();
        api.set_offline(true);

        assert!(api.list_sightings().await.unwrap_err().is_transport());
        assert_eq!(api.list_calls(), 0);
    }

    #[test]
    fn test_recording_ui_orders_events() {
        let ui = RecordingUi::new();
        ui.set_status("a");
        ui.acknowledge("b");
        ui.set_status("c");

        assert_eq!(ui.statuses(), vec!["a", "c"]);
        assert_eq!(ui.last_acknowledgment().as_deref(), Some("b"));
        assert_eq!(ui.events().len(), 3);
    }
}
