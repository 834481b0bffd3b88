//! The sighting server contract.
//!
//! | Operation | Request | Response |
//! |---|---|---|
//! | check session | `GET /check_login` | `{ logged_in, user_id }` |
//! | sign in | `POST /login` `{ token }` | 2xx on success |
//! | sign out | `POST /logout` | 2xx on success |
//! | list sightings | `GET /locations` | array of sightings |
//! | create sighting | `POST /locations` `{ lat, lng }` | created sighting |
//! | delete sighting | `DELETE /locations/{id}` | 2xx; 403 when not the owner |

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Coordinates, CredentialToken, LoginStatus, Sighting, SightingId};

/// Server operations consumed by the synchronization engine.
///
/// Implementations map statuses onto [`SightingError`](crate::SightingError):
/// 401 becomes `Unauthorized`, 403 on delete becomes `AuthorizationDenied`,
/// a refused login becomes `LoginRejected`, any other non-2xx becomes
/// `Server`, and an unreachable server becomes `Transport`.
#[async_trait]
pub trait SightingApi: Send + Sync {
    /// Current login state of this client's server session
    async fn check_login(&self) -> Result<LoginStatus>;

    /// Exchange an identity-provider credential for a server session
    async fn login(&self, token: &CredentialToken) -> Result<()>;

    /// End the server session
    async fn logout(&self) -> Result<()>;

    /// Every sighting known to the server
    async fn list_sightings(&self) -> Result<Vec<Sighting>>;

    /// Report a sighting at `at`; the server assigns id, timestamp and reporter
    async fn create_sighting(&self, at: Coordinates) -> Result<Sighting>;

    /// Remove a sighting the current session owns
    async fn delete_sighting(&self, id: &SightingId) -> Result<()>;
}
