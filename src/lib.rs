//! Sighting Client - synchronization engine for a wildlife sighting map
//!
//! Keeps an in-memory set of sighting reports consistent with the server,
//! with the marker layer of the map, and with the signed-in identity.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 SightingApp                  │
//! │   (owns every component for the page life)   │
//! └──────┬──────────────┬──────────────┬─────────┘
//!        ▼              ▼              ▼
//! ┌─────────────┐ ┌────────────┐ ┌─────────────┐
//! │ SessionGate │ │ ReportFlow │ │ DeleteFlow  │
//! └─────────────┘ └─────┬──────┘ └──────┬──────┘
//!                       ▼               ▼
//!                 ┌──────────────────────────┐
//!                 │ OverlaySync              │
//!                 │  SightingStore + markers │
//!                 └──────────────────────────┘
//! ```
//!
//! The server is reached through [`SightingApi`]; the map, geolocation,
//! identity widget and page chrome through the traits in [`providers`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sighting_client::{
//!     ClientConfig, ConsoleUi, FixedGeolocation, HeadlessMap, HttpSightingApi, SightingApp,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::load("sighting-client.toml")?;
//! let api = Arc::new(HttpSightingApi::new(&config.server)?);
//!
//! let mut app = SightingApp::new(
//!     config,
//!     api,
//!     HeadlessMap::new(),
//!     Arc::new(FixedGeolocation::unsupported()),
//!     Arc::new(ConsoleUi),
//! );
//! app.start().await;
//!
//! let outcome = app.report_from_map_center().await;
//! # Ok(())
//! # }
//! ```

// Server contract
pub mod api;

// HTTP implementation of the server contract
#[cfg(feature = "client")]
pub mod http;

// External collaborators
pub mod providers;

// Components
pub mod session;
pub mod store;
pub mod popup;
pub mod overlay;
pub mod report;
pub mod delete;
pub mod app;

// In-memory collaborators
pub mod headless;
pub mod mock;

pub mod config;
pub mod error;
pub mod types;

pub use api::SightingApi;
pub use app::SightingApp;
pub use config::{ClientConfig, MapConfig, Messages, PopupPolicy, ServerConfig};
pub use delete::{DeleteFlow, DeleteOutcome};
pub use error::{GeolocationError, Result, SightingError};
pub use headless::{ConsoleUi, FixedGeolocation, HeadlessMap, TokenIdentity};
pub use overlay::OverlaySync;
pub use providers::{CredentialCallback, GeolocationProvider, IdentityProvider, MapProvider, UiSurface};
pub use report::{ReportFlow, ReportOutcome};
pub use session::{SessionGate, UiEnablement};
pub use store::SightingStore;
pub use types::{Coordinates, CredentialToken, LoginStatus, Session, Sighting, SightingId, UserId};

#[cfg(feature = "client")]
pub use http::HttpSightingApi;
