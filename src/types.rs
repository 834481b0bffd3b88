//! Wire and domain types shared by every component

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier as it may appear on the wire: the server issues strings,
/// older data sets carry plain integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }
    };
}

string_id!(
    /// Server-assigned sighting identifier
    SightingId
);

string_id!(
    /// Identity of a signed-in reporter (the identity provider's subject)
    UserId
);

/// A point on the map in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One reported wildlife observation.
///
/// Owned by the server; the client only ever holds read-only copies and
/// replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    pub id: SightingId,
    pub lat: f64,
    pub lng: f64,
    pub timestamp: String,
    #[serde(rename = "user_id")]
    pub reporter_id: UserId,
}

impl Sighting {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Body of `GET /check_login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginStatus {
    pub logged_in: bool,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// The client's belief about who is signed in.
///
/// Replaced wholesale on every status check, login or logout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    user_id: Option<UserId>,
    logged_in: bool,
}

impl Session {
    /// No one signed in
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Signed in as `user_id`
    pub fn signed_in(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            logged_in: true,
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// Whether the current identity reported `sighting`
    pub fn owns(&self, sighting: &Sighting) -> bool {
        self.logged_in && self.user_id.as_ref() == Some(&sighting.reporter_id)
    }
}

impl From<LoginStatus> for Session {
    fn from(status: LoginStatus) -> Self {
        // A signed-out answer never carries an identity forward
        let user_id = if status.logged_in { status.user_id } else { None };
        Self {
            user_id,
            logged_in: status.logged_in,
        }
    }
}

/// Opaque credential produced by the identity-provider widget
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CredentialToken(String);

impl CredentialToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialToken(<redacted>)")
    }
}
