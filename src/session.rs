//! Session tracking and the UI state derived from it
//!
//! The gate never guesses: a network failure leaves the previous session in
//! place, and only an explicit "not logged in" answer signs the client out.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::SightingApi;
use crate::config::Messages;
use crate::error::{Result, SightingError};
use crate::providers::UiSurface;
use crate::types::{CredentialToken, Session};

/// Which controls are usable and what the status line says
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEnablement {
    /// Both report controls
    pub report_enabled: bool,
    pub logout_visible: bool,
    /// Identity-provider widget
    pub sign_in_visible: bool,
    pub status: String,
}

impl UiEnablement {
    /// Derived from `logged_in` alone
    pub fn for_session(session: &Session, messages: &Messages) -> Self {
        let logged_in = session.is_logged_in();
        Self {
            report_enabled: logged_in,
            logout_visible: logged_in,
            sign_in_visible: !logged_in,
            status: if logged_in {
                messages.ready_to_report.clone()
            } else {
                messages.sign_in_prompt.clone()
            },
        }
    }
}

/// Owns the current [`Session`] and republishes UI enablement whenever it
/// is replaced.
pub struct SessionGate {
    api: Arc<dyn SightingApi>,
    ui: Arc<dyn UiSurface>,
    messages: Messages,
    session: Session,
}

impl SessionGate {
    /// Start signed out; nothing is published until [`publish`](Self::publish)
    pub fn new(api: Arc<dyn SightingApi>, ui: Arc<dyn UiSurface>, messages: Messages) -> Self {
        Self {
            api,
            ui,
            messages,
            session: Session::anonymous(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Push the enablement for the current session to the UI
    pub fn publish(&self) {
        self.ui
            .apply_enablement(&UiEnablement::for_session(&self.session, &self.messages));
    }

    /// Ask the server who we are and adopt the answer
    pub async fn refresh(&mut self) -> Result<Session> {
        match self.api.check_login().await {
            Ok(status) => {
                self.replace(Session::from(status));
                Ok(self.session.clone())
            }
            Err(e) => {
                error!(error = %e, "Login status check failed");
                Err(e)
            }
        }
    }

    /// Submit a credential; on success re-read the session from the server
    pub async fn login(&mut self, token: &CredentialToken) -> Result<Session> {
        if let Err(e) = self.api.login(token).await {
            match &e {
                SightingError::LoginRejected { status } => {
                    warn!(status, "Login rejected by server");
                }
                other => error!(error = %other, "Login failed"),
            }
            return Err(e);
        }

        info!("Login accepted");
        self.refresh().await
    }

    /// End the server session; the local session is cleared only on success
    pub async fn logout(&mut self) -> Result<Session> {
        if let Err(e) = self.api.logout().await {
            error!(error = %e, "Logout failed");
            return Err(e);
        }

        info!("Logged out");
        self.replace(Session::anonymous());
        Ok(self.session.clone())
    }

    fn replace(&mut self, session: Session) {
        self.session = session;
        self.publish();
    }
}
