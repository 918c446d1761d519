//! Sign-in, registration and sign-out.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use hps_core::api::PresetApi;
use hps_core::session::{AuthResponse, SessionState, User};
use hps_core::{HpsError, Result};
use tracing::{info, warn};

use crate::messages::LOGIN_FAILED;

/// How a login or registration attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Success { user: User },
    Failure { error: String },
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Exchanges identity-provider tokens for a backend session.
pub struct AuthService {
    api: Arc<dyn PresetApi>,
    session: Arc<SessionState>,
    loading: AtomicBool,
}

/// Resets the loading flag however the exchange ends.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Clone, Copy)]
enum Exchange {
    Login,
    Register,
}

impl AuthService {
    pub fn new(api: Arc<dyn PresetApi>, session: Arc<SessionState>) -> Self {
        Self {
            api,
            session,
            loading: AtomicBool::new(false),
        }
    }

    /// Signs in with an identity token (`POST /auth/login`).
    ///
    /// Never fails: errors come back as [`LoginOutcome::Failure`] and leave
    /// the current session untouched.
    pub async fn login(&self, identity_token: &str) -> LoginOutcome {
        self.exchange(Exchange::Login, identity_token).await
    }

    /// Creates an account (`POST /auth/register`), then signs in with it.
    pub async fn register(&self, identity_token: &str) -> LoginOutcome {
        self.exchange(Exchange::Register, identity_token).await
    }

    /// Signs out.
    ///
    /// The backend is told first; if that fails the local session is still
    /// cleared.
    pub async fn logout(&self) -> Result<()> {
        if self.session.is_authenticated()
            && let Err(e) = self.api.logout().await
        {
            warn!("[Auth] Backend logout failed: {}", e);
        }
        self.session.clear()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.user()
    }

    /// True while a login or registration request is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    async fn exchange(&self, kind: Exchange, identity_token: &str) -> LoginOutcome {
        let _loading = LoadingGuard::start(&self.loading);

        let response = match kind {
            Exchange::Login => self.api.login(identity_token).await,
            Exchange::Register => self.api.register(identity_token).await,
        };

        match response.and_then(|r| self.activate(r)) {
            Ok(user) => {
                info!("[Auth] Signed in as {}", user.display_name());
                LoginOutcome::Success { user }
            }
            Err(e) => {
                warn!("[Auth] Sign-in failed: {}", e);
                LoginOutcome::Failure {
                    error: failure_message(&e),
                }
            }
        }
    }

    fn activate(&self, response: AuthResponse) -> Result<User> {
        let session = response.into_session()?;
        let user = session.user.clone();
        self.session.establish(session)?;
        Ok(user)
    }
}

/// Backend detail first, then the error's own message.
fn failure_message(error: &HpsError) -> String {
    let message = match error {
        HpsError::Validation(message) => message.clone(),
        other => other.reason(),
    };
    if message.trim().is_empty() {
        LOGIN_FAILED.to_string()
    } else {
        message
    }
}
