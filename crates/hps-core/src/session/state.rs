//! Process-wide session holder.

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::event::SessionEvent;
use super::model::{AuthenticatedSession, User};
use crate::error::{HpsError, Result};
use crate::storage::KeyValueStore;

/// Storage key of the backend session token.
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key of the JSON-serialized user.
pub const USER_KEY: &str = "auth_user";

const EVENT_CAPACITY: usize = 16;

/// Holds the current session in memory and mirrors it to a `KeyValueStore`.
///
/// State machine: Unauthenticated → `establish` → Authenticated →
/// (`clear` | `invalidate`) → Unauthenticated. Token and user are always
/// stored and removed together.
pub struct SessionState {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Option<AuthenticatedSession>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionState {
    /// Creates an unauthenticated state without reading the store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            current: RwLock::new(None),
            events,
        }
    }

    /// Rehydrates the session persisted by a previous run.
    ///
    /// Unreadable entries are removed and the state starts unauthenticated;
    /// this never fails.
    pub fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let state = Self::new(store);

        match state.load_persisted() {
            Ok(Some(session)) => {
                info!(
                    "[Session] Restored session for {}",
                    session.user.display_name()
                );
                state.replace(Some(session));
            }
            Ok(None) => debug!("[Session] No persisted session"),
            Err(e) => {
                warn!("[Session] Discarding unreadable persisted session: {}", e);
                if let Err(e) = state.store.remove_many(&[TOKEN_KEY, USER_KEY]) {
                    warn!("[Session] Failed to remove corrupted session entries: {}", e);
                }
            }
        }

        state
    }

    /// `Ok(None)` only when neither entry exists. A lone entry or a user
    /// that decodes to `null` is as unusable as malformed JSON.
    fn load_persisted(&self) -> Result<Option<AuthenticatedSession>> {
        let token = self.store.get(TOKEN_KEY)?;
        let user = self.store.get(USER_KEY)?;

        match (token, user) {
            (None, None) => Ok(None),
            (Some(token), Some(user_json)) if !token.is_empty() => {
                match serde_json::from_str::<Option<User>>(&user_json)? {
                    Some(user) => Ok(Some(AuthenticatedSession { token, user })),
                    None => Err(HpsError::storage("persisted user is null")),
                }
            }
            _ => Err(HpsError::storage("incomplete persisted session")),
        }
    }

    /// Current bearer token, if signed in.
    pub fn token(&self) -> Option<String> {
        self.snapshot().map(|s| s.token)
    }

    /// Current user, if signed in.
    pub fn user(&self) -> Option<User> {
        self.snapshot().map(|s| s.user)
    }

    /// A copy of the whole session.
    pub fn snapshot(&self) -> Option<AuthenticatedSession> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Persists and activates a new session.
    ///
    /// Nothing changes in memory when persisting fails.
    pub fn establish(&self, session: AuthenticatedSession) -> Result<()> {
        let user_json = serde_json::to_string(&session.user)?;
        self.store.set_many(&[
            (TOKEN_KEY, session.token.clone()),
            (USER_KEY, user_json),
        ])?;

        let user = session.user.clone();
        info!("[Session] Signed in as {}", user.display_name());
        self.replace(Some(session));
        self.publish(SessionEvent::Established { user });
        Ok(())
    }

    /// Ends the session on user request.
    ///
    /// The in-memory session is dropped even when the store cannot be
    /// updated; the storage error is still returned.
    pub fn clear(&self) -> Result<()> {
        self.replace(None);
        let removed = self.store.remove_many(&[TOKEN_KEY, USER_KEY]);
        info!("[Session] Signed out");
        self.publish(SessionEvent::LoggedOut);
        removed
    }

    /// Ends the session because the backend rejected its token.
    pub fn invalidate(&self) {
        self.replace(None);
        if let Err(e) = self.store.remove_many(&[TOKEN_KEY, USER_KEY]) {
            warn!("[Session] Failed to remove persisted session: {}", e);
        }
        warn!("[Session] Session rejected by backend, signed out");
        self.publish(SessionEvent::Invalidated);
    }

    /// Fails with `Unauthorized` unless signed in.
    pub fn require_authenticated(&self) -> Result<AuthenticatedSession> {
        self.snapshot().ok_or_else(HpsError::unauthorized)
    }

    /// Subscribes to session transitions.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn replace(&self, session: Option<AuthenticatedSession>) {
        match self.current.write() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
