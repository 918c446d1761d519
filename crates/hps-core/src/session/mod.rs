//! Authentication session domain.
//!
//! # Module Structure
//!
//! - `model`: Signed-in user, session pair and the backend's auth response
//! - `event`: Notifications broadcast on session transitions
//! - `state`: The process-wide session holder backed by a `KeyValueStore`

mod event;
mod model;
mod state;

pub use event::SessionEvent;
pub use model::{AuthResponse, AuthenticatedSession, User};
pub use state::{SessionState, TOKEN_KEY, USER_KEY};
