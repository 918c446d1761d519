//! Command handlers.

pub mod account;
pub mod catalog;
pub mod config;
pub mod search;
pub mod transfer;
mod utils;

use hps_core::session::SessionEvent;
use tokio::sync::broadcast;

/// Drains pending session events and reports whether the backend rejected
/// the session along the way.
pub fn session_was_invalidated(events: &mut broadcast::Receiver<SessionEvent>) -> bool {
    let mut invalidated = false;
    loop {
        match events.try_recv() {
            Ok(SessionEvent::Invalidated) => invalidated = true,
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            Err(_) => break,
        }
    }
    invalidated
}
