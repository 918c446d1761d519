use super::model::User;

/// Session transitions, broadcast to every subscriber.
///
/// Stateful consumers reset themselves on `Invalidated` so nothing that was
/// built for the old session survives a rejected token.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A login or registration succeeded.
    Established { user: User },
    /// The user logged out.
    LoggedOut,
    /// The backend rejected the token (HTTP 401); the session was cleared.
    Invalidated,
}
