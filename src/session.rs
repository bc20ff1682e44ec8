//! Session struct definition
//!
//! Represents one connected client as seen by the relay actor: its outbound
//! event channel and where it is in the registration handshake.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::ServerEvent;
use crate::types::{DisplayName, SessionId};

/// Where a session is in its lifecycle
///
/// `Closed` has no variant: a closed session is removed from the relay's
/// maps, so it cannot be addressed at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, prompted for a name, nothing unique submitted yet
    AwaitingName,
    /// Holds a unique display name; participates in chat and rosters
    Registered(DisplayName),
}

/// Connected session information
#[derive(Debug)]
pub struct Session {
    /// Unique identifier for this session
    pub id: SessionId,
    /// Handshake / chat-loop state
    pub state: SessionState,
    /// Server → client event channel (the session's sink)
    pub sender: mpsc::Sender<ServerEvent>,
}

impl Session {
    /// Create a new session awaiting its name
    pub fn new(id: SessionId, sender: mpsc::Sender<ServerEvent>) -> Self {
        Self {
            id,
            state: SessionState::AwaitingName,
            sender,
        }
    }

    /// Send an event to this session
    ///
    /// Returns an error if the channel is closed (client disconnected).
    pub async fn send(&self, event: ServerEvent) -> Result<(), SendError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| SendError::ChannelClosed)
    }

    /// The session's display name, if registration has completed
    pub fn name(&self) -> Option<&DisplayName> {
        match &self.state {
            SessionState::AwaitingName => None,
            SessionState::Registered(name) => Some(name),
        }
    }

    /// Check whether registration has completed
    pub fn is_registered(&self) -> bool {
        matches!(self.state, SessionState::Registered(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_starts_awaiting_name() {
        let (tx, _rx) = mpsc::channel(32);
        let session = Session::new(SessionId::new(), tx);

        assert_eq!(session.state, SessionState::AwaitingName);
        assert!(!session.is_registered());
        assert!(session.name().is_none());
    }

    #[tokio::test]
    async fn test_session_registered_state() {
        let (tx, _rx) = mpsc::channel(32);
        let mut session = Session::new(SessionId::new(), tx);

        let name = DisplayName::new("alice").unwrap();
        session.state = SessionState::Registered(name.clone());

        assert!(session.is_registered());
        assert_eq!(session.name(), Some(&name));
    }

    #[tokio::test]
    async fn test_send_to_closed_channel_fails() {
        let (tx, rx) = mpsc::channel(32);
        let session = Session::new(SessionId::new(), tx);
        drop(rx);

        assert!(session.send(ServerEvent::SubmitName).await.is_err());
    }
}
