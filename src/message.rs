//! Wire protocol definitions
//!
//! The server speaks a newline-delimited text protocol: every event is a
//! single line with a literal prefix. `Display` renders the wire form.

use crate::types::DisplayName;

/// Server → client event
///
/// Each variant renders as exactly one protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Ask the client for a display name (sent on connect and on every
    /// rejected submission)
    SubmitName,
    /// The submitted name was unique and is now registered
    NameAccepted,
    /// A chat message routed to this client
    Chat { from: DisplayName, text: String },
    /// The set of other online names, pushed after every join or leave
    Roster { names: Vec<DisplayName> },
}

impl std::fmt::Display for ServerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerEvent::SubmitName => write!(f, "SUBMITNAME"),
            ServerEvent::NameAccepted => write!(f, "NAMEACCEPTED"),
            ServerEvent::Chat { from, text } => write!(f, "MESSAGE {}: {}", from, text),
            ServerEvent::Roster { names } => {
                write!(f, "USERS [")?;
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", name)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DisplayName {
        DisplayName::new(s).unwrap()
    }

    #[test]
    fn test_handshake_events_render() {
        assert_eq!(ServerEvent::SubmitName.to_string(), "SUBMITNAME");
        assert_eq!(ServerEvent::NameAccepted.to_string(), "NAMEACCEPTED");
    }

    #[test]
    fn test_chat_event_render() {
        let event = ServerEvent::Chat {
            from: name("alice"),
            text: "hi there".to_string(),
        };
        assert_eq!(event.to_string(), "MESSAGE alice: hi there");
    }

    #[test]
    fn test_roster_render() {
        let event = ServerEvent::Roster {
            names: vec![name("alice"), name("bob")],
        };
        assert_eq!(event.to_string(), "USERS [alice, bob]");
    }

    #[test]
    fn test_empty_roster_render() {
        let event = ServerEvent::Roster { names: vec![] };
        assert_eq!(event.to_string(), "USERS []");
    }
}
