//! Basic type definitions for the chat relay
//!
//! Provides newtype wrappers for type safety:
//! - `SessionId`: UUID-based unique session identifier
//! - `DisplayName`: non-empty screen name, unique while its session lives

use std::borrow::Borrow;

use uuid::Uuid;

/// Unique session identifier (newtype pattern)
///
/// Wraps a UUID v4 for type-safe session identification.
/// Implements Hash and Eq for use as HashMap keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered display name
///
/// A name a client submitted during the handshake. Must be non-empty;
/// uniqueness among live sessions is enforced by the relay actor, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayName(String);

impl DisplayName {
    /// Wrap a submitted line as a display name; rejects the empty string.
    pub fn new(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Lets a HashMap keyed by DisplayName be probed with a plain &str
// (addressing targets arrive as raw text).
impl Borrow<str> for DisplayName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_unique() {
        let id1 = SessionId::new();
        let id2 = SessionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_display_name_rejects_empty() {
        assert!(DisplayName::new("").is_none());
        assert!(DisplayName::new("alice").is_some());
    }

    #[test]
    fn test_display_name_str_lookup() {
        use std::collections::HashMap;

        let name = DisplayName::new("alice").unwrap();
        let mut map = HashMap::new();
        map.insert(name, 1u32);

        assert_eq!(map.get("alice"), Some(&1));
        assert_eq!(map.get("bob"), None);
    }
}
