//! ChatRelay actor implementation
//!
//! The central actor that owns all shared state: the session table, the name
//! registry and the name→sink directory. Uses the Actor pattern with mpsc
//! channels for message passing, so name check-and-insert, teardown and
//! delivery enumeration are all serialized through one task — no session can
//! observe the registry mid-update.

use std::collections::{HashMap, HashSet};

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::address::{self, AddressIntent};
use crate::message::ServerEvent;
use crate::session::{Session, SessionState};
use crate::types::{DisplayName, SessionId};

/// Commands sent from connection handlers to the ChatRelay actor
#[derive(Debug)]
pub enum RelayCommand {
    /// New client connected
    Connect {
        session_id: SessionId,
        sender: mpsc::Sender<ServerEvent>,
    },
    /// One line of text arrived from the client
    Inbound {
        session_id: SessionId,
        line: String,
    },
    /// Client disconnected (EOF or I/O failure)
    Disconnect {
        session_id: SessionId,
    },
}

/// The main ChatRelay actor
///
/// `names` doubles as the registry (its key set) and the directory (key →
/// session id → sink), so the two can never disagree and are torn down as
/// one step.
pub struct ChatRelay {
    /// All connected sessions, registered or not: SessionId -> Session
    sessions: HashMap<SessionId, Session>,
    /// Registered names: DisplayName -> SessionId
    names: HashMap<DisplayName, SessionId>,
    /// Command receiver channel
    receiver: mpsc::Receiver<RelayCommand>,
}

impl ChatRelay {
    /// Create a new ChatRelay with the given command receiver
    pub fn new(receiver: mpsc::Receiver<RelayCommand>) -> Self {
        Self {
            sessions: HashMap::new(),
            names: HashMap::new(),
            receiver,
        }
    }

    /// Run the ChatRelay event loop
    ///
    /// Continuously receives and processes commands until all senders are
    /// dropped.
    pub async fn run(mut self) {
        info!("ChatRelay started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd).await;
        }

        info!("ChatRelay shutting down");
    }

    /// Process a single command
    async fn handle_command(&mut self, cmd: RelayCommand) {
        match cmd {
            RelayCommand::Connect { session_id, sender } => {
                self.handle_connect(session_id, sender).await;
            }
            RelayCommand::Inbound { session_id, line } => {
                self.handle_inbound(session_id, line).await;
            }
            RelayCommand::Disconnect { session_id } => {
                self.handle_disconnect(session_id).await;
            }
        }
    }

    /// Handle new client connection: track the session and start the
    /// handshake by prompting for a name.
    async fn handle_connect(&mut self, session_id: SessionId, sender: mpsc::Sender<ServerEvent>) {
        info!("session {} connected", session_id);
        let session = Session::new(session_id, sender);
        let _ = session.send(ServerEvent::SubmitName).await;
        self.sessions.insert(session_id, session);
        debug!(
            "total sessions: {}, registered: {}",
            self.sessions.len(),
            self.names.len()
        );
    }

    /// Handle client disconnection
    ///
    /// Safe to deliver more than once: a session already removed is a no-op,
    /// so the name can never be freed twice.
    async fn handle_disconnect(&mut self, session_id: SessionId) {
        let Some(session) = self.sessions.remove(&session_id) else {
            return;
        };
        info!("session {} disconnected", session_id);

        if let SessionState::Registered(name) = session.state {
            self.names.remove(&name);
            info!("name '{}' released", name);
            // Remaining clients see the departure.
            self.refresh_roster().await;
        }

        debug!(
            "total sessions: {}, registered: {}",
            self.sessions.len(),
            self.names.len()
        );
    }

    /// Route one inbound line according to the session's handshake state
    async fn handle_inbound(&mut self, session_id: SessionId, line: String) {
        let state = match self.sessions.get(&session_id) {
            Some(session) => session.state.clone(),
            None => return,
        };

        match state {
            SessionState::AwaitingName => self.handle_name_submission(session_id, line).await,
            SessionState::Registered(from) => {
                match address::resolve(&line) {
                    AddressIntent::Broadcast(text) => {
                        self.deliver_broadcast(&from, &text).await;
                    }
                    AddressIntent::Direct { target, text } => {
                        self.deliver_direct(session_id, &from, &target, &text).await;
                    }
                    AddressIntent::Multicast { targets, text } => {
                        self.deliver_multicast(session_id, &from, &targets, &text)
                            .await;
                    }
                }
            }
        }
    }

    /// Handle a name submission: atomic check-and-insert against the
    /// registry. Rejection (empty or taken) just re-prompts; it is the
    /// documented retry policy, not an error.
    async fn handle_name_submission(&mut self, session_id: SessionId, line: String) {
        let Some(name) = DisplayName::new(&line) else {
            self.reprompt(session_id).await;
            return;
        };

        if self.names.contains_key(name.as_str()) {
            debug!("session {} requested taken name '{}'", session_id, name);
            self.reprompt(session_id).await;
            return;
        }

        let Some(session) = self.sessions.get_mut(&session_id) else {
            return;
        };
        session.state = SessionState::Registered(name.clone());
        let _ = session.send(ServerEvent::NameAccepted).await;

        // Registry and directory entry appear together, before any delivery
        // can enumerate them.
        self.names.insert(name.clone(), session_id);
        info!("session {} registered as '{}'", session_id, name);

        self.refresh_roster().await;
    }

    /// Re-send the name prompt after a rejected submission
    async fn reprompt(&self, session_id: SessionId) {
        if let Some(session) = self.sessions.get(&session_id) {
            let _ = session.send(ServerEvent::SubmitName).await;
        }
    }

    /// Deliver a chat line to every registered session, sender included
    ///
    /// Sends go into bounded per-session channels: a closed channel is
    /// skipped, a full one blocks until the recipient drains. Shedding to
    /// slow consumers with `try_send` is a possible extension here.
    async fn deliver_broadcast(&self, from: &DisplayName, text: &str) {
        debug!("broadcast from '{}'", from);
        let event = ServerEvent::Chat {
            from: from.clone(),
            text: text.to_string(),
        };
        for session_id in self.names.values() {
            if let Some(session) = self.sessions.get(session_id) {
                let _ = session.send(event.clone()).await;
            }
        }
    }

    /// Deliver a chat line to one named recipient, echoing to the sender
    ///
    /// An unregistered target drops the message entirely, echo included.
    async fn deliver_direct(
        &self,
        sender_id: SessionId,
        from: &DisplayName,
        target: &str,
        text: &str,
    ) {
        let Some(target_id) = self.names.get(target) else {
            debug!("direct target '{}' not registered, dropping", target);
            return;
        };

        let event = ServerEvent::Chat {
            from: from.clone(),
            text: text.to_string(),
        };
        if let Some(session) = self.sessions.get(target_id) {
            let _ = session.send(event.clone()).await;
        }
        if let Some(session) = self.sessions.get(&sender_id) {
            let _ = session.send(event).await;
        }
    }

    /// Deliver a chat line to each registered name in the target list
    ///
    /// Unknown names are skipped silently. Each recipient gets the message
    /// at most once; the sender gets exactly one echo even if listed.
    async fn deliver_multicast(
        &self,
        sender_id: SessionId,
        from: &DisplayName,
        targets: &[String],
        text: &str,
    ) {
        let event = ServerEvent::Chat {
            from: from.clone(),
            text: text.to_string(),
        };

        let mut delivered: HashSet<SessionId> = HashSet::new();
        for target in targets {
            let Some(&target_id) = self.names.get(target.as_str()) else {
                debug!("multicast target '{}' not registered, skipping", target);
                continue;
            };
            if target_id == sender_id || !delivered.insert(target_id) {
                continue;
            }
            if let Some(session) = self.sessions.get(&target_id) {
                let _ = session.send(event.clone()).await;
            }
        }

        if let Some(session) = self.sessions.get(&sender_id) {
            let _ = session.send(event).await;
        }
    }

    /// Push a fresh roster to every registered session
    ///
    /// Each recipient sees all registered names except its own, sorted.
    /// Invoked after every registry membership change.
    async fn refresh_roster(&self) {
        for (name, session_id) in &self.names {
            let mut others: Vec<DisplayName> = self
                .names
                .keys()
                .filter(|n| *n != name)
                .cloned()
                .collect();
            others.sort();

            if let Some(session) = self.sessions.get(session_id) {
                let _ = session.send(ServerEvent::Roster { names: others }).await;
            }
        }
    }
}
