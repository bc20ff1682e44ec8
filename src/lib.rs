//! Line-protocol chat relay library
//!
//! A TCP chat relay speaking a newline-delimited text protocol. Clients
//! register a unique display name, then send plain lines (broadcast),
//! `target>>text` (direct) or `[a, b]>>>text` (multicast) messages.
//!
//! # Protocol
//! Server → client, one line each:
//! - `SUBMITNAME` — prompt for a display name (repeated until unique)
//! - `NAMEACCEPTED` — registration succeeded
//! - `MESSAGE <sender>: <text>` — a routed chat message
//! - `USERS [a, b]` — the other online names, pushed on every join/leave
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatRelay` is the central actor owning the name registry and every
//!   session's sink; all registry access goes through its command channel,
//!   so name check-and-insert, teardown and delivery enumeration never race
//! - Each connection has a `handler` task framing the stream with
//!   `LineCodec` and shuttling lines/events to and from the relay
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use chat_relay::{ChatRelay, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:9001").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatRelay::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod address;
pub mod codec;
pub mod error;
pub mod handler;
pub mod message;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use address::{resolve, AddressIntent};
pub use codec::{CodecError, LineCodec};
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use message::ServerEvent;
pub use server::{ChatRelay, RelayCommand};
pub use session::{Session, SessionState};
pub use types::{DisplayName, SessionId};
