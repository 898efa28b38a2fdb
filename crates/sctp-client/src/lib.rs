//! # sctp-client
//!
//! Blocking client for the SCTP protocol of a semantic-graph store.
//!
//! The store keeps typed nodes, links (elements carrying byte content) and
//! directed arcs. This crate speaks its binary request/response protocol
//! over one stream socket. It does not implement the store.
//!
//! ## Layers
//!
//! - `types` → element addresses and the address codec, type masks, wire codes, errors
//! - `formats` → 10-byte frame headers and little-endian payload encoding
//! - `transport` → one request frame out, one complete response frame back
//! - `client` → the operation façade (`SctpClient`)
//!
//! ## Outcomes vs. Errors
//!
//! A non-OK result code from the store is an expected outcome and becomes
//! `false`, `None` or an empty list. Only transport failures are `Err`.
//!
//! ```no_run
//! use sctp_client::{ClientConfig, Pattern, SctpClient, ScType};
//!
//! # fn main() -> sctp_client::Result<()> {
//! let mut client = SctpClient::connect(&ClientConfig::default())?;
//! if let Some(node) = client.create_node(ScType::NODE_CONST)? {
//!     for m in client.iterate(&Pattern::FixedAnyAny { source: node })? {
//!         println!("{:?}", m.as_slice());
//!     }
//! }
//! client.shutdown()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod agent;
pub mod client;
pub mod config;
pub mod events;
pub mod formats;
pub mod pattern;
pub mod primitives;
pub mod transport;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    ClientError, CommandCode, Result, ResultCode, ScAddr, ScType, StatSample, pack, unpack,
};

// =============================================================================
// RE-EXPORTS: Client
// =============================================================================

pub use agent::{Initiation, QuestionInitiator, initiate_question};
pub use client::SctpClient;
pub use config::ClientConfig;
pub use events::{
    EventId, EventNotification, EventQueue, EventSink, EventType, Subscription, decode_emitted,
};
pub use pattern::{Pattern, PatternMatch, Slot};
pub use transport::{Connection, Transport, connect_tcp};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{
    PayloadReader, PayloadWriter, RequestHeader, Response, ResponseHeader, encode_request,
};
