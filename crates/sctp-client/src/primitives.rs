//! # Protocol Primitives
//!
//! Fixed wire constants for the SCTP protocol.
//!
//! These values are shared with the store and are immutable at runtime.
//! Changing any of them breaks compatibility with every deployed server.
//!
//! ## Byte Order
//!
//! Every multi-byte integer of every command is **little-endian**. There is
//! no negotiation; client and server must agree.

/// Size of the request header: command (1) + flags (1) + request id (4) + payload length (4).
pub const REQUEST_HEADER_SIZE: usize = 10;

/// Size of the response header: command (1) + request id (4) + result (1) + payload length (4).
pub const RESPONSE_HEADER_SIZE: usize = 10;

/// Encoded size of one element address.
pub const ADDR_SIZE: usize = 4;

/// Encoded size of an element type mask.
pub const TYPE_SIZE: usize = 2;

/// Size of a `u32` count or length prefix.
pub const COUNT_SIZE: usize = 4;

/// Encoded size of one statistics record: eleven `u64` counters + one flag byte.
pub const STAT_RECORD_SIZE: usize = 11 * 8 + 1;

/// Flags byte sent in every request. Always zero in this protocol version.
pub const REQUEST_FLAGS: u8 = 0;

/// Request id sent in every request. The client never correlates by id.
pub const REQUEST_ID: u32 = 0;

/// Default TCP port the store listens on.
pub const DEFAULT_PORT: u16 = 55770;

/// Default store host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default connect timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Content sent in place of an empty link content.
///
/// The store rejects zero-length content payloads.
pub const EMPTY_CONTENT_PLACEHOLDER: &[u8] = b" ";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum declared payload length accepted in a response header (64 MiB).
///
/// Checked before any allocation so a corrupt header cannot exhaust memory.
pub const MAX_RESPONSE_PAYLOAD: u32 = 64 * 1024 * 1024;
