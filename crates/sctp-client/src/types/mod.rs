//! # Core Type Definitions
//!
//! This module contains the value types shared by every layer of the client:
//! - Element addresses (`ScAddr`) and the address codec
//! - Element type masks (`ScType`)
//! - Wire codes (`CommandCode`, `ResultCode`)
//! - Statistics samples (`StatSample`)
//! - Error types (`ClientError`)

mod addr;
mod element_type;

pub use addr::{ScAddr, pack, unpack};
pub use element_type::ScType;

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

// =============================================================================
// COMMAND CODES
// =============================================================================

/// Operation identifier carried in the first byte of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandCode {
    CheckElement,
    GetElementType,
    EraseElement,
    CreateNode,
    CreateLink,
    CreateArc,
    GetArc,
    GetLinkContent,
    FindLinks,
    SetLinkContent,
    IterateElements,
    /// Reserved for advanced construction iteration. Never issued.
    IterateConstruction,
    EventCreate,
    EventDestroy,
    EventEmit,
    FindElementBySysIdtf,
    SetSysIdtf,
    Statistics,
}

impl CommandCode {
    /// Wire value.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::CheckElement => 0x01,
            Self::GetElementType => 0x02,
            Self::EraseElement => 0x03,
            Self::CreateNode => 0x04,
            Self::CreateLink => 0x05,
            Self::CreateArc => 0x06,
            Self::GetArc => 0x07,
            Self::GetLinkContent => 0x09,
            Self::FindLinks => 0x0a,
            Self::SetLinkContent => 0x0b,
            Self::IterateElements => 0x0c,
            Self::IterateConstruction => 0x0d,
            Self::EventCreate => 0x0e,
            Self::EventDestroy => 0x0f,
            Self::EventEmit => 0x10,
            Self::FindElementBySysIdtf => 0xa0,
            Self::SetSysIdtf => 0xa1,
            Self::Statistics => 0xa2,
        }
    }

    /// Parse a wire value; `None` for unknown codes.
    #[must_use]
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x01 => Some(Self::CheckElement),
            0x02 => Some(Self::GetElementType),
            0x03 => Some(Self::EraseElement),
            0x04 => Some(Self::CreateNode),
            0x05 => Some(Self::CreateLink),
            0x06 => Some(Self::CreateArc),
            0x07 => Some(Self::GetArc),
            0x09 => Some(Self::GetLinkContent),
            0x0a => Some(Self::FindLinks),
            0x0b => Some(Self::SetLinkContent),
            0x0c => Some(Self::IterateElements),
            0x0d => Some(Self::IterateConstruction),
            0x0e => Some(Self::EventCreate),
            0x0f => Some(Self::EventDestroy),
            0x10 => Some(Self::EventEmit),
            0xa0 => Some(Self::FindElementBySysIdtf),
            0xa1 => Some(Self::SetSysIdtf),
            0xa2 => Some(Self::Statistics),
            _ => None,
        }
    }
}

// =============================================================================
// RESULT CODES
// =============================================================================

/// Outcome carried in the response header.
///
/// Anything but `Ok` is an expected protocol outcome, not a client error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    Ok,
    Fail,
    /// The element wasn't found.
    NoElement,
    NoRights,
    /// A code this client doesn't know. Treated as a failure.
    Unknown(u8),
}

impl ResultCode {
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Ok => 0x00,
            Self::Fail => 0x01,
            Self::NoElement => 0x02,
            Self::NoRights => 0x03,
            Self::Unknown(v) => v,
        }
    }

    #[must_use]
    pub const fn from_u8(v: u8) -> Self {
        match v {
            0x00 => Self::Ok,
            0x01 => Self::Fail,
            0x02 => Self::NoElement,
            0x03 => Self::NoRights,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

/// One timestamped snapshot of the store's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatSample {
    /// Sample time, milliseconds since the Unix epoch.
    pub time: u64,
    pub node_count: u64,
    pub arc_count: u64,
    pub link_count: u64,
    pub live_node_count: u64,
    pub live_arc_count: u64,
    pub live_link_count: u64,
    /// Erased elements not yet reclaimed.
    pub empty_count: u64,
    pub connection_count: u64,
    /// Processed commands, including failed ones.
    pub command_count: u64,
    pub command_error_count: u64,
    /// Set on the baseline sample the store records at startup.
    pub is_initial: bool,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the client.
///
/// Protocol outcomes (a non-OK result code) are never errors; they become
/// `None`/`false`/empty results. These variants are transport, decoding and
/// caller-input failures.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The TCP connection could not be established.
    #[error("Cannot connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The socket failed while sending or receiving.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The peer closed the connection in the middle of a frame.
    #[error("Connection closed after {received} of {expected} bytes")]
    ConnectionClosed { expected: usize, received: usize },

    /// A configured read, write or connect timeout expired.
    #[error("Timed out waiting for the store")]
    Timeout,

    /// The response header declared a payload above the accepted limit.
    #[error("Response payload of {0} bytes exceeds the limit")]
    PayloadTooLarge(u32),

    /// Bytes could not be decoded into the expected value.
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Text could not be parsed as an element address.
    #[error("Invalid element address: {0}")]
    InvalidAddr(String),

    /// Text could not be parsed as an element type.
    #[error("Invalid element type: {0}")]
    InvalidType(String),

    /// The Fixed/Any slot layout has no matching iterator shape.
    #[error("Unsupported pattern: {0}")]
    UnsupportedPattern(String),

    /// Client configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The client was already shut down.
    #[error("Connection already shut down")]
    Closed,
}

impl ClientError {
    /// True when the failure can leave part of a frame unread, so the
    /// stream is no longer on a frame boundary.
    #[must_use]
    pub fn breaks_stream(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::ConnectionClosed { .. } | Self::Timeout | Self::PayloadTooLarge(_)
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

// =============================================================================
// TESTS
// =============================================================================
