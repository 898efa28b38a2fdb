//! # Wire Formats
//!
//! Frame headers and payload encoding for the SCTP protocol.
//!
//! Pure transformations between values and bytes - no socket I/O.
//! The transport layer moves the bytes.

mod frame;
mod payload;

pub use frame::{RequestHeader, Response, ResponseHeader, encode_request};
pub use payload::{PayloadReader, PayloadWriter};
