//! # Frame Headers
//!
//! Request: `command u8 | flags u8 | request_id u32 | payload_len u32 | payload`
//!
//! Response: `command u8 | request_id u32 | result u8 | payload_len u32 | payload`
//!
//! Both headers are ten bytes. All integers are little-endian.

use crate::primitives::{
    MAX_RESPONSE_PAYLOAD, REQUEST_FLAGS, REQUEST_HEADER_SIZE, REQUEST_ID, RESPONSE_HEADER_SIZE,
};
use crate::types::{ClientError, CommandCode, ResultCode};

// =============================================================================
// REQUEST HEADER
// =============================================================================

/// Header preceding every request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestHeader {
    pub command: CommandCode,
    pub flags: u8,
    pub request_id: u32,
    pub payload_len: u32,
}

impl RequestHeader {
    /// Header for `command` with the protocol's fixed flags and request id.
    #[must_use]
    pub fn new(command: CommandCode, payload_len: u32) -> Self {
        Self {
            command,
            flags: REQUEST_FLAGS,
            request_id: REQUEST_ID,
            payload_len,
        }
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; REQUEST_HEADER_SIZE] {
        let mut bytes = [0u8; REQUEST_HEADER_SIZE];
        bytes[0] = self.command.to_u8();
        bytes[1] = self.flags;
        bytes[2..6].copy_from_slice(&self.request_id.to_le_bytes());
        bytes[6..10].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes
    }

    /// Parse a request header. Used by test doubles standing in for the store.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ClientError> {
        if bytes.len() < REQUEST_HEADER_SIZE {
            return Err(ClientError::Decode("request header too short".to_string()));
        }
        let command = CommandCode::from_u8(bytes[0])
            .ok_or_else(|| ClientError::Decode(format!("unknown command {:#04x}", bytes[0])))?;
        Ok(Self {
            command,
            flags: bytes[1],
            request_id: read_u32(&bytes[2..6]),
            payload_len: read_u32(&bytes[6..10]),
        })
    }
}

/// Build a complete request frame: header followed by `payload`.
///
/// The frame is always `REQUEST_HEADER_SIZE + payload.len()` bytes.
pub fn encode_request(command: CommandCode, payload: &[u8]) -> Result<Vec<u8>, ClientError> {
    let payload_len = u32::try_from(payload.len()).map_err(|_| {
        ClientError::Decode(format!(
            "request payload of {} bytes does not fit a u32 length",
            payload.len()
        ))
    })?;

    let header = RequestHeader::new(command, payload_len);
    let mut frame = Vec::with_capacity(REQUEST_HEADER_SIZE + payload.len());
    frame.extend_from_slice(&header.to_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}

// =============================================================================
// RESPONSE HEADER
// =============================================================================

/// Header preceding every response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Raw command echo. Kept raw so an unknown echo can still be reported.
    pub command: u8,
    pub request_id: u32,
    pub result: ResultCode,
    pub payload_len: u32,
}

impl ResponseHeader {
    #[must_use]
    pub fn new(command: CommandCode, result: ResultCode, payload_len: u32) -> Self {
        Self {
            command: command.to_u8(),
            request_id: REQUEST_ID,
            result,
            payload_len,
        }
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; RESPONSE_HEADER_SIZE] {
        let mut bytes = [0u8; RESPONSE_HEADER_SIZE];
        bytes[0] = self.command;
        bytes[1..5].copy_from_slice(&self.request_id.to_le_bytes());
        bytes[5] = self.result.to_u8();
        bytes[6..10].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ClientError> {
        if bytes.len() < RESPONSE_HEADER_SIZE {
            return Err(ClientError::Decode("response header too short".to_string()));
        }
        Ok(Self {
            command: bytes[0],
            request_id: read_u32(&bytes[1..5]),
            result: ResultCode::from_u8(bytes[5]),
            payload_len: read_u32(&bytes[6..10]),
        })
    }

    /// Reject a declared payload length above `MAX_RESPONSE_PAYLOAD`.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.payload_len > MAX_RESPONSE_PAYLOAD {
            return Err(ClientError::PayloadTooLarge(self.payload_len));
        }
        Ok(())
    }
}

/// A fully received response: header plus exactly `payload_len` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub header: ResponseHeader,
    pub payload: Vec<u8>,
}

impl Response {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.header.result.is_ok()
    }

    #[must_use]
    pub fn result(&self) -> ResultCode {
        self.header.result
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}

// =============================================================================
// TESTS
// =============================================================================
