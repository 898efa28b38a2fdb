//! # Element Addresses
//!
//! An element address is a 32-bit value split into a 16-bit segment and a
//! 16-bit offset. The packed form is `segment | (offset << 16)`.

use super::ClientError;
use crate::primitives::ADDR_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pack a segment and offset into the store's 32-bit element id.
#[must_use]
pub const fn pack(segment: u16, offset: u16) -> u32 {
    (segment as u32) | ((offset as u32) << 16)
}

/// Split a 32-bit element id into `(segment, offset)`.
#[must_use]
pub const fn unpack(value: u32) -> (u16, u16) {
    ((value & 0xffff) as u16, (value >> 16) as u16)
}

/// Address of an element (node, link or arc) in the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ScAddr {
    pub segment: u16,
    pub offset: u16,
}

impl ScAddr {
    /// The `(0, 0)` sentinel meaning "no element".
    pub const EMPTY: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(segment: u16, offset: u16) -> Self {
        Self { segment, offset }
    }

    /// Build an address from its packed 32-bit form.
    #[must_use]
    pub const fn from_u32(value: u32) -> Self {
        let (segment, offset) = unpack(value);
        Self { segment, offset }
    }

    /// The packed 32-bit form.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        pack(self.segment, self.offset)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.segment == 0 && self.offset == 0
    }

    /// Wire form: segment then offset, little-endian.
    #[must_use]
    pub fn encode_bytes(self) -> [u8; ADDR_SIZE] {
        let seg = self.segment.to_le_bytes();
        let off = self.offset.to_le_bytes();
        [seg[0], seg[1], off[0], off[1]]
    }

    /// Decode the wire form. The slice must be exactly four bytes long.
    pub fn decode_bytes(bytes: &[u8]) -> Result<Self, ClientError> {
        match bytes {
            [s0, s1, o0, o1] => Ok(Self {
                segment: u16::from_le_bytes([*s0, *s1]),
                offset: u16::from_le_bytes([*o0, *o1]),
            }),
            _ => Err(ClientError::Decode(format!(
                "address needs {} bytes, got {}",
                ADDR_SIZE,
                bytes.len()
            ))),
        }
    }
}

impl From<u32> for ScAddr {
    fn from(value: u32) -> Self {
        Self::from_u32(value)
    }
}

impl From<ScAddr> for u32 {
    fn from(addr: ScAddr) -> Self {
        addr.to_u32()
    }
}

/// Prints the packed element id, the form the store uses in its own tooling.
impl fmt::Display for ScAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_u32())
    }
}

/// Accepts a packed decimal id (`"65537"`) or `segment_offset` (`"1_1"`).
impl FromStr for ScAddr {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ClientError::InvalidAddr(trimmed.to_string());

        match trimmed.split_once('_') {
            Some((seg, off)) => {
                let segment = seg.parse::<u16>().map_err(|_| invalid())?;
                let offset = off.parse::<u16>().map_err(|_| invalid())?;
                Ok(Self::new(segment, offset))
            }
            None => trimmed
                .parse::<u32>()
                .map(Self::from_u32)
                .map_err(|_| invalid()),
        }
    }
}
