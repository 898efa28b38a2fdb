//! # Payload Encoding
//!
//! Little-endian writer and cursor reader for operation payloads.

use crate::primitives::{ADDR_SIZE, TYPE_SIZE};
use crate::types::{ClientError, ScAddr, ScType};

/// Builds a request payload.
#[derive(Debug, Clone, Default)]
pub struct PayloadWriter {
    buf: Vec<u8>,
}

impl PayloadWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u64(&mut self, v: u64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn addr(&mut self, addr: ScAddr) -> &mut Self {
        self.buf.extend_from_slice(&addr.encode_bytes());
        self
    }

    pub fn sc_type(&mut self, ty: ScType) -> &mut Self {
        self.u16(ty.bits())
    }

    /// Write a `u32` length followed by the bytes.
    pub fn bytes_prefixed(&mut self, data: &[u8]) -> Result<&mut Self, ClientError> {
        let len = u32::try_from(data.len()).map_err(|_| {
            ClientError::Decode(format!("{} bytes do not fit a u32 length", data.len()))
        })?;
        self.u32(len);
        self.buf.extend_from_slice(data);
        Ok(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Reads values off a response payload, front to back.
#[derive(Debug, Clone)]
pub struct PayloadReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Consume exactly `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], ClientError> {
        if self.remaining() < n {
            return Err(ClientError::Decode(format!(
                "payload short: need {} bytes at offset {}, have {}",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], ClientError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8, ClientError> {
        Ok(self.array::<1>()?[0])
    }

    pub fn u16(&mut self) -> Result<u16, ClientError> {
        self.array().map(u16::from_le_bytes)
    }

    pub fn u32(&mut self) -> Result<u32, ClientError> {
        self.array().map(u32::from_le_bytes)
    }

    pub fn u64(&mut self) -> Result<u64, ClientError> {
        self.array().map(u64::from_le_bytes)
    }

    pub fn addr(&mut self) -> Result<ScAddr, ClientError> {
        ScAddr::decode_bytes(self.take(ADDR_SIZE)?)
    }

    pub fn sc_type(&mut self) -> Result<ScType, ClientError> {
        self.array::<TYPE_SIZE>().map(|b| ScType(u16::from_le_bytes(b)))
    }

    /// Read a `u32` count, refusing counts the remaining bytes cannot hold.
    pub fn count(&mut self, item_size: usize) -> Result<usize, ClientError> {
        let count = self.u32()? as usize;
        let needed = count.checked_mul(item_size).ok_or_else(|| {
            ClientError::Decode(format!("item count {} overflows", count))
        })?;
        if needed > self.remaining() {
            return Err(ClientError::Decode(format!(
                "{} items of {} bytes declared, {} bytes left",
                count,
                item_size,
                self.remaining()
            )));
        }
        Ok(count)
    }

    /// Read a `u32` length followed by that many bytes.
    pub fn bytes_prefixed(&mut self) -> Result<&'a [u8], ClientError> {
        let len = self.u32()? as usize;
        self.take(len)
    }
}
