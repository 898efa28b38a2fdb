//! # Transport
//!
//! Moves frames over a blocking byte stream.
//!
//! One call sends one request frame and reads back exactly one response
//! frame: the 10-byte header, then exactly the declared payload, however
//! the stream splits it. The payload is drained even for non-OK results so
//! the next request starts on a frame boundary.

use crate::config::ClientConfig;
use crate::formats::{Response, ResponseHeader, encode_request};
use crate::primitives::RESPONSE_HEADER_SIZE;
use crate::types::{ClientError, CommandCode};
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use tracing::{debug, trace, warn};

// =============================================================================
// TRANSPORT TRAIT
// =============================================================================

/// A byte stream the client can own.
///
/// Implemented for `TcpStream`. Test doubles implement it over in-memory
/// buffers.
pub trait Transport: Read + Write {
    /// Release the underlying connection. Called once, at shutdown.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            // The peer may already be gone; there is nothing left to release.
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

/// Open a TCP connection to the store described by `config`.
///
/// Tries each resolved address in turn and applies the configured timeouts.
/// A failure is returned as `ClientError::Connect` naming the endpoint.
pub fn connect_tcp(config: &ClientConfig) -> Result<TcpStream, ClientError> {
    config.validate()?;
    let endpoint = config.endpoint();

    let mut last_error = None;
    for addr in config.socket_addrs()? {
        let attempt = match config.connect_timeout() {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => {
                stream.set_read_timeout(config.read_timeout())?;
                stream.set_write_timeout(config.write_timeout())?;
                stream.set_nodelay(true)?;
                debug!(%addr, "connected to store");
                return Ok(stream);
            }
            Err(e) => {
                debug!(%addr, error = %e, "connect attempt failed");
                last_error = Some(e);
            }
        }
    }

    Err(ClientError::Connect {
        addr: endpoint,
        source: last_error.unwrap_or_else(|| io::Error::from(io::ErrorKind::NotFound)),
    })
}

// =============================================================================
// CONNECTION
// =============================================================================

/// Frame-level request/response over an owned transport.
#[derive(Debug)]
pub struct Connection<T> {
    stream: T,
}

impl<T: Transport> Connection<T> {
    #[must_use]
    pub fn new(stream: T) -> Self {
        Self { stream }
    }

    pub fn get_ref(&self) -> &T {
        &self.stream
    }

    /// Send one request and wait for its complete response.
    pub fn call(&mut self, command: CommandCode, payload: &[u8]) -> Result<Response, ClientError> {
        let frame = encode_request(command, payload)?;
        debug!(command = ?command, payload_len = payload.len(), "sending request");

        self.stream.write_all(&frame).map_err(map_io)?;
        self.stream.flush().map_err(map_io)?;

        let header_bytes = self.receive_exact(RESPONSE_HEADER_SIZE)?;
        let header = ResponseHeader::from_bytes(&header_bytes)?;
        header.validate()?;

        if header.command != command.to_u8() {
            warn!(
                expected = command.to_u8(),
                received = header.command,
                "response echoes a different command"
            );
        }

        let payload = self.receive_exact(header.payload_len as usize)?;
        trace!(
            command = ?command,
            result = ?header.result,
            payload_len = payload.len(),
            "received response"
        );

        Ok(Response { header, payload })
    }

    /// Read exactly `len` bytes, looping over short reads.
    fn receive_exact(&mut self, len: usize) -> Result<Vec<u8>, ClientError> {
        let mut buf = vec![0u8; len];
        let mut received = 0;
        while received < len {
            match self.stream.read(&mut buf[received..]) {
                Ok(0) => {
                    return Err(ClientError::ConnectionClosed {
                        expected: len,
                        received,
                    });
                }
                Ok(n) => received += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(map_io(e)),
            }
        }
        Ok(buf)
    }

    /// Close the underlying transport.
    pub fn close(&mut self) -> Result<(), ClientError> {
        self.stream.close().map_err(map_io)
    }
}

fn map_io(e: io::Error) -> ClientError {
    match e.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => ClientError::Timeout,
        _ => ClientError::Io(e),
    }
}

// =============================================================================
// TESTS
// =============================================================================
