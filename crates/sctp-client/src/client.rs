//! # Client
//!
//! The operation façade: one method per store operation.
//!
//! Every method frames one request, blocks for the response and decodes it.
//! A non-OK result code, or an OK response too short for the expected value,
//! becomes the operation's absence value (`false`, `None`, or an empty
//! list). Only transport failures come back as `Err`.
//!
//! Methods take `&mut self`, so a client never has two requests in flight.
//! Open one client per thread for concurrent work.

use crate::config::ClientConfig;
use crate::events::{
    EventId, EventNotification, EventQueue, EventSink, EventType, Subscription, decode_emitted,
};
use crate::formats::{PayloadReader, PayloadWriter, Response};
use crate::pattern::{Pattern, PatternMatch, Slot};
use crate::primitives::{ADDR_SIZE, EMPTY_CONTENT_PLACEHOLDER, STAT_RECORD_SIZE};
use crate::transport::{Connection, Transport, connect_tcp};
use crate::types::{ClientError, CommandCode, Result, ScAddr, ScType, StatSample};
use std::collections::BTreeMap;
use std::fmt;
use std::net::TcpStream;
use tracing::{debug, info, warn};

/// Connection to a semantic-graph store.
///
/// Created by `connect` (TCP) or `with_transport` (any `Transport`).
/// `shutdown` releases tracked subscriptions and closes the stream; dropping
/// the client does the same on a best-effort basis.
pub struct SctpClient<T: Transport = TcpStream> {
    conn: Option<Connection<T>>,
    subscriptions: BTreeMap<EventId, Subscription>,
    sink: Box<dyn EventSink>,
}

impl<T: Transport> fmt::Debug for SctpClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SctpClient")
            .field("connected", &self.conn.is_some())
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl SctpClient<TcpStream> {
    /// Connect to the store over TCP.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let stream = connect_tcp(config)?;
        info!(endpoint = %config.endpoint(), "store session opened");
        Ok(Self::with_transport(stream))
    }
}

impl<T: Transport> SctpClient<T> {
    /// Wrap an already-open transport.
    pub fn with_transport(stream: T) -> Self {
        Self {
            conn: Some(Connection::new(stream)),
            subscriptions: BTreeMap::new(),
            sink: Box::new(EventQueue::new()),
        }
    }

    /// False once `shutdown` has run or a transport failure dropped the
    /// connection.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Send one request. A transport failure drops the connection, so every
    /// later call fails with `Closed` instead of reading a stale frame.
    fn call(&mut self, command: CommandCode, payload: &[u8]) -> Result<Response> {
        let outcome = self
            .conn
            .as_mut()
            .ok_or(ClientError::Closed)?
            .call(command, payload);

        match &outcome {
            Err(e) if e.breaks_stream() => self.abandon(e),
            _ => {}
        }
        outcome
    }

    /// Close a connection whose stream may be misaligned. Tracked
    /// subscriptions can no longer be released and are forgotten.
    fn abandon(&mut self, cause: &ClientError) {
        warn!(
            error = %cause,
            subscriptions = self.subscriptions.len(),
            "transport failed, dropping store session"
        );
        self.subscriptions.clear();
        if let Some(Err(e)) = self.conn.take().map(|mut conn| conn.close()) {
            debug!(error = %e, "closing failed transport");
        }
    }

    fn call_with_addr(&mut self, command: CommandCode, addr: ScAddr) -> Result<Response> {
        self.call(command, &addr.encode_bytes())
    }

    // =========================================================================
    // ELEMENTS
    // =========================================================================

    /// Whether an element exists at `addr`.
    pub fn element_exists(&mut self, addr: ScAddr) -> Result<bool> {
        let resp = self.call_with_addr(CommandCode::CheckElement, addr)?;
        Ok(resp.is_ok())
    }

    /// Type mask of the element at `addr`.
    pub fn element_type(&mut self, addr: ScAddr) -> Result<Option<ScType>> {
        let resp = self.call_with_addr(CommandCode::GetElementType, addr)?;
        Ok(decode_ok(&resp, "element_type", |r| r.sc_type()))
    }

    /// Erase the element at `addr`. True if the store erased it.
    pub fn erase_element(&mut self, addr: ScAddr) -> Result<bool> {
        let resp = self.call_with_addr(CommandCode::EraseElement, addr)?;
        Ok(resp.is_ok())
    }

    pub fn create_node(&mut self, ty: ScType) -> Result<Option<ScAddr>> {
        let mut w = PayloadWriter::new();
        w.sc_type(ty);
        let resp = self.call(CommandCode::CreateNode, w.as_bytes())?;
        Ok(decode_ok(&resp, "create_node", |r| r.addr()))
    }

    pub fn create_link(&mut self) -> Result<Option<ScAddr>> {
        let resp = self.call(CommandCode::CreateLink, &[])?;
        Ok(decode_ok(&resp, "create_link", |r| r.addr()))
    }

    /// Create an arc of type `ty` from `begin` to `end`.
    pub fn create_arc(&mut self, ty: ScType, begin: ScAddr, end: ScAddr) -> Result<Option<ScAddr>> {
        let mut w = PayloadWriter::new();
        w.sc_type(ty).addr(begin).addr(end);
        let resp = self.call(CommandCode::CreateArc, w.as_bytes())?;
        Ok(decode_ok(&resp, "create_arc", |r| r.addr()))
    }

    /// `(begin, end)` of the arc at `arc`.
    pub fn arc_endpoints(&mut self, arc: ScAddr) -> Result<Option<(ScAddr, ScAddr)>> {
        let resp = self.call_with_addr(CommandCode::GetArc, arc)?;
        Ok(decode_ok(&resp, "arc_endpoints", |r| Ok((r.addr()?, r.addr()?))))
    }

    // =========================================================================
    // LINKS
    // =========================================================================

    /// Raw content of the link at `link`.
    pub fn link_content(&mut self, link: ScAddr) -> Result<Option<Vec<u8>>> {
        let resp = self.call_with_addr(CommandCode::GetLinkContent, link)?;
        if !resp.is_ok() {
            debug!(op = "link_content", result = ?resp.result(), "no result");
            return Ok(None);
        }
        Ok(Some(resp.payload))
    }

    /// Replace the content of `link`.
    ///
    /// Empty content is sent as a single space; the store rejects
    /// zero-length content.
    pub fn set_link_content(&mut self, link: ScAddr, content: &[u8]) -> Result<bool> {
        let content = if content.is_empty() {
            EMPTY_CONTENT_PLACEHOLDER
        } else {
            content
        };
        let mut w = PayloadWriter::with_capacity(ADDR_SIZE + 4 + content.len());
        w.addr(link).bytes_prefixed(content)?;
        let resp = self.call(CommandCode::SetLinkContent, w.as_bytes())?;
        Ok(resp.is_ok())
    }

    /// Links whose content equals `content`, in store order.
    pub fn find_links_with_content(&mut self, content: &[u8]) -> Result<Option<Vec<ScAddr>>> {
        let mut w = PayloadWriter::with_capacity(4 + content.len());
        w.bytes_prefixed(content)?;
        let resp = self.call(CommandCode::FindLinks, w.as_bytes())?;
        Ok(decode_ok(&resp, "find_links_with_content", |r| {
            let count = r.count(ADDR_SIZE)?;
            (0..count).map(|_| r.addr()).collect()
        }))
    }

    // =========================================================================
    // SYSTEM IDENTIFIERS
    // =========================================================================

    /// Element named `idtf`.
    pub fn resolve_system_identifier(&mut self, idtf: &str) -> Result<Option<ScAddr>> {
        let mut w = PayloadWriter::with_capacity(4 + idtf.len());
        w.bytes_prefixed(idtf.as_bytes())?;
        let resp = self.call(CommandCode::FindElementBySysIdtf, w.as_bytes())?;
        Ok(decode_ok(&resp, "resolve_system_identifier", |r| r.addr()))
    }

    /// Name the element at `addr` as `idtf`.
    pub fn set_system_identifier(&mut self, addr: ScAddr, idtf: &str) -> Result<bool> {
        let mut w = PayloadWriter::with_capacity(ADDR_SIZE + 4 + idtf.len());
        w.addr(addr).bytes_prefixed(idtf.as_bytes())?;
        let resp = self.call(CommandCode::SetSysIdtf, w.as_bytes())?;
        Ok(resp.is_ok())
    }

    // =========================================================================
    // ITERATION
    // =========================================================================

    /// Every fragment matching `pattern`. Empty when nothing matches.
    pub fn iterate(&mut self, pattern: &Pattern) -> Result<Vec<PatternMatch>> {
        let mut w = PayloadWriter::new();
        pattern.encode(&mut w);
        let resp = self.call(CommandCode::IterateElements, w.as_bytes())?;

        if !resp.is_ok() || resp.payload.is_empty() {
            debug!(op = "iterate", shape = pattern.code(), result = ?resp.result(), "no matches");
            return Ok(Vec::new());
        }
        match pattern.decode_matches(&resp.payload) {
            Ok(matches) => Ok(matches),
            Err(e) => {
                warn!(op = "iterate", shape = pattern.code(), error = %e, "malformed response payload");
                Ok(Vec::new())
            }
        }
    }

    /// Like `iterate`, selecting the shape from a Fixed/Any slot layout.
    pub fn iterate_slots(&mut self, slots: &[Slot]) -> Result<Vec<PatternMatch>> {
        let pattern = Pattern::from_slots(slots)?;
        self.iterate(&pattern)
    }

    // =========================================================================
    // STATISTICS
    // =========================================================================

    /// Samples recorded between `begin_ms` and `end_ms` (Unix milliseconds).
    ///
    /// `Some(vec![])` when the range holds no samples.
    pub fn statistics(&mut self, begin_ms: u64, end_ms: u64) -> Result<Option<Vec<StatSample>>> {
        let mut w = PayloadWriter::with_capacity(16);
        w.u64(begin_ms).u64(end_ms);
        let resp = self.call(CommandCode::Statistics, w.as_bytes())?;
        Ok(decode_ok(&resp, "statistics", |r| {
            let count = r.count(STAT_RECORD_SIZE)?;
            (0..count).map(|_| read_stat_sample(r)).collect()
        }))
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Subscribe to `event_type` occurrences on `addr`.
    ///
    /// The subscription is tracked until `unsubscribe` or `shutdown`.
    pub fn subscribe(&mut self, event_type: EventType, addr: ScAddr) -> Result<Option<EventId>> {
        let mut w = PayloadWriter::with_capacity(1 + ADDR_SIZE);
        w.u8(event_type.to_u8()).addr(addr);
        let resp = self.call(CommandCode::EventCreate, w.as_bytes())?;

        let id = decode_ok(&resp, "subscribe", |r| r.u32().map(EventId));
        if let Some(id) = id {
            debug!(%id, ?event_type, %addr, "subscription created");
            self.subscriptions.insert(
                id,
                Subscription {
                    id,
                    event_type,
                    addr,
                },
            );
        }
        Ok(id)
    }

    /// Cancel a subscription. True if the store released it.
    pub fn unsubscribe(&mut self, id: EventId) -> Result<bool> {
        let resp = self.call(CommandCode::EventDestroy, &id.0.to_le_bytes())?;
        if resp.is_ok() {
            self.subscriptions.remove(&id);
        }
        Ok(resp.is_ok())
    }

    /// Subscriptions currently tracked, by id.
    pub fn subscriptions(&self) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.values()
    }

    /// Replace the sink that receives routed notifications.
    pub fn set_event_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sink = sink;
    }

    /// Notifications queued by the sink so far.
    pub fn take_events(&mut self) -> Vec<EventNotification> {
        self.sink.drain()
    }

    /// Decode an emit payload and deliver notifications for tracked
    /// subscriptions to the sink. Returns how many were delivered.
    ///
    /// This is the entry point for whatever component ends up reading
    /// emitted events; the client never calls it itself.
    pub fn route_emitted(&mut self, payload: &[u8]) -> Result<usize> {
        let mut delivered = 0;
        for notification in decode_emitted(payload)? {
            match self.subscriptions.get(&notification.id) {
                Some(subscription) => {
                    self.sink.deliver(subscription, notification);
                    delivered += 1;
                }
                None => debug!(id = %notification.id, "notification for unknown subscription"),
            }
        }
        Ok(delivered)
    }

    // =========================================================================
    // SHUTDOWN
    // =========================================================================

    /// Release every tracked subscription, then close the connection.
    ///
    /// Unsubscribe failures are logged, not returned. Calling this again is
    /// a no-op.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.conn.is_none() {
            return Ok(());
        }

        let ids: Vec<EventId> = self.subscriptions.keys().copied().collect();
        for id in ids {
            match self.unsubscribe(id) {
                Ok(true) => {}
                Ok(false) => warn!(%id, "store refused to release subscription"),
                Err(e) => {
                    warn!(%id, error = %e, "releasing subscriptions aborted");
                    break;
                }
            }
        }
        self.subscriptions.clear();

        let closed = match self.conn.take() {
            Some(mut conn) => conn.close(),
            None => Ok(()),
        };
        info!("store session closed");
        closed
    }
}

impl<T: Transport> Drop for SctpClient<T> {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!(error = %e, "shutdown on drop failed");
        }
    }
}

/// Decode an OK response with `decode`; absence for non-OK or short payloads.
fn decode_ok<R>(
    resp: &Response,
    op: &'static str,
    decode: impl FnOnce(&mut PayloadReader<'_>) -> Result<R>,
) -> Option<R> {
    if !resp.is_ok() {
        debug!(op, result = ?resp.result(), "no result");
        return None;
    }
    match decode(&mut PayloadReader::new(&resp.payload)) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(op, error = %e, "malformed response payload");
            None
        }
    }
}

fn read_stat_sample(r: &mut PayloadReader<'_>) -> Result<StatSample> {
    Ok(StatSample {
        time: r.u64()?,
        node_count: r.u64()?,
        arc_count: r.u64()?,
        link_count: r.u64()?,
        live_node_count: r.u64()?,
        live_arc_count: r.u64()?,
        live_link_count: r.u64()?,
        empty_count: r.u64()?,
        connection_count: r.u64()?,
        command_count: r.u64()?,
        command_error_count: r.u64()?,
        is_initial: r.u8()? & 1 != 0,
    })
}
