//! # Event Subscriptions
//!
//! Element-level events the store can report: arcs added to or removed from
//! an element, and removal of the element itself.
//!
//! The client implements the subscribe/unsubscribe commands and keeps a
//! table of live subscriptions so shutdown can release them. How
//! notifications reach the client (pushed on the command connection or
//! polled) is not settled by the protocol, so nothing here reads the socket
//! on its own. Delivery goes through a seam instead: whatever reads emitted
//! payloads hands them to `SctpClient::route_emitted`, which decodes them
//! with `decode_emitted` and feeds the client's `EventSink`.
//!
//! ## Emit Payload
//!
//! `u32` count, then per notification: `event_id u32 | element addr | argument addr`.

use crate::formats::PayloadReader;
use crate::primitives::{ADDR_SIZE, COUNT_SIZE};
use crate::types::{ClientError, ScAddr};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Size of one emitted notification record.
const EMITTED_RECORD_SIZE: usize = COUNT_SIZE + 2 * ADDR_SIZE;

/// Identifier the store assigns to a subscription.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventId(pub u32);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of occurrence a subscription watches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    AddOutputArc,
    AddInputArc,
    RemoveOutputArc,
    RemoveInputArc,
    RemoveElement,
}

impl EventType {
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::AddOutputArc => 0,
            Self::AddInputArc => 1,
            Self::RemoveOutputArc => 2,
            Self::RemoveInputArc => 3,
            Self::RemoveElement => 4,
        }
    }

    #[must_use]
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::AddOutputArc),
            1 => Some(Self::AddInputArc),
            2 => Some(Self::RemoveOutputArc),
            3 => Some(Self::RemoveInputArc),
            4 => Some(Self::RemoveElement),
            _ => None,
        }
    }

    /// Name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddOutputArc => "add_output_arc",
            Self::AddInputArc => "add_input_arc",
            Self::RemoveOutputArc => "remove_output_arc",
            Self::RemoveInputArc => "remove_input_arc",
            Self::RemoveElement => "remove_element",
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::AddOutputArc,
            Self::AddInputArc,
            Self::RemoveOutputArc,
            Self::RemoveInputArc,
            Self::RemoveElement,
        ]
        .into_iter()
        .find(|ty| ty.as_str() == s)
        .ok_or_else(|| format!("unknown event type '{}'", s))
    }
}

/// A live subscription tracked by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: EventId,
    pub event_type: EventType,
    /// Element being watched.
    pub addr: ScAddr,
}

/// One occurrence reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventNotification {
    pub id: EventId,
    /// Element the subscription watches.
    pub element: ScAddr,
    /// Arc (or element) the occurrence concerns.
    pub argument: ScAddr,
}

/// Decode an emit payload into notifications, in payload order.
pub fn decode_emitted(payload: &[u8]) -> Result<Vec<EventNotification>, ClientError> {
    let mut r = PayloadReader::new(payload);
    let count = r.count(EMITTED_RECORD_SIZE)?;

    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(EventNotification {
            id: EventId(r.u32()?),
            element: r.addr()?,
            argument: r.addr()?,
        });
    }
    Ok(out)
}

// =============================================================================
// DELIVERY SEAM
// =============================================================================

/// Receives notifications for tracked subscriptions.
///
/// # Extension Point
///
/// The default sink is an `EventQueue`. Callers wanting callbacks implement
/// this trait and install it with `SctpClient::set_event_sink`.
pub trait EventSink: Send {
    fn deliver(&mut self, subscription: &Subscription, notification: EventNotification);

    /// Hand back queued notifications. Sinks that don't queue return nothing.
    fn drain(&mut self) -> Vec<EventNotification> {
        Vec::new()
    }
}

/// FIFO of delivered notifications.
#[derive(Debug, Default)]
pub struct EventQueue {
    queue: VecDeque<EventNotification>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl EventSink for EventQueue {
    fn deliver(&mut self, _subscription: &Subscription, notification: EventNotification) {
        self.queue.push_back(notification);
    }

    fn drain(&mut self) -> Vec<EventNotification> {
        self.queue.drain(..).collect()
    }
}
