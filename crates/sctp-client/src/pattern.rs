//! # Pattern Iteration
//!
//! Typed descriptors for the store's fixed-length pattern iterators.
//!
//! A pattern is 3 slots (`source, arc, target`) or 5 slots
//! (`source, arc, target, attr_arc, attr`). Each slot is either Fixed (the
//! caller supplies an address) or Any (the store fills it in). Nine layouts
//! are supported, one `Pattern` variant each, carrying only the Fixed
//! addresses.
//!
//! ## Wire Format
//!
//! Request: shape code (1 byte), then the Fixed addresses in slot order.
//! Any slots carry no bytes.
//!
//! Response: `u32` match count, then per match one address per slot, Fixed
//! slots included.

use crate::formats::{PayloadReader, PayloadWriter};
use crate::primitives::ADDR_SIZE;
use crate::types::{ClientError, ScAddr};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// SLOTS
// =============================================================================

/// One position of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Fixed(ScAddr),
    Any,
}

/// `_` is Any; anything else must parse as an address.
impl FromStr for Slot {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "_" => Ok(Self::Any),
            other => other.parse().map(Self::Fixed),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(addr) => write!(f, "{}", addr),
            Self::Any => f.write_str("_"),
        }
    }
}

// =============================================================================
// PATTERN
// =============================================================================

/// An iterator shape together with its Fixed addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// `F-A-A`: everything going out of `source`.
    FixedAnyAny { source: ScAddr },
    /// `A-A-F`: everything coming into `target`.
    AnyAnyFixed { target: ScAddr },
    /// `F-A-F`: arcs between two known elements.
    FixedAnyFixed { source: ScAddr, target: ScAddr },
    /// `F-A-A-A-F`
    FixedAnyAnyAnyFixed { source: ScAddr, attr: ScAddr },
    /// `A-A-F-A-F`
    AnyAnyFixedAnyFixed { target: ScAddr, attr: ScAddr },
    /// `F-A-F-A-F`
    FixedAnyFixedAnyFixed {
        source: ScAddr,
        target: ScAddr,
        attr: ScAddr,
    },
    /// `F-A-F-A-A`
    FixedAnyFixedAnyAny { source: ScAddr, target: ScAddr },
    /// `F-A-A-A-A`
    FixedAnyAnyAnyAny { source: ScAddr },
    /// `A-A-F-A-A`
    AnyAnyFixedAnyAny { target: ScAddr },
}

impl Pattern {
    /// Shape code sent as the first payload byte.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::FixedAnyAny { .. } => 0,
            Self::AnyAnyFixed { .. } => 1,
            Self::FixedAnyFixed { .. } => 2,
            Self::FixedAnyAnyAnyFixed { .. } => 3,
            Self::AnyAnyFixedAnyFixed { .. } => 4,
            Self::FixedAnyFixedAnyFixed { .. } => 5,
            Self::FixedAnyFixedAnyAny { .. } => 6,
            Self::FixedAnyAnyAnyAny { .. } => 7,
            Self::AnyAnyFixedAnyAny { .. } => 8,
        }
    }

    /// 3 or 5.
    #[must_use]
    pub const fn slot_count(&self) -> usize {
        match self {
            Self::FixedAnyAny { .. } | Self::AnyAnyFixed { .. } | Self::FixedAnyFixed { .. } => 3,
            _ => 5,
        }
    }

    /// The full slot layout, Fixed addresses in place.
    #[must_use]
    pub fn slots(&self) -> Vec<Slot> {
        use Slot::{Any, Fixed};
        match *self {
            Self::FixedAnyAny { source } => vec![Fixed(source), Any, Any],
            Self::AnyAnyFixed { target } => vec![Any, Any, Fixed(target)],
            Self::FixedAnyFixed { source, target } => vec![Fixed(source), Any, Fixed(target)],
            Self::FixedAnyAnyAnyFixed { source, attr } => {
                vec![Fixed(source), Any, Any, Any, Fixed(attr)]
            }
            Self::AnyAnyFixedAnyFixed { target, attr } => {
                vec![Any, Any, Fixed(target), Any, Fixed(attr)]
            }
            Self::FixedAnyFixedAnyFixed {
                source,
                target,
                attr,
            } => vec![Fixed(source), Any, Fixed(target), Any, Fixed(attr)],
            Self::FixedAnyFixedAnyAny { source, target } => {
                vec![Fixed(source), Any, Fixed(target), Any, Any]
            }
            Self::FixedAnyAnyAnyAny { source } => vec![Fixed(source), Any, Any, Any, Any],
            Self::AnyAnyFixedAnyAny { target } => vec![Any, Any, Fixed(target), Any, Any],
        }
    }

    /// Fixed addresses in wire order.
    #[must_use]
    pub fn fixed(&self) -> Vec<ScAddr> {
        self.slots()
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Fixed(addr) => Some(addr),
                Slot::Any => None,
            })
            .collect()
    }

    /// Select the shape matching a slot layout.
    ///
    /// Fails with `UnsupportedPattern` for lengths other than 3 or 5 and for
    /// Fixed/Any layouts the store has no iterator for.
    pub fn from_slots(slots: &[Slot]) -> Result<Self, ClientError> {
        use Slot::{Any, Fixed};
        let pattern = match *slots {
            [Fixed(source), Any, Any] => Self::FixedAnyAny { source },
            [Any, Any, Fixed(target)] => Self::AnyAnyFixed { target },
            [Fixed(source), Any, Fixed(target)] => Self::FixedAnyFixed { source, target },
            [Fixed(source), Any, Any, Any, Fixed(attr)] => {
                Self::FixedAnyAnyAnyFixed { source, attr }
            }
            [Any, Any, Fixed(target), Any, Fixed(attr)] => {
                Self::AnyAnyFixedAnyFixed { target, attr }
            }
            [Fixed(source), Any, Fixed(target), Any, Fixed(attr)] => Self::FixedAnyFixedAnyFixed {
                source,
                target,
                attr,
            },
            [Fixed(source), Any, Fixed(target), Any, Any] => {
                Self::FixedAnyFixedAnyAny { source, target }
            }
            [Fixed(source), Any, Any, Any, Any] => Self::FixedAnyAnyAnyAny { source },
            [Any, Any, Fixed(target), Any, Any] => Self::AnyAnyFixedAnyAny { target },
            _ => {
                let layout: Vec<String> = slots.iter().map(|s| s.to_string()).collect();
                return Err(ClientError::UnsupportedPattern(layout.join(" ")));
            }
        };
        Ok(pattern)
    }

    /// Write the shape code and Fixed addresses.
    pub fn encode(&self, w: &mut PayloadWriter) {
        w.u8(self.code());
        for addr in self.fixed() {
            w.addr(addr);
        }
    }

    /// Read a pattern back from a request payload.
    pub fn decode(r: &mut PayloadReader<'_>) -> Result<Self, ClientError> {
        let code = r.u8()?;
        let pattern = match code {
            0 => Self::FixedAnyAny { source: r.addr()? },
            1 => Self::AnyAnyFixed { target: r.addr()? },
            2 => Self::FixedAnyFixed {
                source: r.addr()?,
                target: r.addr()?,
            },
            3 => Self::FixedAnyAnyAnyFixed {
                source: r.addr()?,
                attr: r.addr()?,
            },
            4 => Self::AnyAnyFixedAnyFixed {
                target: r.addr()?,
                attr: r.addr()?,
            },
            5 => Self::FixedAnyFixedAnyFixed {
                source: r.addr()?,
                target: r.addr()?,
                attr: r.addr()?,
            },
            6 => Self::FixedAnyFixedAnyAny {
                source: r.addr()?,
                target: r.addr()?,
            },
            7 => Self::FixedAnyAnyAnyAny { source: r.addr()? },
            8 => Self::AnyAnyFixedAnyAny { target: r.addr()? },
            other => {
                return Err(ClientError::Decode(format!(
                    "unknown iterator shape {}",
                    other
                )));
            }
        };
        Ok(pattern)
    }

    /// Decode an iteration response payload into matches of this shape.
    pub fn decode_matches(&self, payload: &[u8]) -> Result<Vec<PatternMatch>, ClientError> {
        let slot_count = self.slot_count();
        let mut r = PayloadReader::new(payload);
        let count = r.count(slot_count * ADDR_SIZE)?;

        let mut matches = Vec::with_capacity(count);
        for _ in 0..count {
            let mut addrs = Vec::with_capacity(slot_count);
            for _ in 0..slot_count {
                addrs.push(r.addr()?);
            }
            matches.push(PatternMatch(addrs));
        }
        Ok(matches)
    }
}

// =============================================================================
// MATCHES
// =============================================================================

/// One matched fragment: an address per pattern slot, in slot order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternMatch(pub Vec<ScAddr>);

impl PatternMatch {
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<ScAddr> {
        self.0.get(slot).copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ScAddr] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
