//! # Element Types
//!
//! Element types are 16-bit masks. A creation request ORs the wanted bits
//! together; a decoded type is classified by ANDing with a group mask.
//!
//! The node substructure bits reuse the arc positivity/permanence bits, so
//! they only mean something when the base kind is `NODE`. The client never
//! validates combinations; the store does.

use super::ClientError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;

/// Bit-mask describing the kind and attributes of an element.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ScType(pub u16);

impl ScType {
    // base kind
    pub const NODE: Self = Self(0x1);
    pub const LINK: Self = Self(0x2);
    pub const EDGE_COMMON: Self = Self(0x4);
    pub const ARC_COMMON: Self = Self(0x8);
    pub const ARC_ACCESS: Self = Self(0x10);

    // constancy
    pub const CONST: Self = Self(0x20);
    pub const VAR: Self = Self(0x40);

    // arc positivity
    pub const ARC_POS: Self = Self(0x80);
    pub const ARC_NEG: Self = Self(0x100);
    pub const ARC_FUZ: Self = Self(0x200);

    // arc permanence
    pub const ARC_TEMP: Self = Self(0x400);
    pub const ARC_PERM: Self = Self(0x800);

    // node substructure
    pub const NODE_TUPLE: Self = Self(0x80);
    pub const NODE_STRUCT: Self = Self(0x100);
    pub const NODE_ROLE: Self = Self(0x200);
    pub const NODE_NOROLE: Self = Self(0x400);
    pub const NODE_CLASS: Self = Self(0x800);
    pub const NODE_ABSTRACT: Self = Self(0x1000);
    pub const NODE_MATERIAL: Self = Self(0x2000);

    /// Constant positive permanent access arc, the membership arc.
    pub const ARC_POS_CONST_PERM: Self =
        Self(Self::ARC_ACCESS.0 | Self::CONST.0 | Self::ARC_POS.0 | Self::ARC_PERM.0);

    pub const NODE_CONST: Self = Self(Self::NODE.0 | Self::CONST.0);
    pub const NODE_VAR: Self = Self(Self::NODE.0 | Self::VAR.0);

    // group masks
    pub const ELEMENT_MASK: Self = Self(
        Self::NODE.0 | Self::LINK.0 | Self::EDGE_COMMON.0 | Self::ARC_COMMON.0 | Self::ARC_ACCESS.0,
    );
    pub const CONSTANCY_MASK: Self = Self(Self::CONST.0 | Self::VAR.0);
    pub const POSITIVITY_MASK: Self = Self(Self::ARC_POS.0 | Self::ARC_NEG.0 | Self::ARC_FUZ.0);
    pub const PERMANENCY_MASK: Self = Self(Self::ARC_PERM.0 | Self::ARC_TEMP.0);
    pub const NODE_STRUCT_MASK: Self = Self(
        Self::NODE_TUPLE.0
            | Self::NODE_STRUCT.0
            | Self::NODE_ROLE.0
            | Self::NODE_NOROLE.0
            | Self::NODE_CLASS.0
            | Self::NODE_ABSTRACT.0
            | Self::NODE_MATERIAL.0,
    );
    pub const ARC_MASK: Self = Self(Self::ARC_ACCESS.0 | Self::ARC_COMMON.0 | Self::EDGE_COMMON.0);

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// True when every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any bit of `other` is set in `self`.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[must_use]
    pub const fn is_node(self) -> bool {
        self.intersects(Self::NODE)
    }

    #[must_use]
    pub const fn is_link(self) -> bool {
        self.intersects(Self::LINK)
    }

    /// Any of the three arc kinds (common edge, common arc, access arc).
    #[must_use]
    pub const fn is_arc(self) -> bool {
        self.intersects(Self::ARC_MASK)
    }

    #[must_use]
    pub const fn is_const(self) -> bool {
        self.intersects(Self::CONST)
    }

    #[must_use]
    pub const fn is_var(self) -> bool {
        self.intersects(Self::VAR)
    }
}

impl BitOr for ScType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ScType {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ScType {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl From<u16> for ScType {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}

// =============================================================================
// NAMES
// =============================================================================

const COMMON_NAMES: &[(&str, ScType)] = &[
    ("node", ScType::NODE),
    ("link", ScType::LINK),
    ("edge_common", ScType::EDGE_COMMON),
    ("arc_common", ScType::ARC_COMMON),
    ("arc_access", ScType::ARC_ACCESS),
    ("const", ScType::CONST),
    ("var", ScType::VAR),
];

const ARC_NAMES: &[(&str, ScType)] = &[
    ("arc_pos", ScType::ARC_POS),
    ("arc_neg", ScType::ARC_NEG),
    ("arc_fuz", ScType::ARC_FUZ),
    ("arc_temp", ScType::ARC_TEMP),
    ("arc_perm", ScType::ARC_PERM),
];

const NODE_NAMES: &[(&str, ScType)] = &[
    ("node_tuple", ScType::NODE_TUPLE),
    ("node_struct", ScType::NODE_STRUCT),
    ("node_role", ScType::NODE_ROLE),
    ("node_norole", ScType::NODE_NOROLE),
    ("node_class", ScType::NODE_CLASS),
    ("node_abstract", ScType::NODE_ABSTRACT),
    ("node_material", ScType::NODE_MATERIAL),
];

/// Names joined by `|`, reading the overlapping bits as node substructure
/// for nodes and as arc attributes otherwise. Unknown bits print as hex.
impl fmt::Display for ScType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0x0");
        }

        let attribute_names = if self.is_node() { NODE_NAMES } else { ARC_NAMES };
        let mut remaining = self.0;
        let mut parts = Vec::new();
        for (name, bits) in COMMON_NAMES.iter().chain(attribute_names) {
            if self.contains(*bits) {
                parts.push((*name).to_string());
                remaining &= !bits.0;
            }
        }
        if remaining != 0 {
            parts.push(format!("{:#x}", remaining));
        }
        f.write_str(&parts.join("|"))
    }
}

/// Accepts names and numeric masks (decimal or `0x` hex) joined by `|`.
impl FromStr for ScType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ty = Self::default();
        for part in s.trim().split('|') {
            let name = part.trim();
            if name == "arc_pos_const_perm" {
                ty |= Self::ARC_POS_CONST_PERM;
                continue;
            }
            let bits = parse_mask(name)
                .or_else(|| {
                    COMMON_NAMES
                        .iter()
                        .chain(ARC_NAMES)
                        .chain(NODE_NAMES)
                        .find(|(n, _)| *n == name)
                        .map(|(_, bits)| *bits)
                })
                .ok_or_else(|| ClientError::InvalidType(name.to_string()))?;
            ty |= bits;
        }
        Ok(ty)
    }
}

fn parse_mask(text: &str) -> Option<ScType> {
    match text.strip_prefix("0x") {
        Some(hex) => u16::from_str_radix(hex, 16).ok().map(ScType),
        None => text.parse::<u16>().ok().map(ScType),
    }
}
