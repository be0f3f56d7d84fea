//! Order types for all phases.
//!
//! Orders name the ordered unit by its `UnitId`; the submitting power travels
//! alongside the order as `(Order, Power)` and is checked against ownership
//! during validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::province::{Coast, Province};
use super::unit::{UnitId, UnitType};

/// A location on the board: a province with an optional coast specifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Location {
    pub province: Province,
    #[serde(default, skip_serializing_if = "Coast::is_none")]
    pub coast: Coast,
}

impl Location {
    /// Creates a location without a coast.
    pub fn new(province: Province) -> Self {
        Self { province, coast: Coast::None }
    }

    /// Creates a location with a coast specifier.
    pub fn with_coast(province: Province, coast: Coast) -> Self {
        Self { province, coast }
    }

    /// Parses `abbr` or `abbr/coast`, e.g. `"spa/nc"`.
    pub fn parse(s: &str) -> Option<Location> {
        let (prov, coast) = match s.split_once('/') {
            Some((p, c)) => (p, Coast::from_abbr(c)?),
            None => (s, Coast::None),
        };
        Some(Location::with_coast(Province::from_abbr(prov)?, coast))
    }
}

impl From<Province> for Location {
    fn from(province: Province) -> Self {
        Location::new(province)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.coast {
            Coast::None => write!(f, "{}", self.province),
            coast => write!(f, "{}/{}", self.province, coast.abbr()),
        }
    }
}

/// An order for any phase.
///
/// Movement phases accept `Hold`, `Move`, `SupportHold`, `SupportMove` and
/// `Transport`; retreat phases accept `Retreat` and `Disband`; the
/// reconciliation phase accepts `Build`, `Disband` and `Waive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Order {
    Hold {
        unit: UnitId,
    },

    /// Move to `dest`; `via_transport` requests carriage by a chain of
    /// transporting fleets instead of a direct border crossing.
    Move {
        unit: UnitId,
        dest: Location,
        #[serde(default)]
        via_transport: bool,
    },

    SupportHold {
        unit: UnitId,
        supported: UnitId,
    },

    /// Support `supported` moving into `dest`. Coasts are irrelevant to support.
    SupportMove {
        unit: UnitId,
        supported: UnitId,
        dest: Province,
    },

    /// A fleet carrying the army `carried` one link further towards `dest`.
    Transport {
        unit: UnitId,
        carried: UnitId,
        dest: Province,
    },

    Retreat {
        unit: UnitId,
        dest: Location,
    },

    /// Remove a dislodged unit (retreat phase) or an excess unit (reconciliation).
    Disband {
        unit: UnitId,
    },

    Build {
        unit_type: UnitType,
        location: Location,
    },

    /// Forfeit one build.
    Waive,
}

impl Order {
    /// The unit this order is given to, if any.
    pub fn unit(&self) -> Option<UnitId> {
        match *self {
            Order::Hold { unit }
            | Order::Move { unit, .. }
            | Order::SupportHold { unit, .. }
            | Order::SupportMove { unit, .. }
            | Order::Transport { unit, .. }
            | Order::Retreat { unit, .. }
            | Order::Disband { unit } => Some(unit),
            Order::Build { .. } | Order::Waive => None,
        }
    }

    /// True for orders accepted in a movement phase.
    pub fn is_movement_order(&self) -> bool {
        matches!(
            self,
            Order::Hold { .. }
                | Order::Move { .. }
                | Order::SupportHold { .. }
                | Order::SupportMove { .. }
                | Order::Transport { .. }
        )
    }
}
