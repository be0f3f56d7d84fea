//! Units, their identities and mobility classes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::order::Location;
use super::province::{Power, Province};

/// Stable identity of a unit.
///
/// Ids survive moves and retreats. Newly built units draw fresh ids from
/// `GameState::next_unit_id`; ids are never reused within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The type of a unit, which doubles as its mobility class on the board graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Army,
    Fleet,
}

impl UnitType {
    /// Returns the uppercase abbreviation used in order notation.
    pub const fn abbr(self) -> char {
        match self {
            UnitType::Army => 'A',
            UnitType::Fleet => 'F',
        }
    }

    /// True if a unit of this type may stand in the province.
    pub fn can_occupy(self, province: Province) -> bool {
        match self {
            UnitType::Army => province.is_land(),
            UnitType::Fleet => province.is_navigable(),
        }
    }
}

/// A unit on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub power: Power,
    pub unit_type: UnitType,
    pub location: Location,
}

impl Unit {
    pub fn province(&self) -> Province {
        self.location.province
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.power, self.unit_type.abbr(), self.location)
    }
}
