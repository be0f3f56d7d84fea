//! Game state representation.
//!
//! Holds the complete snapshot of a game at a given point in time: units at
//! rest, units awaiting retreat, supply-center ownership, phase and year.
//! Resolvers take a `GameState` by value and hand back its successor.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::order::Location;
use super::province::{Coast, Power, Province};
use super::unit::{Unit, UnitId, UnitType};

/// The phases of a game year, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    SpringMovement,
    SpringRetreat,
    FallMovement,
    FallRetreat,
    Reconciliation,
}

impl Phase {
    pub fn is_movement(self) -> bool {
        matches!(self, Phase::SpringMovement | Phase::FallMovement)
    }

    pub fn is_retreat(self) -> bool {
        matches!(self, Phase::SpringRetreat | Phase::FallRetreat)
    }

    /// Short label, e.g. `S1901M`.
    pub fn label(self, year: u16) -> String {
        let (season, kind) = match self {
            Phase::SpringMovement => ('S', 'M'),
            Phase::SpringRetreat => ('S', 'R'),
            Phase::FallMovement => ('F', 'M'),
            Phase::FallRetreat => ('F', 'R'),
            Phase::Reconciliation => ('W', 'A'),
        };
        format!("{season}{year}{kind}")
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::SpringMovement => "spring movement",
            Phase::SpringRetreat => "spring retreat",
            Phase::FallMovement => "fall movement",
            Phase::FallRetreat => "fall retreat",
            Phase::Reconciliation => "reconciliation",
        };
        f.write_str(name)
    }
}

/// A unit driven out of its province, awaiting a retreat order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DislodgedUnit {
    pub unit: Unit,
    /// Origin of the successful attack; never a legal retreat destination.
    pub attacker_from: Province,
    /// Provinces left vacant by a standoff in the same movement phase.
    #[serde(default)]
    pub standoffs: BTreeSet<Province>,
}

/// Structural corruption of a state. Fatal: resolution is aborted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("unit id {0} appears more than once")]
    DuplicateUnitId(UnitId),
    #[error("province {0} holds more than one unit")]
    DoubleOccupancy(Province),
    #[error("{unit_type:?} {unit} cannot stand at {location}")]
    IllegalPlacement {
        unit: UnitId,
        unit_type: UnitType,
        location: Location,
    },
    #[error("supply-center ownership recorded for {0}, which is not a supply center")]
    NotASupplyCenter(Province),
    #[error("dislodged units present during {0}")]
    StrayDislodgement(Phase),
    #[error("{expected} resolution cannot run during {phase}")]
    WrongPhase { phase: Phase, expected: &'static str },
    #[error("next unit id {next} does not exceed existing id {existing}")]
    StaleUnitCounter { next: u32, existing: UnitId },
}

/// Complete game state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub year: u16,
    pub phase: Phase,
    /// Units at rest, sorted by id.
    pub units: Vec<Unit>,
    /// Owner of each owned supply center. Neutral centers are absent.
    pub supply_centers: BTreeMap<Province, Power>,
    /// Units awaiting retreat orders; only non-empty during retreat phases.
    #[serde(default)]
    pub dislodged: Vec<DislodgedUnit>,
    /// Id handed to the next built unit.
    pub next_unit_id: u32,
}

/// Opening position: power, unit type, location.
const STARTING_UNITS: [(Power, UnitType, &str); 22] = [
    (Power::Austria, UnitType::Army, "vie"),
    (Power::Austria, UnitType::Army, "bud"),
    (Power::Austria, UnitType::Fleet, "tri"),
    (Power::England, UnitType::Fleet, "lon"),
    (Power::England, UnitType::Fleet, "edi"),
    (Power::England, UnitType::Army, "lvp"),
    (Power::France, UnitType::Fleet, "bre"),
    (Power::France, UnitType::Army, "par"),
    (Power::France, UnitType::Army, "mar"),
    (Power::Germany, UnitType::Fleet, "kie"),
    (Power::Germany, UnitType::Army, "ber"),
    (Power::Germany, UnitType::Army, "mun"),
    (Power::Italy, UnitType::Fleet, "nap"),
    (Power::Italy, UnitType::Army, "rom"),
    (Power::Italy, UnitType::Army, "ven"),
    (Power::Russia, UnitType::Army, "war"),
    (Power::Russia, UnitType::Army, "mos"),
    (Power::Russia, UnitType::Fleet, "sev"),
    (Power::Russia, UnitType::Fleet, "stp/sc"),
    (Power::Turkey, UnitType::Fleet, "ank"),
    (Power::Turkey, UnitType::Army, "con"),
    (Power::Turkey, UnitType::Army, "smy"),
];

impl GameState {
    /// Creates an empty state with no units or ownership.
    pub fn empty(year: u16, phase: Phase) -> Self {
        GameState {
            year,
            phase,
            units: Vec::new(),
            supply_centers: BTreeMap::new(),
            dislodged: Vec::new(),
            next_unit_id: 1,
        }
    }

    /// The standard opening position for spring movement of `year`.
    pub fn standard_start(year: u16) -> Self {
        let mut state = GameState::empty(year, Phase::SpringMovement);
        for (power, unit_type, loc) in STARTING_UNITS {
            if let Some(location) = Location::parse(loc) {
                state.place_unit(power, unit_type, location);
                state.set_sc_owner(location.province, Some(power));
            }
        }
        state
    }

    /// Places a new unit with a fresh id. Returns `None` if the province is occupied.
    pub fn place_unit(&mut self, power: Power, unit_type: UnitType, location: Location) -> Option<UnitId> {
        if self.unit_at(location.province).is_some() {
            return None;
        }
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        self.units.push(Unit { id, power, unit_type, location });
        Some(id)
    }

    /// Looks up a unit at rest by id.
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units
            .binary_search_by_key(&id, |u| u.id)
            .ok()
            .map(|i| &self.units[i])
    }

    /// The unit at rest in `province`, if any.
    pub fn unit_at(&self, province: Province) -> Option<&Unit> {
        self.units.iter().find(|u| u.location.province == province)
    }

    /// Sets or clears supply-center ownership for a province.
    pub fn set_sc_owner(&mut self, province: Province, owner: Option<Power>) {
        match owner {
            Some(power) => self.supply_centers.insert(province, power),
            None => self.supply_centers.remove(&province),
        };
    }

    pub fn sc_owner(&self, province: Province) -> Option<Power> {
        self.supply_centers.get(&province).copied()
    }

    pub fn center_count(&self, power: Power) -> usize {
        self.supply_centers.values().filter(|&&p| p == power).count()
    }

    pub fn unit_count(&self, power: Power) -> usize {
        self.units.iter().filter(|u| u.power == power).count()
    }

    /// Units of `power`, in id order.
    pub fn units_of(&self, power: Power) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |u| u.power == power)
    }

    /// Restores the id ordering of `units`.
    pub(crate) fn sort_units(&mut self) {
        self.units.sort_by_key(|u| u.id);
    }

    /// Checks the structural invariants every resolver relies on.
    pub fn check_invariants(&self) -> Result<(), StateError> {
        let mut ids = HashSet::new();
        let mut occupied = HashSet::new();
        for unit in &self.units {
            if !ids.insert(unit.id) {
                return Err(StateError::DuplicateUnitId(unit.id));
            }
            if !occupied.insert(unit.location.province) {
                return Err(StateError::DoubleOccupancy(unit.location.province));
            }
            check_placement(unit)?;
        }

        if !self.dislodged.is_empty() && !self.phase.is_retreat() {
            return Err(StateError::StrayDislodgement(self.phase));
        }
        let mut displaced = HashSet::new();
        for d in &self.dislodged {
            if !ids.insert(d.unit.id) {
                return Err(StateError::DuplicateUnitId(d.unit.id));
            }
            if !displaced.insert(d.unit.location.province) {
                return Err(StateError::DoubleOccupancy(d.unit.location.province));
            }
            check_placement(&d.unit)?;
        }

        if let Some(&max) = ids.iter().max() {
            if self.next_unit_id <= max.0 {
                return Err(StateError::StaleUnitCounter { next: self.next_unit_id, existing: max });
            }
        }

        if let Some(&p) = self.supply_centers.keys().find(|p| !p.is_supply_center()) {
            return Err(StateError::NotASupplyCenter(p));
        }
        Ok(())
    }

    /// Checks invariants and that the state is in one of the `accepted` phases.
    pub(crate) fn expect_phase(&self, accepted: fn(Phase) -> bool, expected: &'static str) -> Result<(), StateError> {
        if !accepted(self.phase) {
            return Err(StateError::WrongPhase { phase: self.phase, expected });
        }
        self.check_invariants()
    }
}

fn check_placement(unit: &Unit) -> Result<(), StateError> {
    let location = unit.location;
    let coasts = location.province.coasts();
    let coast_ok = match unit.unit_type {
        UnitType::Fleet if !coasts.is_empty() => coasts.contains(&location.coast),
        _ => location.coast == Coast::None,
    };
    if !unit.unit_type.can_occupy(location.province) || !coast_ok {
        return Err(StateError::IllegalPlacement {
            unit: unit.id,
            unit_type: unit.unit_type,
            location,
        });
    }
    Ok(())
}
