//! Per-order outcomes and phase reports.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::board::order::Order;
use crate::board::province::{Power, Province};
use crate::board::state::DislodgedUnit;
use crate::board::unit::{Unit, UnitId};

/// The outcome of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderResult {
    Succeeded,
    /// Did not take effect for a reason other than a bounce or cut.
    Failed,
    /// A move or retreat stopped by an equal or stronger force.
    Bounced,
    /// A support that was not given.
    Cut,
    /// The ordered unit was driven out of its province.
    Dislodged,
    /// Rejected by validation; the unit held or was disbanded.
    Invalid,
}

/// Why an order was rejected during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    #[error("order is not accepted in this phase")]
    WrongPhase,
    #[error("a later order for a unit that already has one")]
    DuplicateOrder,
    #[error("referenced unit does not exist")]
    UnknownUnit,
    #[error("a unit cannot target its own province")]
    SelfTarget,
    #[error("destination is not reachable")]
    Unreachable,
    #[error("destination coast must be specified")]
    CoastRequired,
    #[error("only armies on a coast can be transported to a coast")]
    NotTransportable,
    #[error("only fleets at sea can transport")]
    NotAtSea,
    #[error("transported army is not ordered along this transport")]
    TransportMismatch,
    #[error("supported unit is not ordered as supported")]
    SupportMismatch,
    #[error("unit is not awaiting a retreat")]
    NotDislodged,
    #[error("cannot retreat into the attacker's origin")]
    AttackerOrigin,
    #[error("cannot retreat into a province left vacant by a standoff")]
    Standoff,
    #[error("province is occupied")]
    Occupied,
    #[error("province is not a home center of the building power")]
    NotHomeCenter,
    #[error("home center is not currently owned")]
    CenterNotOwned,
    #[error("unit type cannot stand in that province")]
    TerrainMismatch,
    #[error("no adjustment is due")]
    NoAdjustmentDue,
}

/// A non-fatal problem attached to a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum OrderIssue {
    #[error("invalid order: {0}")]
    InvalidOrder(Violation),
    #[error("unit {unit} does not exist or is not commanded by {power}")]
    AmbiguousUnitReference { unit: UnitId, power: Power },
    #[error("no intact chain of transporting fleets")]
    TransportChainFailure,
    #[error("decision depends on itself; failed by the paradox rule")]
    ResolutionCycle,
    #[error("illegal build: {0}")]
    IllegalBuild(Violation),
    #[error("illegal disband: {0}")]
    IllegalDisband(Violation),
}

/// A submitted order paired with its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOrder {
    pub order: Order,
    pub power: Power,
    pub result: OrderResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<OrderIssue>,
}

impl ResolvedOrder {
    pub fn new(order: Order, power: Power, result: OrderResult) -> Self {
        ResolvedOrder { order, power, result, issue: None }
    }

    pub fn with_issue(order: Order, power: Power, result: OrderResult, issue: OrderIssue) -> Self {
        ResolvedOrder { order, power, result, issue: Some(issue) }
    }

    pub(crate) fn rejected(order: Order, power: Power, issue: OrderIssue) -> Self {
        ResolvedOrder::with_issue(order, power, OrderResult::Invalid, issue)
    }
}

/// Outcome of a movement phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementReport {
    /// One entry per submitted order, in submission order.
    pub results: Vec<ResolvedOrder>,
    pub dislodged: Vec<DislodgedUnit>,
    /// Provinces left vacant after a bounce.
    pub standoffs: BTreeSet<Province>,
}

/// Outcome of a retreat phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetreatReport {
    pub results: Vec<ResolvedOrder>,
    pub retreated: Vec<UnitId>,
    pub disbanded: Vec<UnitId>,
}

/// Outcome of a reconciliation phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Submitted orders followed by any automatic disbands.
    pub results: Vec<ResolvedOrder>,
    pub built: Vec<Unit>,
    pub disbanded: Vec<UnitId>,
}

/// Report of whichever phase was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhaseReport {
    Movement(MovementReport),
    Retreat(RetreatReport),
    Reconciliation(BuildReport),
}

impl PhaseReport {
    pub fn results(&self) -> &[ResolvedOrder] {
        match self {
            PhaseReport::Movement(r) => &r.results,
            PhaseReport::Retreat(r) => &r.results,
            PhaseReport::Reconciliation(r) => &r.results,
        }
    }
}
