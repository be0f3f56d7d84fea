//! Phase sequencing.
//!
//! Selects the resolver for the current phase and advances the game state
//! through the year:
//!
//! - Spring Movement -> Spring Retreat (if dislodged) OR Fall Movement
//! - Spring Retreat  -> Fall Movement
//! - Fall Movement   -> Fall Retreat (if dislodged) OR Reconciliation
//! - Fall Retreat    -> Reconciliation
//! - Reconciliation  -> Spring Movement (next year)

use tracing::info;

use crate::board::graph::BoardGraph;
use crate::board::order::Order;
use crate::board::province::{Power, ALL_POWERS};
use crate::board::state::{GameState, Phase, StateError};

use super::build::resolve_builds;
use super::movement::resolve_movement;
use super::report::PhaseReport;
use super::retreat::resolve_retreats;

/// Computes the phase that follows `phase`.
pub fn next_phase(phase: Phase, has_dislodgements: bool) -> Phase {
    match phase {
        Phase::SpringMovement if has_dislodgements => Phase::SpringRetreat,
        Phase::SpringMovement | Phase::SpringRetreat => Phase::FallMovement,
        Phase::FallMovement if has_dislodgements => Phase::FallRetreat,
        Phase::FallMovement | Phase::FallRetreat => Phase::Reconciliation,
        Phase::Reconciliation => Phase::SpringMovement,
    }
}

/// Supply centers are captured by the power whose unit occupies them.
/// Vacant centers keep their owner.
pub fn update_sc_ownership(state: &mut GameState) {
    let captured: Vec<_> = state
        .units
        .iter()
        .filter(|u| u.province().is_supply_center())
        .map(|u| (u.province(), u.power))
        .collect();
    for (province, power) in captured {
        state.set_sc_owner(province, Some(power));
    }
}

/// Advances the state to the next phase.
///
/// Ownership is updated on entering Reconciliation, the year increments on
/// entering Spring Movement, and dislodged units are cleared unless a retreat
/// phase follows.
pub fn advance_state(state: &mut GameState, has_dislodgements: bool) {
    let next = next_phase(state.phase, has_dislodgements);
    if next == Phase::Reconciliation {
        update_sc_ownership(state);
    }
    if next == Phase::SpringMovement {
        state.year = state.year.saturating_add(1);
    }
    state.phase = next;
    if !next.is_retreat() {
        state.dislodged.clear();
    }
}

/// The power owning at least `threshold` supply centers, if any.
pub fn winner(state: &GameState, threshold: usize) -> Option<Power> {
    ALL_POWERS.into_iter().find(|&p| state.center_count(p) >= threshold)
}

/// Resolves the orders for the state's current phase and advances to the next phase.
pub fn resolve_phase(
    graph: &BoardGraph,
    state: GameState,
    orders: &[(Order, Power)],
) -> Result<(GameState, PhaseReport), StateError> {
    let label = state.phase.label(state.year);
    let (mut next, report) = match state.phase {
        Phase::SpringMovement | Phase::FallMovement => {
            let (next, report) = resolve_movement(graph, state, orders)?;
            (next, PhaseReport::Movement(report))
        }
        Phase::SpringRetreat | Phase::FallRetreat => {
            let (next, report) = resolve_retreats(graph, state, orders)?;
            (next, PhaseReport::Retreat(report))
        }
        Phase::Reconciliation => {
            let (next, report) = resolve_builds(graph, state, orders)?;
            (next, PhaseReport::Reconciliation(report))
        }
    };
    let has_dislodgements = !next.dislodged.is_empty();
    advance_state(&mut next, has_dislodgements);
    info!(from = %label, to = %next.phase.label(next.year), "phase resolved");
    Ok((next, report))
}
