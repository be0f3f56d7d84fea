//! A running game: current state, configuration and the record of past phases.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::graph::BoardGraph;
use crate::board::order::Order;
use crate::board::province::{Power, ALL_POWERS};
use crate::board::state::{GameState, Phase, StateError};
use crate::config::Config;
use crate::resolve::build::legal_adjustments;
use crate::resolve::movement::legal_orders;
use crate::resolve::phase::{resolve_phase, winner};
use crate::resolve::retreat::legal_retreats;
use crate::resolve::report::PhaseReport;

/// One resolved phase: the state the orders were given in, the orders, and
/// the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub state: GameState,
    pub orders: Vec<(Order, Power)>,
    pub report: PhaseReport,
}

/// A game played on a shared board graph.
#[derive(Debug, Clone)]
pub struct Game<'g> {
    graph: &'g BoardGraph,
    config: Config,
    state: GameState,
    history: Vec<HistoryEntry>,
}

impl<'g> Game<'g> {
    /// Starts a game from the standard opening position.
    pub fn new(graph: &'g BoardGraph, config: Config) -> Self {
        let state = GameState::standard_start(config.start_year);
        Game { graph, config, state, history: Vec::new() }
    }

    /// Resumes a game from an arbitrary state.
    pub fn from_state(graph: &'g BoardGraph, config: Config, state: GameState) -> Result<Self, StateError> {
        state.check_invariants()?;
        Ok(Game { graph, config, state, history: Vec::new() })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Past phases, oldest first. Empty when history is disabled.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The power holding the configured number of supply centers, if any.
    pub fn winner(&self) -> Option<Power> {
        winner(&self.state, self.config.victory_centers)
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Powers that have something to order in the current phase: any unit
    /// during movement, a dislodged unit during retreats, and an unbalanced
    /// center count during reconciliation.
    pub fn needs_orders_from(&self) -> Vec<Power> {
        let state = &self.state;
        ALL_POWERS
            .into_iter()
            .filter(|&power| match state.phase {
                Phase::SpringMovement | Phase::FallMovement => state.unit_count(power) > 0,
                Phase::SpringRetreat | Phase::FallRetreat => state.dislodged.iter().any(|d| d.unit.power == power),
                Phase::Reconciliation => state.center_count(power) != state.unit_count(power),
            })
            .collect()
    }

    /// Every order `power` could give in the current phase, unit by unit.
    pub fn legal_orders(&self, power: Power) -> Vec<Order> {
        let state = &self.state;
        match state.phase {
            Phase::SpringMovement | Phase::FallMovement => state
                .units_of(power)
                .flat_map(|u| legal_orders(self.graph, state, u.id))
                .collect(),
            Phase::SpringRetreat | Phase::FallRetreat => state
                .dislodged
                .iter()
                .filter(|d| d.unit.power == power)
                .flat_map(|d| legal_retreats(self.graph, state, d.unit.id))
                .collect(),
            Phase::Reconciliation => legal_adjustments(state, power),
        }
    }

    /// Resolves the current phase and moves to the next one.
    ///
    /// On error the game is left unchanged.
    pub fn advance(&mut self, orders: &[(Order, Power)]) -> Result<&PhaseReport, StateError> {
        let (next, report) = resolve_phase(self.graph, self.state.clone(), orders)?;
        let previous = std::mem::replace(&mut self.state, next);
        if let Some(power) = self.winner() {
            info!(%power, year = self.state.year, "victory");
        }
        if !self.config.keep_history {
            self.history.clear();
        }
        self.history.push(HistoryEntry { state: previous, orders: orders.to_vec(), report });
        Ok(&self.history[self.history.len() - 1].report)
    }

    pub fn into_state(self) -> GameState {
        self.state
    }
}

/// A standalone resolution job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub state: GameState,
    #[serde(default)]
    pub orders: Vec<(Order, Power)>,
}

/// Resolves many independent phases concurrently against one graph.
///
/// Results are returned in job order.
pub fn resolve_batch(
    graph: &BoardGraph,
    jobs: Vec<Job>,
) -> Vec<Result<(GameState, PhaseReport), StateError>> {
    jobs.into_par_iter()
        .map(|job| resolve_phase(graph, job.state, &job.orders))
        .collect()
}
