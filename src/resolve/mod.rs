//! Order resolution.
//!
//! Resolves a set of simultaneous orders into per-order outcomes for each
//! kind of phase, and sequences phases through the game year.

pub mod build;
pub mod movement;
pub mod phase;
pub mod report;
pub mod retreat;

pub use build::{build_locations, legal_adjustments, resolve_builds};
pub use movement::{legal_orders, resolve_movement};
pub use phase::{advance_state, next_phase, resolve_phase, update_sc_ownership, winner};
pub use report::{
    BuildReport, MovementReport, OrderIssue, OrderResult, PhaseReport, ResolvedOrder,
    RetreatReport, Violation,
};
pub use retreat::{legal_retreats, resolve_retreats, retreat_destinations};
