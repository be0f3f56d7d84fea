//! Retreat-phase resolution.
//!
//! Each dislodged unit either retreats to a free neighbouring province or is
//! disbanded. A unit without an order is disbanded (civil disorder). Two or
//! more valid retreats into the same province all fail and every one of
//! those units is disbanded.

use std::collections::HashMap;

use tracing::debug;

use crate::board::graph::BoardGraph;
use crate::board::order::{Location, Order};
use crate::board::province::{Coast, Power, Province};
use crate::board::state::{DislodgedUnit, GameState, Phase, StateError};
use crate::board::unit::{UnitId, UnitType};

use super::report::{OrderIssue, OrderResult, ResolvedOrder, RetreatReport, Violation};

/// Resolves retreat-phase orders.
///
/// The returned state has no dislodged units left; its phase is unchanged.
pub fn resolve_retreats(
    graph: &BoardGraph,
    mut state: GameState,
    orders: &[(Order, Power)],
) -> Result<(GameState, RetreatReport), StateError> {
    state.expect_phase(Phase::is_retreat, "retreat")?;

    let dislodged = std::mem::take(&mut state.dislodged);
    let mut results: Vec<Option<ResolvedOrder>> = vec![None; orders.len()];
    let mut chosen: Vec<Option<usize>> = vec![None; dislodged.len()];

    for (k, &(order, power)) in orders.iter().enumerate() {
        match assign(&state, &dislodged, &chosen, order, power) {
            Ok(d) => chosen[d] = Some(k),
            Err(issue) => results[k] = Some(ResolvedOrder::rejected(order, power, issue)),
        }
    }

    // Valid retreat targets, keyed by dislodged index.
    let mut targets: HashMap<usize, Location> = HashMap::new();
    let mut report = RetreatReport::default();
    let mut civil_disorder = Vec::new();
    for (d, unit) in dislodged.iter().enumerate() {
        let Some(k) = chosen[d] else {
            civil_disorder.push(ResolvedOrder::new(
                Order::Disband { unit: unit.unit.id },
                unit.unit.power,
                OrderResult::Succeeded,
            ));
            report.disbanded.push(unit.unit.id);
            continue;
        };
        let (order, power) = orders[k];
        match order {
            Order::Retreat { dest, .. } => match retreat_target(graph, &state, unit, dest) {
                Ok(loc) => {
                    targets.insert(d, loc);
                }
                Err(v) => {
                    results[k] = Some(ResolvedOrder::rejected(order, power, OrderIssue::InvalidOrder(v)));
                    report.disbanded.push(unit.unit.id);
                }
            },
            _ => {
                results[k] = Some(ResolvedOrder::new(order, power, OrderResult::Succeeded));
                report.disbanded.push(unit.unit.id);
            }
        }
    }

    let mut demand: HashMap<Province, usize> = HashMap::new();
    for loc in targets.values() {
        *demand.entry(loc.province).or_default() += 1;
    }
    for (d, unit) in dislodged.iter().enumerate() {
        let (Some(&loc), Some(k)) = (targets.get(&d), chosen[d]) else {
            continue;
        };
        let (order, power) = orders[k];
        if demand[&loc.province] > 1 {
            results[k] = Some(ResolvedOrder::new(order, power, OrderResult::Bounced));
            report.disbanded.push(unit.unit.id);
        } else {
            results[k] = Some(ResolvedOrder::new(order, power, OrderResult::Succeeded));
            let mut retreated = unit.unit;
            retreated.location = loc;
            state.units.push(retreated);
            report.retreated.push(retreated.id);
        }
    }

    report.results = results.into_iter().flatten().chain(civil_disorder).collect();
    state.sort_units();
    debug!(
        retreated = report.retreated.len(),
        disbanded = report.disbanded.len(),
        "retreats resolved"
    );
    Ok((state, report))
}

/// Attaches an order to the dislodged unit it names.
fn assign(
    state: &GameState,
    dislodged: &[DislodgedUnit],
    chosen: &[Option<usize>],
    order: Order,
    power: Power,
) -> Result<usize, OrderIssue> {
    let id = match order {
        Order::Retreat { unit, .. } | Order::Disband { unit } => unit,
        _ => return Err(OrderIssue::InvalidOrder(Violation::WrongPhase)),
    };
    let ambiguous = OrderIssue::AmbiguousUnitReference { unit: id, power };
    let Some(d) = dislodged.iter().position(|d| d.unit.id == id) else {
        return match state.unit(id) {
            Some(unit) if unit.power == power => Err(OrderIssue::InvalidOrder(Violation::NotDislodged)),
            _ => Err(ambiguous),
        };
    };
    if dislodged[d].unit.power != power {
        return Err(ambiguous);
    }
    if chosen[d].is_some() {
        return Err(OrderIssue::InvalidOrder(Violation::DuplicateOrder));
    }
    Ok(d)
}

/// Checks a retreat destination and resolves its coast.
fn retreat_target(
    graph: &BoardGraph,
    state: &GameState,
    dislodged: &DislodgedUnit,
    dest: Location,
) -> Result<Location, Violation> {
    let unit = &dislodged.unit;
    let target = match unit.unit_type {
        UnitType::Army => {
            let to = Location::new(dest.province);
            if !graph.is_adjacent(unit.location, to, UnitType::Army) {
                return Err(Violation::Unreachable);
            }
            to
        }
        UnitType::Fleet => {
            let coasts = graph.coasts_reachable(unit.location, UnitType::Fleet, dest.province);
            let coast = match (dest.coast, coasts.as_slice()) {
                (_, []) => return Err(Violation::Unreachable),
                (Coast::None, [only]) => *only,
                (Coast::None, _) => return Err(Violation::CoastRequired),
                (wanted, reachable) if reachable.contains(&wanted) => wanted,
                _ => return Err(Violation::Unreachable),
            };
            Location::with_coast(dest.province, coast)
        }
    };
    if state.unit_at(target.province).is_some() {
        return Err(Violation::Occupied);
    }
    if target.province == dislodged.attacker_from {
        return Err(Violation::AttackerOrigin);
    }
    if dislodged.standoffs.contains(&target.province) {
        return Err(Violation::Standoff);
    }
    Ok(target)
}

/// The locations a dislodged unit may retreat to, in board order.
pub fn retreat_destinations(graph: &BoardGraph, dislodged: &DislodgedUnit, state: &GameState) -> Vec<Location> {
    let unit = &dislodged.unit;
    let mut found: Vec<Location> = graph
        .reachable(unit.location, unit.unit_type)
        .filter_map(|loc| retreat_target(graph, state, dislodged, loc).ok())
        .collect();
    found.sort();
    found.dedup();
    found
}

/// Every order a dislodged unit could be given: a retreat to each free
/// destination, or a disband. Empty if the unit is not dislodged.
pub fn legal_retreats(graph: &BoardGraph, state: &GameState, id: UnitId) -> Vec<Order> {
    let Some(dislodged) = state.dislodged.iter().find(|d| d.unit.id == id) else {
        return Vec::new();
    };
    retreat_destinations(graph, dislodged, state)
        .into_iter()
        .map(|dest| Order::Retreat { unit: id, dest })
        .chain([Order::Disband { unit: id }])
        .collect()
}
