//! Reconciliation-phase resolution.
//!
//! At the end of a game year every power's unit count is brought in line with
//! the number of supply centers it owns. Powers with spare centers may build
//! on their own free home centers; powers with too many units disband them,
//! and any shortfall in submitted disbands is filled automatically with the
//! units furthest from home.

use std::cmp::{Ordering, Reverse};

use tracing::debug;

use crate::board::graph::BoardGraph;
use crate::board::order::{Location, Order};
use crate::board::province::{Coast, Power, Province, ALL_POWERS};
use crate::board::state::{GameState, Phase, StateError};
use crate::board::unit::{Unit, UnitId, UnitType};

use super::report::{BuildReport, OrderIssue, OrderResult, ResolvedOrder, Violation};

/// Resolves the reconciliation phase for all powers.
///
/// Supply-center ownership is not changed here; it was settled when the
/// phase was entered.
pub fn resolve_builds(
    graph: &BoardGraph,
    mut state: GameState,
    orders: &[(Order, Power)],
) -> Result<(GameState, BuildReport), StateError> {
    state.expect_phase(|p| p == Phase::Reconciliation, "reconciliation")?;

    let mut results: Vec<Option<ResolvedOrder>> = vec![None; orders.len()];
    for (k, &(order, power)) in orders.iter().enumerate() {
        if !matches!(order, Order::Build { .. } | Order::Disband { .. } | Order::Waive) {
            results[k] = Some(ResolvedOrder::rejected(order, power, OrderIssue::InvalidOrder(Violation::WrongPhase)));
        }
    }

    let mut report = BuildReport::default();
    let mut automatic = Vec::new();
    for power in ALL_POWERS {
        let mine: Vec<usize> = (0..orders.len())
            .filter(|&k| orders[k].1 == power && results[k].is_none())
            .collect();
        let centers = state.center_count(power);
        let units = state.unit_count(power);
        let mut adjustment = Adjustment { orders, results: &mut results, report: &mut report };
        match centers.cmp(&units) {
            Ordering::Greater => adjustment.builds(&mut state, power, centers - units, &mine),
            Ordering::Less => {
                let extra = adjustment.disbands(graph, &mut state, power, units - centers, &mine);
                automatic.extend(extra);
            }
            Ordering::Equal => adjustment.reject_all(&mine),
        }
    }

    report.results = results.into_iter().flatten().chain(automatic).collect();
    debug!(
        built = report.built.len(),
        disbanded = report.disbanded.len(),
        "adjustments resolved"
    );
    Ok((state, report))
}

/// Bookkeeping shared by the per-power adjustment steps.
struct Adjustment<'a> {
    orders: &'a [(Order, Power)],
    results: &'a mut Vec<Option<ResolvedOrder>>,
    report: &'a mut BuildReport,
}

impl Adjustment<'_> {
    fn settle(&mut self, k: usize, result: OrderResult) {
        let (order, power) = self.orders[k];
        self.results[k] = Some(ResolvedOrder::new(order, power, result));
    }

    fn reject(&mut self, k: usize, issue: OrderIssue) {
        let (order, power) = self.orders[k];
        self.results[k] = Some(ResolvedOrder::rejected(order, power, issue));
    }

    fn reject_all(&mut self, mine: &[usize]) {
        for &k in mine {
            let issue = match self.orders[k].0 {
                Order::Disband { .. } => OrderIssue::IllegalDisband(Violation::NoAdjustmentDue),
                _ => OrderIssue::IllegalBuild(Violation::NoAdjustmentDue),
            };
            self.reject(k, issue);
        }
    }

    /// Honours build and waive orders in submission order, up to `allowance`.
    fn builds(&mut self, state: &mut GameState, power: Power, allowance: usize, mine: &[usize]) {
        let mut used = 0;
        for &k in mine {
            match self.orders[k].0 {
                Order::Waive if used < allowance => {
                    used += 1;
                    self.settle(k, OrderResult::Succeeded);
                }
                Order::Waive => self.settle(k, OrderResult::Failed),
                Order::Build { unit_type, location } => match check_build(state, power, unit_type, location) {
                    Err(v) => self.reject(k, OrderIssue::IllegalBuild(v)),
                    Ok(_) if used >= allowance => self.settle(k, OrderResult::Failed),
                    Ok(at) => match state.place_unit(power, unit_type, at) {
                        Some(id) => {
                            used += 1;
                            self.report.built.push(Unit { id, power, unit_type, location: at });
                            self.settle(k, OrderResult::Succeeded);
                        }
                        None => self.reject(k, OrderIssue::IllegalBuild(Violation::Occupied)),
                    },
                },
                _ => self.reject(k, OrderIssue::IllegalDisband(Violation::NoAdjustmentDue)),
            }
        }
    }

    /// Honours submitted disbands up to `count` and fills any shortfall
    /// automatically. Returns the automatic disband results.
    fn disbands(
        &mut self,
        graph: &BoardGraph,
        state: &mut GameState,
        power: Power,
        count: usize,
        mine: &[usize],
    ) -> Vec<ResolvedOrder> {
        let mut chosen: Vec<UnitId> = Vec::new();
        for &k in mine {
            let unit = match self.orders[k].0 {
                Order::Disband { unit } => unit,
                _ => {
                    self.reject(k, OrderIssue::IllegalBuild(Violation::NoAdjustmentDue));
                    continue;
                }
            };
            match state.unit(unit) {
                Some(u) if u.power == power => {
                    if chosen.contains(&unit) {
                        self.reject(k, OrderIssue::IllegalDisband(Violation::DuplicateOrder));
                    } else if chosen.len() < count {
                        chosen.push(unit);
                        self.settle(k, OrderResult::Succeeded);
                    } else {
                        self.settle(k, OrderResult::Failed);
                    }
                }
                _ => self.reject(k, OrderIssue::AmbiguousUnitReference { unit, power }),
            }
        }

        let automatic: Vec<UnitId> = disband_candidates(graph, state, power, &chosen)
            .into_iter()
            .take(count - chosen.len())
            .collect();
        if !automatic.is_empty() {
            debug!(%power, count = automatic.len(), "automatic disbands");
        }
        chosen.extend(&automatic);

        state.units.retain(|u| !chosen.contains(&u.id));
        self.report.disbanded.extend(&chosen);
        automatic
            .into_iter()
            .map(|unit| ResolvedOrder::new(Order::Disband { unit }, power, OrderResult::Succeeded))
            .collect()
    }
}

/// Home centers where `power` could build a unit of `unit_type` right now.
/// Fleets on split-coast provinces get one location per coast.
pub fn build_locations(state: &GameState, power: Power, unit_type: UnitType) -> Vec<Location> {
    power
        .home_centers()
        .flat_map(|province| match unit_type {
            UnitType::Fleet if province.has_coasts() => {
                province.coasts().iter().map(|&c| Location::with_coast(province, c)).collect::<Vec<_>>()
            }
            _ => vec![Location::new(province)],
        })
        .filter_map(|location| check_build(state, power, unit_type, location).ok())
        .collect()
}

/// Every adjustment order `power` could give: builds and a waive when it
/// owns more centers than units, a disband per unit when it owns fewer, and
/// nothing when balanced.
pub fn legal_adjustments(state: &GameState, power: Power) -> Vec<Order> {
    match state.center_count(power).cmp(&state.unit_count(power)) {
        Ordering::Greater => [UnitType::Army, UnitType::Fleet]
            .into_iter()
            .flat_map(|unit_type| {
                build_locations(state, power, unit_type)
                    .into_iter()
                    .map(move |location| Order::Build { unit_type, location })
            })
            .chain([Order::Waive])
            .collect(),
        Ordering::Less => state.units_of(power).map(|u| Order::Disband { unit: u.id }).collect(),
        Ordering::Equal => Vec::new(),
    }
}

/// Checks a build and returns the location the unit will stand on.
fn check_build(state: &GameState, power: Power, unit_type: UnitType, location: Location) -> Result<Location, Violation> {
    let province = location.province;
    if !province.is_supply_center() || province.home_power() != Some(power) {
        return Err(Violation::NotHomeCenter);
    }
    if state.sc_owner(province) != Some(power) {
        return Err(Violation::CenterNotOwned);
    }
    if state.unit_at(province).is_some() {
        return Err(Violation::Occupied);
    }
    if !unit_type.can_occupy(province) {
        return Err(Violation::TerrainMismatch);
    }
    match (unit_type, location.coast) {
        (UnitType::Fleet, Coast::None) if province.has_coasts() => Err(Violation::CoastRequired),
        (UnitType::Fleet, coast) if province.coasts().contains(&coast) => Ok(location),
        (_, Coast::None) => Ok(Location::new(province)),
        _ => Err(Violation::TerrainMismatch),
    }
}

/// The power's units not already chosen, in automatic disband order:
/// furthest from an owned home center first (any home center if none is
/// owned), then fleets before armies, then by province.
fn disband_candidates(graph: &BoardGraph, state: &GameState, power: Power, chosen: &[UnitId]) -> Vec<UnitId> {
    let owned: Vec<Province> = power.home_centers().filter(|&p| state.sc_owner(p) == Some(power)).collect();
    let homes: Vec<Province> = if owned.is_empty() { power.home_centers().collect() } else { owned };

    let mut candidates: Vec<(Reverse<usize>, Reverse<UnitType>, Province, UnitId)> = state
        .units_of(power)
        .filter(|u| !chosen.contains(&u.id))
        .map(|u| {
            let distance = graph.distance(u.province(), |p| homes.contains(&p)).unwrap_or(usize::MAX);
            (Reverse(distance), Reverse(u.unit_type), u.province(), u.id)
        })
        .collect();
    candidates.sort();
    candidates.into_iter().map(|(.., id)| id).collect()
}
