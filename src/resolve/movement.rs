//! Movement-phase adjudication.
//!
//! Orders are validated against the board graph, matched against each other
//! (transports to transported moves, supports to the orders they support),
//! and then every open decision is settled by an iterative fixed point:
//!
//! * a move succeeds or fails,
//! * a support is given or not,
//! * a transported army's chain of fleets holds or breaks.
//!
//! Each decision is tri-state. Strengths are computed as `(min, max)` bounds
//! over the decisions still open, and a decision is settled as soon as the
//! bounds agree. A queue of open decisions is re-judged until it drains. When
//! a full pass makes no progress the remaining decisions are circular: a ring
//! of moves each into the next one's province is tried as all-succeed, and
//! otherwise the dependency chain is followed to its cycle and every decision
//! on it is failed.

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, trace, warn};

use crate::board::graph::BoardGraph;
use crate::board::order::{Location, Order};
use crate::board::province::{Coast, Power, Province, ProvinceType, ALL_PROVINCES, PROVINCE_COUNT};
use crate::board::state::{DislodgedUnit, GameState, Phase, StateError};
use crate::board::unit::{Unit, UnitId, UnitType};

use super::report::{MovementReport, OrderIssue, OrderResult, ResolvedOrder, Violation};

/// Resolves a movement phase.
///
/// Units without a valid order hold. The returned state keeps its phase and
/// carries the dislodged units; the orchestrator advances the phase.
pub fn resolve_movement(
    graph: &BoardGraph,
    state: GameState,
    orders: &[(Order, Power)],
) -> Result<(GameState, MovementReport), StateError> {
    state.expect_phase(Phase::is_movement, "movement")?;

    let mut adj = Adjudicator::new(graph, &state.units);
    let rejected = adj.validate(orders);
    adj.index();
    adj.run();

    let report = adj.report(orders, rejected);
    let next = adj.apply(state, &report);
    debug!(
        orders = orders.len(),
        dislodged = report.dislodged.len(),
        standoffs = report.standoffs.len(),
        "movement resolved"
    );
    Ok((next, report))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Unresolved,
    Succeeds,
    Fails,
}

/// An open decision: the outcome of a unit's order, or the transport path of
/// a transported army.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Outcome(usize),
    Path(usize),
}

impl Key {
    fn entry(self) -> usize {
        match self {
            Key::Outcome(i) | Key::Path(i) => i,
        }
    }
}

/// What a unit effectively does once its order has been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plan {
    Hold,
    Move { dest: Location, convoyed: bool },
    SupportHold { target: usize },
    SupportMove { target: usize, dest: Province },
    Transport { army: usize, dest: Province },
}

#[derive(Debug, Clone)]
struct Entry {
    unit: Unit,
    plan: Plan,
    /// Index of the order driving this unit, if one was accepted.
    order: Option<usize>,
    issue: Option<OrderIssue>,
    outcome: Decision,
    path: Decision,
    /// Settled by the cycle rule rather than by strength.
    forced: bool,
}

type Bounds = (u32, u32);

fn plus_one((lo, hi): Bounds) -> Bounds {
    (lo + 1, hi + 1)
}

struct Adjudicator<'a> {
    graph: &'a BoardGraph,
    entries: Vec<Entry>,
    occupant: [Option<usize>; PROVINCE_COUNT],
    /// Moves into each province that can still exert force.
    attackers: Vec<Vec<usize>>,
    /// Supports aimed at each entry's effective order.
    supports: Vec<Vec<usize>>,
    /// Matched transport fleets for each transported army.
    transports: Vec<Vec<usize>>,
}

impl<'a> Adjudicator<'a> {
    fn new(graph: &'a BoardGraph, units: &[Unit]) -> Self {
        let entries: Vec<Entry> = units
            .iter()
            .map(|&unit| Entry {
                unit,
                plan: Plan::Hold,
                order: None,
                issue: None,
                outcome: Decision::Succeeds,
                path: Decision::Succeeds,
                forced: false,
            })
            .collect();
        let n = entries.len();
        let mut occupant = [None; PROVINCE_COUNT];
        for (i, e) in entries.iter().enumerate() {
            occupant[e.unit.province() as usize] = Some(i);
        }
        Adjudicator {
            graph,
            entries,
            occupant,
            attackers: vec![Vec::new(); PROVINCE_COUNT],
            supports: vec![Vec::new(); n],
            transports: vec![Vec::new(); n],
        }
    }

    // --- validation ---

    /// Validates every order. Returns the results of orders that could not be
    /// attached to a unit at all, indexed by order position.
    fn validate(&mut self, orders: &[(Order, Power)]) -> Vec<Option<ResolvedOrder>> {
        let mut rejected = vec![None; orders.len()];
        for (k, &(order, power)) in orders.iter().enumerate() {
            match self.assign(order, power) {
                Ok(i) => {
                    self.entries[i].order = Some(k);
                    match self.local_plan(i, order) {
                        Ok(plan) => self.entries[i].plan = plan,
                        Err(v) => self.reject(i, v),
                    }
                }
                Err(issue) => rejected[k] = Some(ResolvedOrder::rejected(order, power, issue)),
            }
        }
        self.match_transports();
        self.check_chains();
        self.match_supports();
        rejected
    }

    fn index_of(&self, id: UnitId) -> Option<usize> {
        self.entries.binary_search_by_key(&id, |e| e.unit.id).ok()
    }

    fn assign(&self, order: Order, power: Power) -> Result<usize, OrderIssue> {
        let Some(id) = order.unit().filter(|_| order.is_movement_order()) else {
            return Err(OrderIssue::InvalidOrder(Violation::WrongPhase));
        };
        let i = self
            .index_of(id)
            .filter(|&i| self.entries[i].unit.power == power)
            .ok_or(OrderIssue::AmbiguousUnitReference { unit: id, power })?;
        if self.entries[i].order.is_some() {
            return Err(OrderIssue::InvalidOrder(Violation::DuplicateOrder));
        }
        Ok(i)
    }

    fn reject(&mut self, i: usize, violation: Violation) {
        let e = &mut self.entries[i];
        e.plan = Plan::Hold;
        e.issue = Some(OrderIssue::InvalidOrder(violation));
    }

    fn target_of(&self, i: usize, id: UnitId) -> Result<usize, Violation> {
        match self.index_of(id) {
            None => Err(Violation::UnknownUnit),
            Some(t) if t == i => Err(Violation::SelfTarget),
            Some(t) => Ok(t),
        }
    }

    /// Checks an order on its own, without looking at other orders.
    fn local_plan(&self, i: usize, order: Order) -> Result<Plan, Violation> {
        let unit = self.entries[i].unit;
        match order {
            Order::Hold { .. } => Ok(Plan::Hold),
            Order::Move { dest, via_transport, .. } => move_plan(self.graph, &unit, dest, via_transport),
            Order::SupportHold { supported, .. } => {
                let target = self.target_of(i, supported)?;
                let at = self.entries[target].unit.province();
                if !self.graph.can_reach(unit.location, unit.unit_type, at) {
                    return Err(Violation::Unreachable);
                }
                Ok(Plan::SupportHold { target })
            }
            Order::SupportMove { supported, dest, .. } => {
                let target = self.target_of(i, supported)?;
                if dest == unit.province() {
                    return Err(Violation::SelfTarget);
                }
                if !self.graph.can_reach(unit.location, unit.unit_type, dest) {
                    return Err(Violation::Unreachable);
                }
                Ok(Plan::SupportMove { target, dest })
            }
            Order::Transport { carried, dest, .. } => {
                if unit.unit_type != UnitType::Fleet || unit.province().province_type() != ProvinceType::Sea {
                    return Err(Violation::NotAtSea);
                }
                let army = self.target_of(i, carried)?;
                if self.entries[army].unit.unit_type != UnitType::Army {
                    return Err(Violation::NotTransportable);
                }
                Ok(Plan::Transport { army, dest })
            }
            _ => Err(Violation::WrongPhase),
        }
    }

    fn match_transports(&mut self) {
        for i in 0..self.entries.len() {
            let Plan::Transport { army, dest } = self.entries[i].plan else {
                continue;
            };
            let matched = matches!(
                self.entries[army].plan,
                Plan::Move { dest: to, convoyed: true } if to.province == dest
            );
            if matched {
                self.transports[army].push(i);
            } else {
                self.reject(i, Violation::TransportMismatch);
            }
        }
    }

    /// Fails transported moves that no arrangement of their fleets can carry.
    fn check_chains(&mut self) {
        for i in 0..self.entries.len() {
            if !matches!(self.entries[i].plan, Plan::Move { convoyed: true, .. }) {
                continue;
            }
            if self.chain_exists(i, &self.transports[i]) {
                self.entries[i].path = Decision::Unresolved;
            } else {
                let e = &mut self.entries[i];
                e.path = Decision::Fails;
                e.outcome = Decision::Fails;
                e.issue = Some(OrderIssue::TransportChainFailure);
            }
        }
    }

    fn match_supports(&mut self) {
        for i in 0..self.entries.len() {
            let valid = match self.entries[i].plan {
                Plan::SupportHold { target } => !matches!(self.entries[target].plan, Plan::Move { .. }),
                Plan::SupportMove { target, dest } => matches!(
                    self.entries[target].plan,
                    Plan::Move { dest: to, .. } if to.province == dest
                ),
                _ => continue,
            };
            if !valid {
                self.reject(i, Violation::SupportMismatch);
            }
        }
    }

    /// Builds the lookup tables and opens the decisions to be settled.
    fn index(&mut self) {
        for i in 0..self.entries.len() {
            match self.entries[i].plan {
                Plan::Move { dest, .. } => {
                    if self.entries[i].path != Decision::Fails {
                        self.attackers[dest.province as usize].push(i);
                        self.entries[i].outcome = Decision::Unresolved;
                    }
                }
                Plan::SupportHold { target } | Plan::SupportMove { target, .. } => {
                    self.supports[target].push(i);
                    self.entries[i].outcome = Decision::Unresolved;
                }
                Plan::Hold | Plan::Transport { .. } => {}
            }
        }
    }

    /// True if the fleets in `fleets` form a contiguous sea chain from the
    /// army's province to its destination.
    fn chain_exists(&self, army: usize, fleets: &[usize]) -> bool {
        let Plan::Move { dest, .. } = self.entries[army].plan else {
            return false;
        };
        let origin = self.entries[army].unit.province();
        let at = |f: usize| self.entries[f].unit.location;

        let mut reached = vec![false; fleets.len()];
        let mut queue = VecDeque::new();
        for (k, &f) in fleets.iter().enumerate() {
            if self.graph.can_reach(at(f), UnitType::Fleet, origin) {
                reached[k] = true;
                queue.push_back(k);
            }
        }
        while let Some(k) = queue.pop_front() {
            let here = at(fleets[k]);
            if self.graph.can_reach(here, UnitType::Fleet, dest.province) {
                return true;
            }
            for (n, &g) in fleets.iter().enumerate() {
                if !reached[n] && self.graph.can_reach(here, UnitType::Fleet, self.entries[g].unit.province()) {
                    reached[n] = true;
                    queue.push_back(n);
                }
            }
        }
        false
    }

    // --- decisions ---

    fn get(&self, key: Key) -> Decision {
        match key {
            Key::Outcome(i) => self.entries[i].outcome,
            Key::Path(i) => self.entries[i].path,
        }
    }

    fn set(&mut self, key: Key, decision: Decision) {
        match key {
            Key::Outcome(i) => self.entries[i].outcome = decision,
            Key::Path(i) => self.entries[i].path = decision,
        }
    }

    /// Reads a decision, recording it in `deps` if still open.
    fn read(&self, key: Key, deps: &mut Vec<Key>) -> Decision {
        let d = self.get(key);
        if d == Decision::Unresolved && !deps.contains(&key) {
            deps.push(key);
        }
        d
    }

    fn is_move(&self, i: usize) -> bool {
        matches!(self.entries[i].plan, Plan::Move { .. })
    }

    fn power(&self, i: usize) -> Power {
        self.entries[i].unit.power
    }

    fn province(&self, i: usize) -> Province {
        self.entries[i].unit.province()
    }

    /// The unit `m` meets head-on: both move directly into each other's province.
    fn head_to_head(&self, m: usize) -> Option<usize> {
        let Plan::Move { dest, convoyed: false } = self.entries[m].plan else {
            return None;
        };
        let d = self.occupant[dest.province as usize]?;
        match self.entries[d].plan {
            Plan::Move { dest: back, convoyed: false } if back.province == self.province(m) => Some(d),
            _ => None,
        }
    }

    fn support_bounds(&self, i: usize, exclude: Option<Power>, deps: &mut Vec<Key>) -> Bounds {
        let mut bounds = (0, 0);
        for &s in &self.supports[i] {
            if Some(self.power(s)) == exclude {
                continue;
            }
            match self.read(Key::Outcome(s), deps) {
                Decision::Succeeds => {
                    bounds.0 += 1;
                    bounds.1 += 1;
                }
                Decision::Unresolved => bounds.1 += 1,
                Decision::Fails => {}
            }
        }
        bounds
    }

    fn attack_strength(&self, m: usize, deps: &mut Vec<Key>) -> Bounds {
        let Plan::Move { dest, .. } = self.entries[m].plan else {
            return (0, 0);
        };
        let path = self.read(Key::Path(m), deps);
        if path == Decision::Fails {
            return (0, 0);
        }
        let full = plus_one(self.support_bounds(m, None, deps));
        let bounds = match self.occupant[dest.province as usize] {
            None => full,
            Some(d) => {
                let opposed = if self.power(d) == self.power(m) {
                    (0, 0)
                } else {
                    plus_one(self.support_bounds(m, Some(self.power(d)), deps))
                };
                if !self.is_move(d) || self.head_to_head(m) == Some(d) {
                    opposed
                } else {
                    match self.read(Key::Outcome(d), deps) {
                        Decision::Succeeds => full,
                        Decision::Fails => opposed,
                        Decision::Unresolved => (opposed.0, full.1),
                    }
                }
            }
        };
        if path == Decision::Unresolved {
            (0, bounds.1)
        } else {
            bounds
        }
    }

    fn hold_strength(&self, province: Province, deps: &mut Vec<Key>) -> Bounds {
        let Some(d) = self.occupant[province as usize] else {
            return (0, 0);
        };
        if self.is_move(d) {
            return match self.read(Key::Outcome(d), deps) {
                Decision::Succeeds => (0, 0),
                Decision::Fails => (1, 1),
                Decision::Unresolved => (0, 1),
            };
        }
        plus_one(self.support_bounds(d, None, deps))
    }

    fn prevent_strength(&self, j: usize, deps: &mut Vec<Key>) -> Bounds {
        let path = self.read(Key::Path(j), deps);
        if path == Decision::Fails {
            return (0, 0);
        }
        let mut bounds = plus_one(self.support_bounds(j, None, deps));
        if let Some(opponent) = self.head_to_head(j) {
            match self.read(Key::Outcome(opponent), deps) {
                Decision::Succeeds => return (0, 0),
                Decision::Unresolved => bounds.0 = 0,
                Decision::Fails => {}
            }
        }
        if path == Decision::Unresolved {
            bounds.0 = 0;
        }
        bounds
    }

    fn dislodged(&self, i: usize, deps: &mut Vec<Key>) -> Decision {
        let stays = if self.is_move(i) {
            match self.read(Key::Outcome(i), deps) {
                Decision::Succeeds => return Decision::Fails,
                d => d == Decision::Fails,
            }
        } else {
            true
        };
        let mut attacked = Decision::Fails;
        for &j in &self.attackers[self.province(i) as usize] {
            match self.read(Key::Outcome(j), deps) {
                Decision::Succeeds => {
                    attacked = Decision::Succeeds;
                    break;
                }
                Decision::Unresolved => attacked = Decision::Unresolved,
                Decision::Fails => {}
            }
        }
        match (attacked, stays) {
            (Decision::Fails, _) => Decision::Fails,
            (Decision::Succeeds, true) => Decision::Succeeds,
            _ => Decision::Unresolved,
        }
    }

    fn judge_move(&self, m: usize, deps: &mut Vec<Key>) -> Decision {
        let Plan::Move { dest, .. } = self.entries[m].plan else {
            return Decision::Fails;
        };
        if self.read(Key::Path(m), deps) == Decision::Fails {
            return Decision::Fails;
        }
        let attack = self.attack_strength(m, deps);
        let resist = match self.head_to_head(m) {
            Some(d) => plus_one(self.support_bounds(d, None, deps)),
            None => self.hold_strength(dest.province, deps),
        };
        let mut rival = (0, 0);
        for &j in &self.attackers[dest.province as usize] {
            if j != m {
                let p = self.prevent_strength(j, deps);
                rival = (rival.0.max(p.0), rival.1.max(p.1));
            }
        }
        if attack.0 > resist.1 && attack.0 > rival.1 {
            Decision::Succeeds
        } else if attack.1 <= resist.0 || attack.1 <= rival.0 {
            Decision::Fails
        } else {
            Decision::Unresolved
        }
    }

    fn judge_support(&self, s: usize, deps: &mut Vec<Key>) -> Decision {
        let against = match self.entries[s].plan {
            Plan::SupportMove { dest, .. } => Some(dest),
            _ => None,
        };
        let mut cut = Decision::Fails;
        for &j in &self.attackers[self.province(s) as usize] {
            if self.power(j) == self.power(s) || Some(self.province(j)) == against {
                continue;
            }
            match self.read(Key::Path(j), deps) {
                Decision::Succeeds => {
                    cut = Decision::Succeeds;
                    break;
                }
                Decision::Unresolved => cut = Decision::Unresolved,
                Decision::Fails => {}
            }
        }
        if cut == Decision::Succeeds {
            return Decision::Fails;
        }
        match (cut, self.dislodged(s, deps)) {
            (_, Decision::Succeeds) => Decision::Fails,
            (Decision::Fails, Decision::Fails) => Decision::Succeeds,
            _ => Decision::Unresolved,
        }
    }

    fn judge_path(&self, a: usize, deps: &mut Vec<Key>) -> Decision {
        let mut possible = Vec::new();
        let mut intact = Vec::new();
        for &f in &self.transports[a] {
            match self.dislodged(f, deps) {
                Decision::Fails => {
                    possible.push(f);
                    intact.push(f);
                }
                Decision::Unresolved => possible.push(f),
                Decision::Succeeds => {}
            }
        }
        if !self.chain_exists(a, &possible) {
            Decision::Fails
        } else if self.chain_exists(a, &intact) {
            Decision::Succeeds
        } else {
            Decision::Unresolved
        }
    }

    fn judge(&self, key: Key, deps: &mut Vec<Key>) -> Decision {
        match key {
            Key::Path(i) => self.judge_path(i, deps),
            Key::Outcome(i) => match self.entries[i].plan {
                Plan::Move { .. } => self.judge_move(i, deps),
                Plan::SupportHold { .. } | Plan::SupportMove { .. } => self.judge_support(i, deps),
                Plan::Hold | Plan::Transport { .. } => Decision::Succeeds,
            },
        }
    }

    // --- fixed point ---

    fn run(&mut self) {
        let mut queue: VecDeque<Key> = VecDeque::new();
        for (i, e) in self.entries.iter().enumerate() {
            if e.path == Decision::Unresolved {
                queue.push_back(Key::Path(i));
            }
            if e.outcome == Decision::Unresolved {
                queue.push_back(Key::Outcome(i));
            }
        }

        let mut deps = Vec::new();
        let mut idle = 0;
        while let Some(key) = queue.pop_front() {
            if self.get(key) != Decision::Unresolved {
                continue;
            }
            deps.clear();
            let decision = self.judge(key, &mut deps);
            if decision != Decision::Unresolved {
                self.set(key, decision);
                idle = 0;
                continue;
            }
            queue.push_back(key);
            idle += 1;
            if idle >= queue.len() {
                trace!(pending = queue.len(), "fixed point stalled");
                let pending: Vec<Key> = queue.iter().copied().filter(|&k| self.get(k) == Decision::Unresolved).collect();
                if !self.try_ring(&pending) {
                    self.fail_cycle(&pending);
                }
                idle = 0;
            }
        }
    }

    /// Moves starting at `start`, each into the province of the next, closing
    /// back on `start`. Two units swapping directly are a head-to-head battle,
    /// not a ring.
    fn ring_from(&self, start: usize) -> Option<Vec<usize>> {
        let mut ring = vec![start];
        let mut current = start;
        loop {
            let Plan::Move { dest, .. } = self.entries[current].plan else {
                return None;
            };
            let next = self.occupant[dest.province as usize]?;
            if next == start {
                break;
            }
            if ring.contains(&next) || !self.is_move(next) || self.entries[next].outcome != Decision::Unresolved {
                return None;
            }
            ring.push(next);
            current = next;
        }
        if ring.len() == 2 && self.head_to_head(start).is_some() {
            return None;
        }
        Some(ring)
    }

    /// Settles the first ring of moves that is consistent with all of them succeeding.
    fn try_ring(&mut self, pending: &[Key]) -> bool {
        for &key in pending {
            let Key::Outcome(start) = key else { continue };
            if !self.is_move(start) {
                continue;
            }
            let Some(ring) = self.ring_from(start) else { continue };
            for &m in &ring {
                self.entries[m].outcome = Decision::Succeeds;
            }
            let consistent = ring.iter().all(|&m| self.judge_move(m, &mut Vec::new()) == Decision::Succeeds);
            if consistent {
                debug!(size = ring.len(), "circular movement succeeds");
                return true;
            }
            for &m in &ring {
                self.entries[m].outcome = Decision::Unresolved;
            }
        }
        false
    }

    /// Follows open dependencies from the first pending decision until they
    /// close into a cycle, then fails every decision on it.
    fn fail_cycle(&mut self, pending: &[Key]) {
        let Some(&first) = pending.first() else { return };
        let mut trail: Vec<Key> = Vec::new();
        let mut current = first;
        let cycle = loop {
            if let Some(pos) = trail.iter().position(|&k| k == current) {
                break trail.split_off(pos);
            }
            trail.push(current);
            let mut deps = Vec::new();
            self.judge(current, &mut deps);
            match deps.first() {
                Some(&next) => current = next,
                None => break vec![current],
            }
        };
        warn!(size = cycle.len(), "paradoxical orders; failing every decision on the cycle");
        for key in cycle {
            self.set(key, Decision::Fails);
            self.entries[key.entry()].forced = true;
        }
    }

    // --- results ---

    /// The successful attacker that drives entry `i` out, if any.
    fn dislodger(&self, i: usize) -> Option<usize> {
        if self.is_move(i) && self.entries[i].outcome == Decision::Succeeds {
            return None;
        }
        self.attackers[self.province(i) as usize]
            .iter()
            .copied()
            .find(|&j| self.entries[j].outcome == Decision::Succeeds)
    }

    fn moved(&self, i: usize) -> bool {
        self.is_move(i) && self.entries[i].outcome == Decision::Succeeds
    }

    fn bounced(&self, i: usize) -> bool {
        let e = &self.entries[i];
        self.is_move(i) && e.outcome == Decision::Fails && e.path == Decision::Succeeds && !e.forced
    }

    fn standoffs(&self) -> BTreeSet<Province> {
        let mut standoffs = BTreeSet::new();
        for (&province, movers) in ALL_PROVINCES.iter().zip(&self.attackers) {
            if !movers.iter().any(|&j| self.bounced(j)) || movers.iter().any(|&j| self.moved(j)) {
                continue;
            }
            let vacant = match self.occupant[province as usize] {
                None => true,
                Some(d) => self.moved(d),
            };
            if vacant {
                standoffs.insert(province);
            }
        }
        standoffs
    }

    fn result_of(&self, i: usize, dislodged: bool) -> (OrderResult, Option<OrderIssue>) {
        let e = &self.entries[i];
        if let Some(issue @ OrderIssue::InvalidOrder(_)) = e.issue {
            return (OrderResult::Invalid, Some(issue));
        }
        if dislodged {
            return (OrderResult::Dislodged, e.issue);
        }
        match e.plan {
            Plan::Hold => (OrderResult::Succeeded, None),
            Plan::Move { .. } => match e.outcome {
                Decision::Succeeds => (OrderResult::Succeeded, None),
                _ if e.forced => (OrderResult::Failed, Some(OrderIssue::ResolutionCycle)),
                _ if e.path == Decision::Fails => (OrderResult::Failed, Some(OrderIssue::TransportChainFailure)),
                _ => (OrderResult::Bounced, None),
            },
            Plan::SupportHold { .. } | Plan::SupportMove { .. } => match e.outcome {
                _ if e.forced => (OrderResult::Failed, Some(OrderIssue::ResolutionCycle)),
                Decision::Succeeds => (OrderResult::Succeeded, None),
                _ => (OrderResult::Cut, None),
            },
            Plan::Transport { army, .. } => {
                let carried = &self.entries[army];
                match carried.path {
                    Decision::Succeeds => (OrderResult::Succeeded, None),
                    _ if carried.forced => (OrderResult::Failed, Some(OrderIssue::ResolutionCycle)),
                    _ => (OrderResult::Failed, None),
                }
            }
        }
    }

    fn report(&self, orders: &[(Order, Power)], mut results: Vec<Option<ResolvedOrder>>) -> MovementReport {
        let standoffs = self.standoffs();
        let mut dislodged = Vec::new();
        for (i, e) in self.entries.iter().enumerate() {
            let attacker = self.dislodger(i);
            if let Some(j) = attacker {
                dislodged.push(DislodgedUnit {
                    unit: e.unit,
                    attacker_from: self.province(j),
                    standoffs: standoffs.clone(),
                });
            }
            if let Some(k) = e.order {
                let (order, power) = orders[k];
                let (result, issue) = self.result_of(i, attacker.is_some());
                results[k] = Some(ResolvedOrder { order, power, result, issue });
            }
        }
        MovementReport {
            results: results.into_iter().flatten().collect(),
            dislodged,
            standoffs,
        }
    }

    fn apply(&self, mut state: GameState, report: &MovementReport) -> GameState {
        state.units = self
            .entries
            .iter()
            .enumerate()
            .filter(|&(i, _)| self.dislodger(i).is_none())
            .map(|(i, e)| {
                let mut unit = e.unit;
                if let (true, Plan::Move { dest, .. }) = (self.moved(i), e.plan) {
                    unit.location = dest;
                }
                unit
            })
            .collect();
        state.dislodged = report.dislodged.clone();
        state
    }
}

/// Checks a move on its own and resolves the destination coast.
fn move_plan(graph: &BoardGraph, unit: &Unit, dest: Location, via_transport: bool) -> Result<Plan, Violation> {
    if dest.province == unit.province() {
        return Err(Violation::SelfTarget);
    }
    if via_transport {
        let coastal = |p: Province| p.province_type() == ProvinceType::Coastal;
        if unit.unit_type != UnitType::Army || !coastal(unit.province()) || !coastal(dest.province) {
            return Err(Violation::NotTransportable);
        }
        return Ok(Plan::Move { dest: Location::new(dest.province), convoyed: true });
    }
    match unit.unit_type {
        UnitType::Army => {
            let dest = Location::new(dest.province);
            if !graph.is_adjacent(unit.location, dest, UnitType::Army) {
                return Err(Violation::Unreachable);
            }
            Ok(Plan::Move { dest, convoyed: false })
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
            Ok(Plan::Move { dest: Location::with_coast(dest.province, coast), convoyed: false })
        }
    }
}

/// Every movement-phase order the unit could be given.
///
/// Moves and supports follow the board graph. Transported moves and
/// transport orders only cover chains of fleets already at sea. Returns an
/// empty list if no unit with that id is on the board.
pub fn legal_orders(graph: &BoardGraph, state: &GameState, id: UnitId) -> Vec<Order> {
    let Some(unit) = state.unit(id).copied() else {
        return Vec::new();
    };
    let mut orders = vec![Order::Hold { unit: id }];

    let mut moves = BTreeSet::new();
    for loc in graph.reachable(unit.location, unit.unit_type) {
        if let Ok(Plan::Move { dest, .. }) = move_plan(graph, &unit, loc, false) {
            moves.insert(dest);
        }
    }
    orders.extend(moves.into_iter().map(|dest| Order::Move { unit: id, dest, via_transport: false }));

    if unit.unit_type == UnitType::Army {
        let (_, shores) = fleet_chain(graph, state, unit.province());
        for to in shores {
            if move_plan(graph, &unit, Location::new(to), true).is_ok() {
                orders.push(Order::Move { unit: id, dest: Location::new(to), via_transport: true });
            }
        }
    }

    for other in state.units.iter().filter(|u| u.id != id) {
        if graph.can_reach(unit.location, unit.unit_type, other.province()) {
            orders.push(Order::SupportHold { unit: id, supported: other.id });
        }
        let mut targets: BTreeSet<Province> = graph
            .reachable(other.location, other.unit_type)
            .map(|loc| loc.province)
            .collect();
        if other.unit_type == UnitType::Army {
            targets.extend(fleet_chain(graph, state, other.province()).1);
        }
        for dest in targets {
            if dest != unit.province() && graph.can_reach(unit.location, unit.unit_type, dest) {
                orders.push(Order::SupportMove { unit: id, supported: other.id, dest });
            }
        }
    }

    if unit.unit_type == UnitType::Fleet && unit.province().province_type() == ProvinceType::Sea {
        for army in state.units.iter().filter(|u| u.unit_type == UnitType::Army) {
            let (seas, shores) = fleet_chain(graph, state, army.province());
            if seas.contains(&unit.province()) {
                orders.extend(shores.into_iter().map(|dest| Order::Transport { unit: id, carried: army.id, dest }));
            }
        }
    }
    orders
}

/// The seas holding fleets connected to `from` through other such seas, and
/// the coastal provinces other than `from` those seas border.
fn fleet_chain(graph: &BoardGraph, state: &GameState, from: Province) -> (BTreeSet<Province>, BTreeSet<Province>) {
    let fleet_at_sea = |p: Province| {
        p.province_type() == ProvinceType::Sea && state.unit_at(p).is_some_and(|u| u.unit_type == UnitType::Fleet)
    };
    let mut seas = BTreeSet::new();
    let mut shores = BTreeSet::new();
    if from.province_type() != ProvinceType::Coastal {
        return (seas, shores);
    }
    let mut queue: VecDeque<Province> = graph.neighbours(from).filter(|&p| fleet_at_sea(p)).collect();
    seas.extend(queue.iter().copied());
    while let Some(sea) = queue.pop_front() {
        for next in graph.reachable(Location::new(sea), UnitType::Fleet) {
            let p = next.province;
            if fleet_at_sea(p) {
                if seas.insert(p) {
                    queue.push_back(p);
                }
            } else if p.province_type() == ProvinceType::Coastal && p != from {
                shores.insert(p);
            }
        }
    }
    (seas, shores)
}
