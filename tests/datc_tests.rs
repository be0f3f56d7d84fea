//! DATC (Diplomacy Adjudicator Test Cases) compliance tests.
//!
//! Sections covered: 6.A (basic), 6.B (coastal), 6.C (circular),
//! 6.D (supports), 6.E (head-to-head), 6.F (convoys), 6.H (retreats),
//! 6.I (builds). Paradoxical convoys are settled by failing every decision
//! on the cycle rather than by the Szykman rule.

use concordat::board::order::{Location, Order};
use concordat::board::province::{Coast, Power, Province};
use concordat::board::state::{GameState, Phase};
use concordat::board::unit::{UnitId, UnitType};
use concordat::board::BoardGraph;
use concordat::resolve::{
    resolve_builds, resolve_movement, resolve_phase, BuildReport, MovementReport, OrderIssue,
    OrderResult, PhaseReport, Violation,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Board {
    graph: BoardGraph,
    state: GameState,
    orders: Vec<(Order, Power)>,
}

impl Board {
    fn new() -> Self {
        Self::in_phase(Phase::SpringMovement)
    }

    fn in_phase(phase: Phase) -> Self {
        Board {
            graph: BoardGraph::standard().unwrap(),
            state: GameState::empty(1901, phase),
            orders: Vec::new(),
        }
    }

    /// Places a unit from a short description like `"A vie"` or `"F spa/nc"`.
    fn unit(&mut self, power: Power, desc: &str) -> UnitId {
        let (kind, loc) = desc.split_once(' ').unwrap();
        let unit_type = match kind {
            "A" => UnitType::Army,
            "F" => UnitType::Fleet,
            other => panic!("bad unit type {other}"),
        };
        self.state
            .place_unit(power, unit_type, Location::parse(loc).unwrap())
            .unwrap()
    }

    /// Submits an order on behalf of the unit's owner.
    fn order(&mut self, order: Order) {
        let id = order.unit().unwrap();
        let power = self.state.unit(id).unwrap().power;
        self.orders.push((order, power));
    }

    fn order_as(&mut self, power: Power, order: Order) {
        self.orders.push((order, power));
    }

    fn resolve(self) -> (GameState, MovementReport) {
        resolve_movement(&self.graph, self.state, &self.orders).unwrap()
    }
}

fn loc(s: &str) -> Location {
    Location::parse(s).unwrap()
}

fn prov(s: &str) -> Province {
    Province::from_abbr(s).unwrap()
}

fn hold(unit: UnitId) -> Order {
    Order::Hold { unit }
}

fn mv(unit: UnitId, dest: &str) -> Order {
    Order::Move { unit, dest: loc(dest), via_transport: false }
}

fn via(unit: UnitId, dest: &str) -> Order {
    Order::Move { unit, dest: loc(dest), via_transport: true }
}

fn sup(unit: UnitId, supported: UnitId) -> Order {
    Order::SupportHold { unit, supported }
}

fn sup_mv(unit: UnitId, supported: UnitId, dest: &str) -> Order {
    Order::SupportMove { unit, supported, dest: prov(dest) }
}

fn carry(unit: UnitId, carried: UnitId, dest: &str) -> Order {
    Order::Transport { unit, carried, dest: prov(dest) }
}

fn result(report: &MovementReport, unit: UnitId) -> OrderResult {
    report
        .results
        .iter()
        .find(|r| r.order.unit() == Some(unit))
        .map(|r| r.result)
        .unwrap_or_else(|| panic!("no result for {unit}"))
}

fn issue(report: &MovementReport, unit: UnitId) -> Option<OrderIssue> {
    report.results.iter().find(|r| r.order.unit() == Some(unit)).and_then(|r| r.issue)
}

fn at(state: &GameState, unit: UnitId) -> Option<Location> {
    state.unit(unit).map(|u| u.location)
}

fn was_dislodged(report: &MovementReport, unit: UnitId) -> bool {
    report.dislodged.iter().any(|d| d.unit.id == unit)
}

// ---------------------------------------------------------------------------
// 6.A Basic checks
// ---------------------------------------------------------------------------

#[test]
fn datc_6a1_move_to_non_neighbour_fails() {
    let mut b = Board::new();
    let f = b.unit(Power::England, "F nth");
    b.order(mv(f, "pic"));
    let (state, report) = b.resolve();
    assert_eq!(issue(&report, f), Some(OrderIssue::InvalidOrder(Violation::Unreachable)));
    assert_eq!(at(&state, f), Some(loc("nth")));
}

#[test]
fn datc_6a2_army_cannot_move_to_sea() {
    let mut b = Board::new();
    let a = b.unit(Power::England, "A lvp");
    b.order(mv(a, "iri"));
    let (_, report) = b.resolve();
    assert_eq!(result(&report, a), OrderResult::Invalid);
}

#[test]
fn datc_6a3_fleet_cannot_move_inland() {
    let mut b = Board::new();
    let f = b.unit(Power::Germany, "F kie");
    b.order(mv(f, "mun"));
    let (_, report) = b.resolve();
    assert_eq!(issue(&report, f), Some(OrderIssue::InvalidOrder(Violation::Unreachable)));
}

#[test]
fn datc_6a4_move_to_own_province_is_illegal() {
    let mut b = Board::new();
    let f = b.unit(Power::Germany, "F kie");
    b.order(mv(f, "kie"));
    let (_, report) = b.resolve();
    assert_eq!(issue(&report, f), Some(OrderIssue::InvalidOrder(Violation::SelfTarget)));
}

#[test]
fn datc_6a6_ordering_a_foreign_unit() {
    let mut b = Board::new();
    let f = b.unit(Power::England, "F lon");
    b.order_as(Power::Germany, mv(f, "nth"));
    let (state, report) = b.resolve();
    assert_eq!(
        issue(&report, f),
        Some(OrderIssue::AmbiguousUnitReference { unit: f, power: Power::Germany })
    );
    assert_eq!(at(&state, f), Some(loc("lon")));
}

#[test]
fn datc_6a7_only_armies_can_be_transported() {
    let mut b = Board::new();
    let f = b.unit(Power::England, "F lon");
    let n = b.unit(Power::England, "F nth");
    b.order(via(f, "bel"));
    b.order(carry(n, f, "bel"));
    let (state, report) = b.resolve();
    assert_eq!(issue(&report, f), Some(OrderIssue::InvalidOrder(Violation::NotTransportable)));
    assert_eq!(result(&report, n), OrderResult::Invalid);
    assert_eq!(at(&state, f), Some(loc("lon")));
}

#[test]
fn datc_6a8_support_to_hold_yourself_is_not_possible() {
    let mut b = Board::new();
    let ven = b.unit(Power::Italy, "A ven");
    let tyr = b.unit(Power::Italy, "A tyr");
    let tri = b.unit(Power::Austria, "F tri");
    b.order(mv(ven, "tri"));
    b.order(sup_mv(tyr, ven, "tri"));
    b.order(sup(tri, tri));
    let (state, report) = b.resolve();
    assert_eq!(issue(&report, tri), Some(OrderIssue::InvalidOrder(Violation::SelfTarget)));
    assert!(was_dislodged(&report, tri));
    assert_eq!(at(&state, ven), Some(loc("tri")));
}

#[test]
fn datc_6a9_fleets_must_follow_coast() {
    let mut b = Board::new();
    let f = b.unit(Power::Italy, "F rom");
    b.order(mv(f, "ven"));
    let (_, report) = b.resolve();
    assert_eq!(result(&report, f), OrderResult::Invalid);
}

#[test]
fn datc_6a10_support_on_unreachable_destination_is_invalid() {
    let mut b = Board::new();
    let ven = b.unit(Power::Austria, "A ven");
    let rom = b.unit(Power::Italy, "F rom");
    let apu = b.unit(Power::Italy, "A apu");
    b.order(hold(ven));
    b.order(sup_mv(rom, apu, "ven"));
    b.order(mv(apu, "ven"));
    let (state, report) = b.resolve();
    assert_eq!(issue(&report, rom), Some(OrderIssue::InvalidOrder(Violation::Unreachable)));
    assert_eq!(result(&report, apu), OrderResult::Bounced);
    assert_eq!(at(&state, ven), Some(loc("ven")));
}

#[test]
fn datc_6a11_simple_bounce() {
    let mut b = Board::new();
    let vie = b.unit(Power::Austria, "A vie");
    let ven = b.unit(Power::Italy, "A ven");
    b.order(mv(vie, "tyr"));
    b.order(mv(ven, "tyr"));
    let (_, report) = b.resolve();
    assert_eq!(result(&report, vie), OrderResult::Bounced);
    assert_eq!(result(&report, ven), OrderResult::Bounced);
    assert!(report.standoffs.contains(&Province::Tyr));
}

#[test]
fn datc_6a12_bounce_of_three_units() {
    let mut b = Board::new();
    let vie = b.unit(Power::Austria, "A vie");
    let mun = b.unit(Power::Germany, "A mun");
    let ven = b.unit(Power::Italy, "A ven");
    b.order(mv(vie, "tyr"));
    b.order(mv(mun, "tyr"));
    b.order(mv(ven, "tyr"));
    let (_, report) = b.resolve();
    for u in [vie, mun, ven] {
        assert_eq!(result(&report, u), OrderResult::Bounced);
    }
}

// ---------------------------------------------------------------------------
// 6.B Coastal issues
// ---------------------------------------------------------------------------

#[test]
fn datc_6b1_coast_required_when_ambiguous() {
    let mut b = Board::new();
    let f = b.unit(Power::France, "F por");
    b.order(mv(f, "spa"));
    let (state, report) = b.resolve();
    assert_eq!(issue(&report, f), Some(OrderIssue::InvalidOrder(Violation::CoastRequired)));
    assert_eq!(at(&state, f), Some(loc("por")));
}

#[test]
fn datc_6b2_coast_inferred_when_unique() {
    let mut b = Board::new();
    let f = b.unit(Power::France, "F gas");
    b.order(mv(f, "spa"));
    let (state, report) = b.resolve();
    assert_eq!(result(&report, f), OrderResult::Succeeded);
    assert_eq!(at(&state, f), Some(Location::with_coast(Province::Spa, Coast::North)));
}

#[test]
fn datc_6b3_unreachable_coast_fails() {
    let mut b = Board::new();
    let f = b.unit(Power::France, "F gas");
    b.order(mv(f, "spa/sc"));
    let (state, report) = b.resolve();
    assert_eq!(result(&report, f), OrderResult::Invalid);
    assert_eq!(at(&state, f), Some(loc("gas")));
}

#[test]
fn datc_6b4_support_to_unreachable_coast_allowed() {
    let mut b = Board::new();
    let gas = b.unit(Power::France, "F gas");
    let mar = b.unit(Power::France, "F mar");
    let wes = b.unit(Power::Italy, "F wes");
    b.order(mv(gas, "spa/nc"));
    b.order(sup_mv(mar, gas, "spa"));
    b.order(mv(wes, "spa/sc"));
    let (state, report) = b.resolve();
    assert_eq!(result(&report, mar), OrderResult::Succeeded);
    assert_eq!(result(&report, gas), OrderResult::Succeeded);
    assert_eq!(result(&report, wes), OrderResult::Bounced);
    assert_eq!(at(&state, gas), Some(loc("spa/nc")));
}

#[test]
fn datc_6b5_support_from_unreachable_coast_not_allowed() {
    let mut b = Board::new();
    let mar = b.unit(Power::France, "F mar");
    let spa = b.unit(Power::France, "F spa/nc");
    let gol = b.unit(Power::Italy, "F gol");
    b.order(mv(mar, "gol"));
    b.order(sup_mv(spa, mar, "gol"));
    b.order(hold(gol));
    let (state, report) = b.resolve();
    assert_eq!(result(&report, spa), OrderResult::Invalid);
    assert_eq!(result(&report, mar), OrderResult::Bounced);
    assert_eq!(at(&state, gol), Some(loc("gol")));
}

#[test]
fn datc_6b6_support_can_be_cut_from_the_other_coast() {
    let mut b = Board::new();
    let iri = b.unit(Power::England, "F iri");
    let nao = b.unit(Power::England, "F nao");
    let spa = b.unit(Power::France, "F spa/nc");
    let mao = b.unit(Power::France, "F mao");
    let gol = b.unit(Power::Italy, "F gol");
    b.order(sup_mv(iri, nao, "mao"));
    b.order(mv(nao, "mao"));
    b.order(sup(spa, mao));
    b.order(hold(mao));
    b.order(mv(gol, "spa/sc"));
    let (state, report) = b.resolve();
    assert_eq!(result(&report, spa), OrderResult::Cut);
    assert_eq!(result(&report, gol), OrderResult::Bounced);
    assert!(was_dislodged(&report, mao));
    assert_eq!(at(&state, nao), Some(loc("mao")));
}

// ---------------------------------------------------------------------------
// 6.C Circular movement
// ---------------------------------------------------------------------------

#[test]
fn datc_6c1_three_army_circular_movement() {
    let mut b = Board::new();
    let ank = b.unit(Power::Turkey, "F ank");
    let con = b.unit(Power::Turkey, "A con");
    let smy = b.unit(Power::Turkey, "A smy");
    b.order(mv(ank, "con"));
    b.order(mv(con, "smy"));
    b.order(mv(smy, "ank"));
    let (state, report) = b.resolve();
    for u in [ank, con, smy] {
        assert_eq!(result(&report, u), OrderResult::Succeeded);
    }
    assert_eq!(at(&state, ank), Some(loc("con")));
    assert_eq!(at(&state, con), Some(loc("smy")));
    assert_eq!(at(&state, smy), Some(loc("ank")));
    assert!(state.check_invariants().is_ok());
}

#[test]
fn datc_6c2_three_army_circular_movement_with_support() {
    let mut b = Board::new();
    let ank = b.unit(Power::Turkey, "F ank");
    let con = b.unit(Power::Turkey, "A con");
    let smy = b.unit(Power::Turkey, "A smy");
    let bul = b.unit(Power::Turkey, "A bul");
    b.order(mv(ank, "con"));
    b.order(mv(con, "smy"));
    b.order(mv(smy, "ank"));
    b.order(sup_mv(bul, ank, "con"));
    let (_, report) = b.resolve();
    for u in [ank, con, smy, bul] {
        assert_eq!(result(&report, u), OrderResult::Succeeded);
    }
}

#[test]
fn datc_6c3_disrupted_three_army_circular_movement() {
    let mut b = Board::new();
    let ank = b.unit(Power::Turkey, "F ank");
    let con = b.unit(Power::Turkey, "A con");
    let smy = b.unit(Power::Turkey, "A smy");
    let bul = b.unit(Power::Turkey, "A bul");
    b.order(mv(ank, "con"));
    b.order(mv(con, "smy"));
    b.order(mv(smy, "ank"));
    b.order(mv(bul, "con"));
    let (state, report) = b.resolve();
    for u in [ank, con, smy, bul] {
        assert_eq!(result(&report, u), OrderResult::Bounced);
    }
    assert_eq!(at(&state, con), Some(loc("con")));
}

#[test]
fn datc_6c6_two_armies_with_two_transports_swap() {
    let mut b = Board::new();
    let nth = b.unit(Power::England, "F nth");
    let lon = b.unit(Power::England, "A lon");
    let eng = b.unit(Power::France, "F eng");
    let bel = b.unit(Power::France, "A bel");
    b.order(carry(nth, lon, "bel"));
    b.order(via(lon, "bel"));
    b.order(carry(eng, bel, "lon"));
    b.order(via(bel, "lon"));
    let (state, report) = b.resolve();
    assert_eq!(result(&report, lon), OrderResult::Succeeded);
    assert_eq!(result(&report, bel), OrderResult::Succeeded);
    assert_eq!(at(&state, lon), Some(loc("bel")));
    assert_eq!(at(&state, bel), Some(loc("lon")));
}

#[test]
fn datc_6c7_disrupted_unit_swap() {
    let mut b = Board::new();
    let nth = b.unit(Power::England, "F nth");
    let lon = b.unit(Power::England, "A lon");
    let eng = b.unit(Power::France, "F eng");
    let bel = b.unit(Power::France, "A bel");
    let bur = b.unit(Power::France, "A bur");
    b.order(carry(nth, lon, "bel"));
    b.order(via(lon, "bel"));
    b.order(carry(eng, bel, "lon"));
    b.order(via(bel, "lon"));
    b.order(mv(bur, "bel"));
    let (state, report) = b.resolve();
    for u in [lon, bel, bur] {
        assert_eq!(result(&report, u), OrderResult::Bounced);
    }
    assert_eq!(at(&state, lon), Some(loc("lon")));
}

// ---------------------------------------------------------------------------
// 6.D Supports and dislodges
// ---------------------------------------------------------------------------

#[test]
fn datc_6d1_supported_hold_prevents_dislodgement() {
    let mut b = Board::new();
    let adr = b.unit(Power::Austria, "F adr");
    let tri = b.unit(Power::Austria, "A tri");
    let ven = b.unit(Power::Italy, "A ven");
    let tyr = b.unit(Power::Italy, "A tyr");
    b.order(sup_mv(adr, tri, "ven"));
    b.order(mv(tri, "ven"));
    b.order(hold(ven));
    b.order(sup(tyr, ven));
    let (_, report) = b.resolve();
    assert_eq!(result(&report, tri), OrderResult::Bounced);
    assert!(report.dislodged.is_empty());
}

#[test]
fn datc_6d2_move_cuts_support_on_hold() {
    let mut b = Board::new();
    let adr = b.unit(Power::Austria, "F adr");
    let tri = b.unit(Power::Austria, "A tri");
    let vie = b.unit(Power::Austria, "A vie");
    let ven = b.unit(Power::Italy, "A ven");
    let tyr = b.unit(Power::Italy, "A tyr");
    b.order(sup_mv(adr, tri, "ven"));
    b.order(mv(tri, "ven"));
    b.order(mv(vie, "tyr"));
    b.order(hold(ven));
    b.order(sup(tyr, ven));
    let (_, report) = b.resolve();
    assert_eq!(result(&report, tyr), OrderResult::Cut);
    assert_eq!(result(&report, tri), OrderResult::Succeeded);
    assert!(was_dislodged(&report, ven));
    assert_eq!(report.dislodged[0].attacker_from, Province::Tri);
}

#[test]
fn datc_6d3_move_cuts_support_on_move() {
    let mut b = Board::new();
    let adr = b.unit(Power::Austria, "F adr");
    let tri = b.unit(Power::Austria, "A tri");
    let ven = b.unit(Power::Italy, "A ven");
    let ion = b.unit(Power::Italy, "F ion");
    b.order(sup_mv(adr, tri, "ven"));
    b.order(mv(tri, "ven"));
    b.order(hold(ven));
    b.order(mv(ion, "adr"));
    let (_, report) = b.resolve();
    assert_eq!(result(&report, adr), OrderResult::Cut);
    assert_eq!(result(&report, tri), OrderResult::Bounced);
    assert!(report.dislodged.is_empty());
}

#[test]
fn datc_6d9_support_to_move_on_holding_unit_not_allowed() {
    let mut b = Board::new();
    let ven = b.unit(Power::Italy, "A ven");
    let tyr = b.unit(Power::Italy, "A tyr");
    let alb = b.unit(Power::Austria, "A alb");
    let tri = b.unit(Power::Austria, "A tri");
    b.order(mv(ven, "tri"));
    b.order(sup_mv(tyr, ven, "tri"));
    b.order(sup_mv(alb, tri, "ser"));
    b.order(hold(tri));
    let (_, report) = b.resolve();
    assert_eq!(issue(&report, alb), Some(OrderIssue::InvalidOrder(Violation::SupportMismatch)));
    assert!(was_dislodged(&report, tri));
}

#[test]
fn datc_6d10_self_dislodgement_prohibited() {
    let mut b = Board::new();
    let ber = b.unit(Power::Germany, "A ber");
    let kie = b.unit(Power::Germany, "F kie");
    let mun = b.unit(Power::Germany, "A mun");
    b.order(hold(ber));
    b.order(mv(kie, "ber"));
    b.order(sup_mv(mun, kie, "ber"));
    let (state, report) = b.resolve();
    assert_eq!(result(&report, kie), OrderResult::Bounced);
    assert!(report.dislodged.is_empty());
    assert_eq!(at(&state, ber), Some(loc("ber")));
}

#[test]
fn datc_6d11_no_self_dislodgement_of_returning_unit() {
    let mut b = Board::new();
    let ber = b.unit(Power::Germany, "A ber");
    let kie = b.unit(Power::Germany, "F kie");
    let mun = b.unit(Power::Germany, "A mun");
    let war = b.unit(Power::Russia, "A war");
    b.order(mv(ber, "pru"));
    b.order(mv(kie, "ber"));
    b.order(sup_mv(mun, kie, "ber"));
    b.order(hold(war));
    let pru = b.unit(Power::Russia, "A pru");
    b.order(hold(pru));
    let (_, report) = b.resolve();
    assert_eq!(result(&report, ber), OrderResult::Bounced);
    assert_eq!(result(&report, kie), OrderResult::Bounced);
    assert!(report.dislodged.is_empty());
}

#[test]
fn datc_6d15_defender_cannot_cut_support_for_attack_on_itself() {
    let mut b = Board::new();
    let con = b.unit(Power::Russia, "F con");
    let bla = b.unit(Power::Russia, "F bla");
    let ank = b.unit(Power::Turkey, "F ank");
    b.order(sup_mv(con, bla, "ank"));
    b.order(mv(bla, "ank"));
    b.order(mv(ank, "con"));
    let (_, report) = b.resolve();
    assert_eq!(result(&report, con), OrderResult::Succeeded);
    assert_eq!(result(&report, bla), OrderResult::Succeeded);
    assert!(was_dislodged(&report, ank));
}

#[test]
fn support_cut_by_own_power_is_not_cut() {
    let mut b = Board::new();
    let tyr = b.unit(Power::Italy, "A tyr");
    let ven = b.unit(Power::Italy, "A ven");
    let pie = b.unit(Power::Italy, "A pie");
    let tri = b.unit(Power::Austria, "A tri");
    b.order(sup_mv(tyr, ven, "tri"));
    b.order(mv(ven, "tri"));
    b.order(mv(pie, "tyr"));
    b.order(hold(tri));
    let (_, report) = b.resolve();
    assert_eq!(result(&report, tyr), OrderResult::Succeeded);
    assert!(was_dislodged(&report, tri));
}

// ---------------------------------------------------------------------------
// 6.E Head-to-head battles
// ---------------------------------------------------------------------------

#[test]
fn datc_6e1_dislodged_unit_has_no_effect_on_attackers_area() {
    let mut b = Board::new();
    let ber = b.unit(Power::Germany, "A ber");
    let kie = b.unit(Power::Germany, "F kie");
    let sil = b.unit(Power::Germany, "A sil");
    let pru = b.unit(Power::Russia, "A pru");
    b.order(mv(ber, "pru"));
    b.order(mv(kie, "ber"));
    b.order(sup_mv(sil, ber, "pru"));
    b.order(mv(pru, "ber"));
    let (state, report) = b.resolve();
    assert_eq!(result(&report, ber), OrderResult::Succeeded);
    assert_eq!(result(&report, kie), OrderResult::Succeeded);
    assert_eq!(result(&report, pru), OrderResult::Dislodged);
    assert_eq!(at(&state, kie), Some(loc("ber")));
}

#[test]
fn datc_6e2_no_self_dislodgement_in_head_to_head() {
    let mut b = Board::new();
    let ber = b.unit(Power::Germany, "A ber");
    let kie = b.unit(Power::Germany, "F kie");
    let mun = b.unit(Power::Germany, "A mun");
    b.order(mv(ber, "kie"));
    b.order(mv(kie, "ber"));
    b.order(sup_mv(mun, ber, "kie"));
    let (state, report) = b.resolve();
    assert_eq!(result(&report, ber), OrderResult::Bounced);
    assert_eq!(result(&report, kie), OrderResult::Bounced);
    assert_eq!(at(&state, ber), Some(loc("ber")));
}

#[test]
fn head_to_head_equal_strength_bounces() {
    let mut b = Board::new();
    let vie = b.unit(Power::Austria, "A vie");
    let boh = b.unit(Power::Germany, "A boh");
    b.order(mv(vie, "boh"));
    b.order(mv(boh, "vie"));
    let (state, report) = b.resolve();
    assert_eq!(result(&report, vie), OrderResult::Bounced);
    assert_eq!(result(&report, boh), OrderResult::Bounced);
    assert_eq!(at(&state, vie), Some(loc("vie")));
    assert!(report.standoffs.is_empty());
}

#[test]
fn beleaguered_garrison_survives_equal_attacks() {
    let mut b = Board::new();
    let mun = b.unit(Power::Germany, "A mun");
    let bur = b.unit(Power::France, "A bur");
    let ruh = b.unit(Power::France, "A ruh");
    let tyr = b.unit(Power::Italy, "A tyr");
    let boh = b.unit(Power::Italy, "A boh");
    b.order(hold(mun));
    b.order(mv(bur, "mun"));
    b.order(sup_mv(ruh, bur, "mun"));
    b.order(mv(tyr, "mun"));
    b.order(sup_mv(boh, tyr, "mun"));
    let (state, report) = b.resolve();
    assert_eq!(result(&report, bur), OrderResult::Bounced);
    assert_eq!(result(&report, tyr), OrderResult::Bounced);
    assert!(report.dislodged.is_empty());
    assert!(report.standoffs.is_empty());
    assert_eq!(at(&state, mun), Some(loc("mun")));
}

// ---------------------------------------------------------------------------
// 6.F Transports
// ---------------------------------------------------------------------------

#[test]
fn datc_6f1_no_transport_from_coastal_province() {
    let mut b = Board::new();
    let gre = b.unit(Power::Turkey, "A gre");
    let aeg = b.unit(Power::Turkey, "F aeg");
    let con = b.unit(Power::Turkey, "F con");
    let bla = b.unit(Power::Turkey, "F bla");
    b.order(via(gre, "sev"));
    b.order(carry(aeg, gre, "sev"));
    b.order(carry(con, gre, "sev"));
    b.order(carry(bla, gre, "sev"));
    let (state, report) = b.resolve();
    assert_eq!(issue(&report, con), Some(OrderIssue::InvalidOrder(Violation::NotAtSea)));
    assert_eq!(result(&report, gre), OrderResult::Failed);
    assert_eq!(issue(&report, gre), Some(OrderIssue::TransportChainFailure));
    assert_eq!(at(&state, gre), Some(loc("gre")));
}

#[test]
fn datc_6f2_transported_army_can_bounce() {
    let mut b = Board::new();
    let eng = b.unit(Power::England, "F eng");
    let lon = b.unit(Power::England, "A lon");
    let par = b.unit(Power::France, "A par");
    b.order(carry(eng, lon, "bre"));
    b.order(via(lon, "bre"));
    b.order(mv(par, "bre"));
    let (_, report) = b.resolve();
    assert_eq!(result(&report, lon), OrderResult::Bounced);
    assert_eq!(result(&report, par), OrderResult::Bounced);
    assert_eq!(result(&report, eng), OrderResult::Succeeded);
}

#[test]
fn datc_6f3_transported_army_can_receive_support() {
    let mut b = Board::new();
    let eng = b.unit(Power::England, "F eng");
    let lon = b.unit(Power::England, "A lon");
    let mao = b.unit(Power::England, "F mao");
    let par = b.unit(Power::France, "A par");
    b.order(carry(eng, lon, "bre"));
    b.order(via(lon, "bre"));
    b.order(sup_mv(mao, lon, "bre"));
    b.order(mv(par, "bre"));
    let (state, report) = b.resolve();
    assert_eq!(result(&report, lon), OrderResult::Succeeded);
    assert_eq!(result(&report, par), OrderResult::Bounced);
    assert_eq!(at(&state, lon), Some(loc("bre")));
}

#[test]
fn datc_6f6_dislodged_fleet_breaks_transport() {
    let mut b = Board::new();
    let nth = b.unit(Power::England, "F nth");
    let lon = b.unit(Power::England, "A lon");
    let ska = b.unit(Power::Germany, "F ska");
    let hel = b.unit(Power::Germany, "F hel");
    b.order(carry(nth, lon, "hol"));
    b.order(via(lon, "hol"));
    b.order(sup_mv(ska, hel, "nth"));
    b.order(mv(hel, "nth"));
    let (state, report) = b.resolve();
    assert_eq!(result(&report, nth), OrderResult::Dislodged);
    assert_eq!(result(&report, lon), OrderResult::Failed);
    assert_eq!(issue(&report, lon), Some(OrderIssue::TransportChainFailure));
    assert_eq!(at(&state, lon), Some(loc("lon")));
}

#[test]
fn multi_fleet_chain_carries_army() {
    let mut b = Board::new();
    let lon = b.unit(Power::England, "A lon");
    let eng = b.unit(Power::England, "F eng");
    let mao = b.unit(Power::England, "F mao");
    let wes = b.unit(Power::England, "F wes");
    b.order(via(lon, "tun"));
    b.order(carry(eng, lon, "tun"));
    b.order(carry(mao, lon, "tun"));
    b.order(carry(wes, lon, "tun"));
    let (state, report) = b.resolve();
    assert_eq!(result(&report, lon), OrderResult::Succeeded);
    assert_eq!(at(&state, lon), Some(loc("tun")));
}

#[test]
fn gap_in_chain_fails_transport() {
    let mut b = Board::new();
    let lon = b.unit(Power::England, "A lon");
    let eng = b.unit(Power::England, "F eng");
    let wes = b.unit(Power::England, "F wes");
    b.order(via(lon, "tun"));
    b.order(carry(eng, lon, "tun"));
    b.order(carry(wes, lon, "tun"));
    let (_, report) = b.resolve();
    assert_eq!(issue(&report, lon), Some(OrderIssue::TransportChainFailure));
}

#[test]
fn transport_for_a_different_destination_is_a_mismatch() {
    let mut b = Board::new();
    let lon = b.unit(Power::England, "A lon");
    let nth = b.unit(Power::England, "F nth");
    b.order(via(lon, "bel"));
    b.order(carry(nth, lon, "hol"));
    let (_, report) = b.resolve();
    assert_eq!(issue(&report, nth), Some(OrderIssue::InvalidOrder(Violation::TransportMismatch)));
    assert_eq!(issue(&report, lon), Some(OrderIssue::TransportChainFailure));
}

#[test]
fn datc_6f14_simple_transport_paradox_fails_every_decision() {
    let mut b = Board::new();
    let lon = b.unit(Power::England, "F lon");
    let wal = b.unit(Power::England, "F wal");
    let bre = b.unit(Power::France, "A bre");
    let eng = b.unit(Power::France, "F eng");
    b.order(sup_mv(lon, wal, "eng"));
    b.order(mv(wal, "eng"));
    b.order(via(bre, "lon"));
    b.order(carry(eng, bre, "lon"));
    let (state, report) = b.resolve();
    for u in [lon, wal, bre, eng] {
        assert_eq!(result(&report, u), OrderResult::Failed);
        assert_eq!(issue(&report, u), Some(OrderIssue::ResolutionCycle));
    }
    assert!(report.dislodged.is_empty());
    assert_eq!(at(&state, eng), Some(loc("eng")));
    assert_eq!(at(&state, bre), Some(loc("bre")));
}

#[test]
fn transported_attack_cuts_support() {
    let mut b = Board::new();
    let lon = b.unit(Power::England, "A lon");
    let nth = b.unit(Power::England, "F nth");
    let bel = b.unit(Power::France, "A bel");
    let pic = b.unit(Power::France, "A pic");
    let bur = b.unit(Power::Germany, "A bur");
    b.order(via(lon, "bel"));
    b.order(carry(nth, lon, "bel"));
    b.order(sup_mv(bel, pic, "bur"));
    b.order(mv(pic, "bur"));
    b.order(hold(bur));
    let (_, report) = b.resolve();
    assert_eq!(result(&report, bel), OrderResult::Cut);
    assert_eq!(result(&report, pic), OrderResult::Bounced);
}

// ---------------------------------------------------------------------------
// 6.H Retreats
// ---------------------------------------------------------------------------

/// Resolves a movement phase that dislodges `A ser`, then the retreat phase.
fn dislodge_serbia(retreat: impl FnOnce(UnitId) -> Order) -> (GameState, PhaseReport, UnitId) {
    let mut b = Board::new();
    let ser = b.unit(Power::Austria, "A ser");
    let bul = b.unit(Power::Turkey, "A bul");
    let rum = b.unit(Power::Turkey, "A rum");
    let alb = b.unit(Power::Italy, "A alb");
    let gre = b.unit(Power::Italy, "A gre");
    b.order(hold(ser));
    b.order(mv(bul, "ser"));
    b.order(sup_mv(rum, bul, "ser"));
    b.order(mv(alb, "tri"));
    b.order(mv(gre, "alb"));
    let graph = b.graph;
    let (state, _) = resolve_phase(&graph, b.state, &b.orders).unwrap();
    assert_eq!(state.phase, Phase::SpringRetreat);
    let orders = [(retreat(ser), Power::Austria)];
    let (state, report) = resolve_phase(&graph, state, &orders).unwrap();
    (state, report, ser)
}

#[test]
fn datc_6h_retreat_to_attacker_origin_disbands() {
    let (state, report, ser) = dislodge_serbia(|u| Order::Retreat { unit: u, dest: loc("bul") });
    assert_eq!(report.results()[0].issue, Some(OrderIssue::InvalidOrder(Violation::AttackerOrigin)));
    assert!(state.unit(ser).is_none());
    assert_eq!(state.phase, Phase::FallMovement);
}

#[test]
fn datc_6h_retreat_into_vacated_province_succeeds() {
    let (state, report, ser) = dislodge_serbia(|u| Order::Retreat { unit: u, dest: loc("gre") });
    assert_eq!(report.results()[0].result, OrderResult::Succeeded);
    assert_eq!(at(&state, ser), Some(loc("gre")));
    assert!(state.dislodged.is_empty());
}

#[test]
fn datc_6h_retreat_into_occupied_province_fails() {
    let (state, report, _) = dislodge_serbia(|u| Order::Retreat { unit: u, dest: loc("alb") });
    assert_eq!(report.results()[0].issue, Some(OrderIssue::InvalidOrder(Violation::Occupied)));
    assert_eq!(state.units.iter().filter(|u| u.power == Power::Austria).count(), 0);
}

#[test]
fn datc_6h_retreat_into_standoff_province_fails() {
    let mut b = Board::new();
    let ser = b.unit(Power::Austria, "A ser");
    let bul = b.unit(Power::Turkey, "A bul");
    let rum = b.unit(Power::Turkey, "A rum");
    let tri = b.unit(Power::Italy, "A tri");
    let bud = b.unit(Power::Russia, "A bud");
    b.order(hold(ser));
    b.order(mv(bul, "ser"));
    b.order(sup_mv(rum, bul, "ser"));
    b.order(mv(tri, "alb"));
    b.order(mv(bud, "tri"));
    let gre = b.unit(Power::Italy, "A gre");
    b.order(mv(gre, "alb"));
    let graph = b.graph;
    let (state, report) = resolve_phase(&graph, b.state, &b.orders).unwrap();
    let PhaseReport::Movement(movement) = report else { panic!("expected a movement report") };
    assert!(movement.standoffs.contains(&Province::Alb));
    let orders = [(Order::Retreat { unit: ser, dest: loc("alb") }, Power::Austria)];
    let (_, report) = resolve_phase(&graph, state, &orders).unwrap();
    assert_eq!(report.results()[0].issue, Some(OrderIssue::InvalidOrder(Violation::Standoff)));
}

#[test]
fn datc_6h_unordered_dislodged_unit_is_disbanded() {
    let (state, report, ser) = dislodge_serbia(|u| Order::Disband { unit: u });
    let PhaseReport::Retreat(retreat) = report else { panic!("expected a retreat report") };
    assert_eq!(retreat.disbanded, vec![ser]);
    assert!(state.unit(ser).is_none());
}

// ---------------------------------------------------------------------------
// 6.I Builds
// ---------------------------------------------------------------------------

fn reconcile(state: GameState, orders: &[(Order, Power)]) -> (GameState, BuildReport) {
    resolve_builds(&BoardGraph::standard().unwrap(), state, orders).unwrap()
}

fn build(unit_type: UnitType, at: &str) -> Order {
    Order::Build { unit_type, location: loc(at) }
}

/// Russia with four home centers owned plus Sweden, and one unit left.
fn russia_with_spare_centers() -> GameState {
    let mut state = GameState::empty(1901, Phase::Reconciliation);
    for p in [Province::Mos, Province::Stp, Province::War, Province::Sev, Province::Swe] {
        state.set_sc_owner(p, Some(Power::Russia));
    }
    state.place_unit(Power::Russia, UnitType::Army, loc("swe"));
    state
}

#[test]
fn datc_6i1_too_many_builds() {
    let mut state = GameState::empty(1901, Phase::Reconciliation);
    state.set_sc_owner(Province::Ber, Some(Power::Germany));
    let (state, report) = reconcile(
        state,
        &[
            (build(UnitType::Army, "ber"), Power::Germany),
            (build(UnitType::Army, "ber"), Power::Germany),
        ],
    );
    assert_eq!(report.built.len(), 1);
    assert_eq!(report.results[1].result, OrderResult::Invalid);
    assert_eq!(state.unit_count(Power::Germany), 1);
}

#[test]
fn datc_6i2_fleet_cannot_be_built_inland() {
    let mut state = GameState::empty(1901, Phase::Reconciliation);
    state.set_sc_owner(Province::Mos, Some(Power::Russia));
    let (_, report) = reconcile(state, &[(build(UnitType::Fleet, "mos"), Power::Russia)]);
    assert_eq!(report.results[0].issue, Some(OrderIssue::IllegalBuild(Violation::TerrainMismatch)));
}

#[test]
fn datc_6i3_build_in_foreign_home_center() {
    let mut state = russia_with_spare_centers();
    state.set_sc_owner(Province::Ber, Some(Power::Russia));
    let (_, report) = reconcile(state, &[(build(UnitType::Army, "ber"), Power::Russia)]);
    assert_eq!(report.results[0].issue, Some(OrderIssue::IllegalBuild(Violation::NotHomeCenter)));
}

#[test]
fn datc_6i4_build_in_unowned_home_center() {
    let mut state = russia_with_spare_centers();
    state.set_sc_owner(Province::War, Some(Power::Germany));
    let (_, report) = reconcile(state, &[(build(UnitType::Army, "war"), Power::Russia)]);
    assert_eq!(report.results[0].issue, Some(OrderIssue::IllegalBuild(Violation::CenterNotOwned)));
}

#[test]
fn datc_6i5_fleet_on_split_coast_needs_a_coast() {
    let state = russia_with_spare_centers();
    let (state, report) = reconcile(
        state,
        &[
            (build(UnitType::Fleet, "stp"), Power::Russia),
            (build(UnitType::Fleet, "stp/nc"), Power::Russia),
        ],
    );
    assert_eq!(report.results[0].issue, Some(OrderIssue::IllegalBuild(Violation::CoastRequired)));
    assert_eq!(report.results[1].result, OrderResult::Succeeded);
    assert_eq!(state.unit_at(Province::Stp).unwrap().location, loc("stp/nc"));
}

#[test]
fn waive_uses_up_a_build() {
    let mut state = GameState::empty(1901, Phase::Reconciliation);
    state.set_sc_owner(Province::Ber, Some(Power::Germany));
    let (state, report) = reconcile(
        state,
        &[(Order::Waive, Power::Germany), (build(UnitType::Army, "ber"), Power::Germany)],
    );
    assert_eq!(report.results[0].result, OrderResult::Succeeded);
    assert_eq!(report.results[1].result, OrderResult::Failed);
    assert_eq!(state.unit_count(Power::Germany), 0);
}

#[test]
fn civil_disorder_disbands_furthest_unit() {
    let mut state = GameState::empty(1901, Phase::Reconciliation);
    state.set_sc_owner(Province::Vie, Some(Power::Austria));
    let near = state.place_unit(Power::Austria, UnitType::Army, loc("boh")).unwrap();
    let far = state.place_unit(Power::Austria, UnitType::Army, loc("pic")).unwrap();
    let (state, report) = reconcile(state, &[]);
    assert_eq!(report.disbanded, vec![far]);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].order, Order::Disband { unit: far });
    assert!(state.unit(near).is_some());
}

#[test]
fn builds_keep_fresh_ids() {
    let state = russia_with_spare_centers();
    let next = state.next_unit_id;
    let (state, report) = reconcile(state, &[(build(UnitType::Army, "mos"), Power::Russia)]);
    assert_eq!(report.built[0].id, UnitId(next));
    assert_eq!(state.next_unit_id, next + 1);
    assert!(state.check_invariants().is_ok());
}
