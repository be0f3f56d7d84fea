//! Board representation and game-state types.
//!
//! Contains the map (provinces, borders and the validated board graph), units,
//! orders, and the overall game state.

pub mod graph;
mod map_data;
pub mod order;
pub mod province;
pub mod state;
pub mod unit;

pub use graph::{BoardGraph, Edge, GraphError};
pub use order::{Location, Order};
pub use province::{
    Coast, Power, Province, ProvinceInfo, ProvinceType, ALL_POWERS, ALL_PROVINCES, PROVINCE_COUNT,
    PROVINCE_INFO, SUPPLY_CENTER_COUNT,
};
pub use state::{DislodgedUnit, GameState, Phase, StateError};
pub use unit::{Unit, UnitId, UnitType};
