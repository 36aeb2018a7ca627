//! Domain layer: data types, invariants and pure computations. Nothing here
//! touches the DOM or the network.

pub mod chart;
pub mod defi;
pub mod errors;
pub mod funding;
pub mod logging;
pub mod market_data;
pub mod portfolio;
pub mod sentiment;
pub mod state;
