//! Market data aggregate: candles, ticker snapshots, movers and the tracked token set.

pub mod entities;
pub mod snapshot;
pub mod universe;
pub mod value_objects;

pub use entities::*;
pub use snapshot::*;
pub use universe::*;
pub use value_objects::*;
