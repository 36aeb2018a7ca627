//! Chart aggregate: layout, hover interaction and the chart entity.

pub mod entities;
pub mod hover;
pub mod layout;
pub mod value_objects;

pub use entities::*;
pub use hover::*;
pub use layout::*;
pub use value_objects::*;
