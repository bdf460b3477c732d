//! Request and penetration-check loading for the opening-hand engine.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
