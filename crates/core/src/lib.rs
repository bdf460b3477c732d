//! Opening-hand probability engine. Keep this crate free of IO and platform concerns.

pub mod assign;
pub mod binomial;
pub mod compile;
pub mod config;
pub mod deck;
pub mod engine;
pub mod evaluate;
pub mod exact;
pub mod flow;
pub mod pattern;
pub mod penetration;
pub mod rate;
pub mod request;
pub mod response;
pub mod rng;
pub mod simulate;
pub mod sub_pattern;
pub mod vs;

pub use assign::*;
pub use binomial::*;
pub use compile::*;
pub use config::*;
pub use deck::*;
pub use engine::*;
pub use evaluate::*;
pub use exact::*;
pub use flow::*;
pub use pattern::*;
pub use penetration::*;
pub use rate::*;
pub use request::*;
pub use response::*;
pub use rng::*;
pub use simulate::*;
pub use sub_pattern::*;
pub use vs::*;
