pub mod bgp;
pub mod mrt;
pub mod nlri;
pub mod utils;

pub use mrt::{MrtParser, MrtSinks};
