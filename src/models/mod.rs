//! Decoded MRT record structs and supporting network types.

pub mod bgp;
pub mod mrt;
pub mod network;
pub mod rib;

pub use bgp::*;
pub use mrt::*;
pub use network::*;
pub use rib::*;
