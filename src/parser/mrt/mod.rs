/*!
MRT framing and per-record-type decoding.
*/
pub(crate) mod messages;
pub mod mrt_header;
pub mod mrt_record;

pub use mrt_header::parse_common_header;
pub use mrt_record::{MrtParser, MrtSinks};
