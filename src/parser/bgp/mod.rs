pub mod attributes;

pub use attributes::{aspath_inflate, AttributeDecoder};
