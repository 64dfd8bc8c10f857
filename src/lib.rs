/*!
`mrtkit` decodes archived MRT routing data (RFC 6396 / RFC 8050): peer
index tables, RIB snapshots, BGP message traces, and FSM state
transitions. Records are read one at a time from any blocking
[Read](std::io::Read) source and delivered as fully owned values to
caller-supplied sinks.

# Example

Count the RIB entries in a TABLE_DUMP_V2 file:

```no_run
use mrtkit::{MrtParser, MrtSinks};
use std::fs::File;
use std::io::BufReader;

let file = BufReader::new(File::open("rib.20240101.0000").unwrap());
let mut count = 0u64;
let mut sinks = MrtSinks::new().on_dump(|rib, _peers| {
    count += rib.entries.len() as u64;
});
MrtParser::new(file).run(&mut sinks).unwrap();
drop(sinks);
println!("{} entries", count);
```

Records that fail a structural check are discarded individually; the
stream continues with the next record. With
[MrtParser::verbose](parser::MrtParser::verbose) enabled, each skipped
or discarded record is reported through the [log] facade.

The supported wire formats are MRT per RFC 6396 and RFC 8050, with BGP
path attributes per RFC 4271 and RFC 4760. Both the standard and the
widely deployed legacy MP_REACH_NLRI encodings are accepted.
*/
pub mod error;
pub mod models;
pub mod parser;

pub use crate::error::ParserError;
pub use crate::models::*;
pub use crate::parser::{MrtParser, MrtSinks};
