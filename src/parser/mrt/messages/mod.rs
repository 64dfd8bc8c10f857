pub(crate) mod bgp4mp;
pub(crate) mod peer_index_table;
pub(crate) mod rib_afi_entries;
pub(crate) mod table_dump_message;

pub(crate) use bgp4mp::{parse_bgp4mp_entry, parse_bgp4mp_message, parse_bgp4mp_state_change};
pub(crate) use peer_index_table::parse_peer_index_table;
pub(crate) use rib_afi_entries::parse_rib_afi_entries;
pub(crate) use table_dump_message::parse_table_dump;
