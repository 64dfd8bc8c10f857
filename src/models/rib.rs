//! Peer index tables and decoded RIB records.

use bitflags::bitflags;
use bytes::Bytes;
use std::net::Ipv4Addr;

use crate::models::{Addr, BgpIdentifier, Prefix};

bitflags! {
    /// Peer entry type octet from the PEER_INDEX_TABLE record.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PeerType: u8 {
        const ADDRESS_FAMILY_IPV6 = 0x1;
        const AS_SIZE_32BIT = 0x2;
    }
}

/// One peer from a PEER_INDEX_TABLE record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeerEntry {
    pub bgp_id: BgpIdentifier,
    pub addr: Addr,
    pub asn: u32,
}

impl PeerEntry {
    fn empty() -> Self {
        PeerEntry {
            bgp_id: Ipv4Addr::UNSPECIFIED,
            addr: Addr::Unspec,
            asn: 0,
        }
    }
}

/// Peer index table retained across records.
///
/// Built from a TABLE_DUMP_V2 PEER_INDEX_TABLE record; V2 RIB entries
/// reference its peers by index. Legacy formats that carry peer
/// information inline use a synthetic single-slot table instead, whose
/// slot is overwritten by every record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeerTable {
    pub collector_bgp_id: BgpIdentifier,
    pub view_name: String,
    pub peers: Vec<PeerEntry>,
}

impl PeerTable {
    /// The single-slot table backing TABLE_DUMP and BGP4MP_ENTRY
    /// records.
    pub fn synthetic() -> Self {
        PeerTable {
            collector_bgp_id: Ipv4Addr::UNSPECIFIED,
            view_name: String::new(),
            peers: vec![PeerEntry::empty()],
        }
    }

    pub fn get(&self, peer_index: u16) -> Option<&PeerEntry> {
        self.peers.get(peer_index as usize)
    }
}

/// Hard cap on unrecognized attributes kept per RIB entry.
pub const MAX_EXTRA_ATTRS: usize = 254;

/// Decoded path information for one peer.
///
/// `as_path` is always in the 4-byte-ASN encoding, inflated from the
/// 2-byte form where the surrounding record uses it. `extra_attrs`
/// preserves unrecognized attributes byte-for-byte, including the
/// flags/type/length header.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RibEntry {
    pub peer_index: u16,
    pub originated_time: u32,
    /// RFC 7911 path identifier; 0 when the record is not add-path.
    pub path_id: u32,
    pub origin: u8,
    pub as_path: Option<Bytes>,
    pub next_hop: Addr,
    pub med: Option<u32>,
    pub local_pref: Option<u32>,
    pub extra_attrs: Vec<Bytes>,
}

/// A decoded RIB record: one prefix with its per-peer entries.
///
/// Legacy TABLE_DUMP and BGP4MP_ENTRY records always produce exactly
/// one entry, with the sequence number zero-extended from 16 bits.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rib {
    pub sequence_number: u32,
    pub prefix: Prefix,
    pub add_path: bool,
    pub entries: Vec<RibEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_table() {
        let table = PeerTable::synthetic();
        assert_eq!(table.peers.len(), 1);
        assert_eq!(table.view_name, "");
        assert!(table.get(0).unwrap().addr.is_unspec());
        assert!(table.get(1).is_none());
    }

    #[test]
    fn test_peer_type_bits() {
        let peer_type = PeerType::from_bits_retain(0x3);
        assert!(peer_type.contains(PeerType::ADDRESS_FAMILY_IPV6));
        assert!(peer_type.contains(PeerType::AS_SIZE_32BIT));

        let peer_type = PeerType::from_bits_retain(0x2);
        assert!(!peer_type.contains(PeerType::ADDRESS_FAMILY_IPV6));
        assert!(peer_type.contains(PeerType::AS_SIZE_32BIT));
    }

    #[test]
    fn test_rib_entry_default() {
        let entry = RibEntry::default();
        assert_eq!(entry.path_id, 0);
        assert_eq!(entry.as_path, None);
        assert!(entry.next_hop.is_unspec());
        assert_eq!(entry.med, None);
        assert_eq!(entry.local_pref, None);
        assert!(entry.extra_attrs.is_empty());
    }
}
