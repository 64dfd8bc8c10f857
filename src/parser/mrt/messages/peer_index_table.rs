use std::net::Ipv4Addr;

use crate::error::ParserError;
use crate::models::{Aid, AsnLength, PeerEntry, PeerTable, PeerType};
use crate::parser::utils::ByteCursor;

/// Parse a TABLE_DUMP_V2 PEER_INDEX_TABLE record.
///
/// <https://tools.ietf.org/html/rfc6396#section-4.3.1>
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      Collector BGP ID                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |       View Name Length        |     View Name (variable)      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          Peer Count           |    Peer Entries (variable)
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Each peer entry selects its address and AS number width through two
/// bits of the leading type octet. The view name is not expected to be
/// null-terminated; its bytes are kept as-is.
pub fn parse_peer_index_table(data: &[u8]) -> Result<PeerTable, ParserError> {
    let mut cursor = ByteCursor::new(data);

    let collector_bgp_id = Ipv4Addr::from(cursor.read_u32()?);

    let view_name_length = cursor.read_u16()? as usize;
    let view_name = cursor
        .read_exact(view_name_length)?
        .iter()
        .map(|&b| b as char)
        .collect::<String>();

    let peer_count = cursor.read_u16()?;
    let mut peers = Vec::with_capacity(peer_count as usize);
    for _ in 0..peer_count {
        let peer_type = PeerType::from_bits_retain(cursor.read_u8()?);
        let bgp_id = Ipv4Addr::from(cursor.read_u32()?);
        let aid = match peer_type.contains(PeerType::ADDRESS_FAMILY_IPV6) {
            true => Aid::Ipv6,
            false => Aid::Ipv4,
        };
        let addr = cursor.read_address(aid)?;
        let asn_len = match peer_type.contains(PeerType::AS_SIZE_32BIT) {
            true => AsnLength::Bits32,
            false => AsnLength::Bits16,
        };
        let asn = cursor.read_asn(asn_len)?;
        peers.push(PeerEntry { bgp_id, addr, asn });
    }

    Ok(PeerTable {
        collector_bgp_id,
        view_name,
        peers,
    })
}
