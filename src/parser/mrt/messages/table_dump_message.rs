use crate::error::ParserError;
use crate::models::{Aid, PeerTable, Prefix, Rib, RibEntry};
use crate::parser::bgp::AttributeDecoder;
use crate::parser::utils::ByteCursor;

/// Parse a legacy TABLE_DUMP record.
///
/// <https://www.rfc-editor.org/rfc/rfc6396#section-4.2>
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |         View Number           |       Sequence Number         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        Prefix (variable)                      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | Prefix Length |    Status     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Originated Time                       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                    Peer IP Address (variable)                 |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |           Peer AS             |       Attribute Length        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                   BGP Attribute... (variable)
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The prefix is a fixed-width address followed by a length byte, not
/// an NLRI encoding, and the peer AS is always 2 bytes. Peer address
/// and AS are written into the single slot of the caller's synthetic
/// [PeerTable]; the produced record always holds exactly one entry.
pub fn parse_table_dump(data: &[u8], aid: Aid, peers: &mut PeerTable) -> Result<Rib, ParserError> {
    let mut cursor = ByteCursor::new(data);

    cursor.skip(2)?; // view number
    let sequence_number = cursor.read_u16()? as u32;

    let addr = cursor.read_address(aid)?;
    let prefix_len = cursor.read_u8()?;
    if prefix_len > aid.max_prefix_len() {
        return Err(ParserError::BadPrefixLen {
            bits: prefix_len,
            aid,
        });
    }
    cursor.skip(1)?; // status

    let originated_time = cursor.read_u32()?;
    let peer_addr = cursor.read_address(aid)?;
    let peer_asn = cursor.read_u16()? as u32;

    let attr_len = cursor.read_u16()? as usize;
    let attr_data = cursor.read_exact(attr_len)?;
    let mut entry = RibEntry {
        originated_time,
        ..RibEntry::default()
    };
    AttributeDecoder::new(aid, false).parse_attributes(attr_data, &mut entry)?;

    let slot = &mut peers.peers[0];
    slot.addr = peer_addr;
    slot.asn = peer_asn;

    Ok(Rib {
        sequence_number,
        prefix: Prefix { addr, prefix_len },
        add_path: false,
        entries: vec![entry],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Addr;
    use std::net::Ipv4Addr;

    #[test]
    fn test_ipv4_table_dump() {
        let data = [
            0x00, 0x00, // view
            0x00, 0x2A, // sequence
            0x0A, 0x00, 0x00, 0x00, // prefix 10.0.0.0
            0x18, // prefix length
            0x01, // status
            0x5F, 0x00, 0x00, 0x00, // originated
            0xC0, 0x00, 0x02, 0x01, // peer ip
            0x17, 0x2A, // peer as 5930
            0x00, 0x0D, // attribute length
            // ORIGIN + AS_PATH AS5930 (2-byte encoding)
            0x40, 0x01, 0x01, 0x00, //
            0x40, 0x02, 0x06, 0x02, 0x02, 0x17, 0x2A, 0x00, 0x64,
        ];
        let mut peers = PeerTable::synthetic();
        let rib = parse_table_dump(&data, Aid::Ipv4, &mut peers).unwrap();

        assert_eq!(rib.sequence_number, 42);
        assert_eq!(rib.prefix.addr, Addr::Ipv4(Ipv4Addr::new(10, 0, 0, 0)));
        assert_eq!(rib.prefix.prefix_len, 24);
        assert_eq!(rib.entries.len(), 1);
        assert_eq!(rib.entries[0].originated_time, 0x5F000000);
        // legacy AS_PATH is inflated to 4-byte encoding
        assert_eq!(
            rib.entries[0].as_path.as_deref(),
            Some(&[0x02, 0x02, 0x00, 0x00, 0x17, 0x2A, 0x00, 0x00, 0x00, 0x64][..])
        );

        assert_eq!(peers.peers[0].addr, Addr::Ipv4(Ipv4Addr::new(192, 0, 2, 1)));
        assert_eq!(peers.peers[0].asn, 5930);
    }

    #[test]
    fn test_ipv6_table_dump() {
        let mut data = vec![0x00, 0x00, 0x00, 0x01];
        data.extend_from_slice("2001:db8::".parse::<std::net::Ipv6Addr>().unwrap().octets().as_ref());
        data.extend_from_slice(&[0x20, 0x01]); // prefix length, status
        data.extend_from_slice(&[0x5F, 0x00, 0x00, 0x00]);
        data.extend_from_slice("2001:db8::ff".parse::<std::net::Ipv6Addr>().unwrap().octets().as_ref());
        data.extend_from_slice(&[0x00, 0x64, 0x00, 0x00]); // peer as, attr len

        let mut peers = PeerTable::synthetic();
        let rib = parse_table_dump(&data, Aid::Ipv6, &mut peers).unwrap();
        assert_eq!(rib.prefix.addr, Addr::Ipv6("2001:db8::".parse().unwrap()));
        assert_eq!(rib.prefix.prefix_len, 32);
        assert_eq!(peers.peers[0].asn, 100);
    }

    #[test]
    fn test_bad_prefix_len() {
        let data = [
            0x00, 0x00, 0x00, 0x01, //
            0x0A, 0x00, 0x00, 0x00, //
            0x21, // 33 bits for IPv4
            0x01, //
            0x5F, 0x00, 0x00, 0x00, //
            0xC0, 0x00, 0x02, 0x01, //
            0x17, 0x2A, 0x00, 0x00,
        ];
        let mut peers = PeerTable::synthetic();
        assert!(matches!(
            parse_table_dump(&data, Aid::Ipv4, &mut peers),
            Err(ParserError::BadPrefixLen { bits: 33, .. })
        ));
    }

    #[test]
    fn test_truncated_record() {
        let data = [0x00, 0x00, 0x00, 0x01, 0x0A, 0x00];
        let mut peers = PeerTable::synthetic();
        assert!(matches!(
            parse_table_dump(&data, Aid::Ipv4, &mut peers),
            Err(ParserError::Truncated)
        ));
        // a failed record must not disturb the peer slot
        assert!(peers.peers[0].addr.is_unspec());
    }
}
