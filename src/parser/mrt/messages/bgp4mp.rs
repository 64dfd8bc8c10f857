use bytes::Bytes;

use crate::error::ParserError;
use crate::models::{
    Aid, AsnLength, BgpMessage, BgpStateChange, CommonHeader, PeerTable, RecordTime, Rib, RibEntry,
};
use crate::parser::bgp::AttributeDecoder;
use crate::parser::nlri::read_nlri_prefix;
use crate::parser::utils::ByteCursor;

/// Timestamp for a BGP4MP body: header seconds, plus the leading
/// microsecond field of the `_ET` header variant scaled to
/// nanoseconds.
fn read_record_time(
    header: &CommonHeader,
    cursor: &mut ByteCursor,
) -> Result<RecordTime, ParserError> {
    let mut time = RecordTime {
        sec: header.timestamp,
        nsec: 0,
    };
    if header.is_extended() {
        time.nsec = cursor.read_u32()?.wrapping_mul(1000);
    }
    Ok(time)
}

/// Common prefix of the STATE_CHANGE and MESSAGE bodies: source and
/// destination AS (2 or 4 bytes), interface index (ignored), and the
/// AFI selecting the width of the two addresses that follow.
fn read_peer_header(
    cursor: &mut ByteCursor,
    asn_len: AsnLength,
) -> Result<(u32, u32, Aid), ParserError> {
    let src_as = cursor.read_asn(asn_len)?;
    let dst_as = cursor.read_asn(asn_len)?;
    cursor.skip(2)?; // interface index
    let afi = cursor.read_u16()?;
    let aid = Aid::from_afi_safi(afi, None).ok_or(ParserError::UnknownFamily { afi, safi: None })?;
    Ok((src_as, dst_as, aid))
}

/// Parse a BGP4MP STATE_CHANGE or STATE_CHANGE_AS4 body.
///
/// <https://www.rfc-editor.org/rfc/rfc6396#section-4.4.1>
///
/// FSM state values outside the RFC 4271 range are passed through
/// unchanged.
pub fn parse_bgp4mp_state_change(
    header: &CommonHeader,
    data: &[u8],
    asn_len: AsnLength,
) -> Result<BgpStateChange, ParserError> {
    let mut cursor = ByteCursor::new(data);
    let time = read_record_time(header, &mut cursor)?;
    let (src_as, dst_as, aid) = read_peer_header(&mut cursor, asn_len)?;

    let src = cursor.read_address(aid)?;
    let dst = cursor.read_address(aid)?;
    let old_state = cursor.read_u16()?;
    let new_state = cursor.read_u16()?;

    Ok(BgpStateChange {
        time,
        src_as,
        dst_as,
        src,
        dst,
        old_state,
        new_state,
    })
}

/// Parse a BGP4MP MESSAGE body (any of the six subtypes). The BGP
/// message bytes are copied wholesale and not parsed further.
///
/// <https://www.rfc-editor.org/rfc/rfc6396#section-4.4.2>
pub fn parse_bgp4mp_message(
    header: &CommonHeader,
    data: &[u8],
    asn_len: AsnLength,
    add_path: bool,
) -> Result<BgpMessage, ParserError> {
    let mut cursor = ByteCursor::new(data);
    let time = read_record_time(header, &mut cursor)?;
    let (src_as, dst_as, aid) = read_peer_header(&mut cursor, asn_len)?;

    let src = cursor.read_address(aid)?;
    let dst = cursor.read_address(aid)?;
    let msg = Bytes::copy_from_slice(cursor.read_exact(cursor.remaining())?);

    Ok(BgpMessage {
        time,
        src_as,
        dst_as,
        src,
        dst,
        add_path,
        msg,
    })
}

/// Parse a pre-RFC6396 BGP4MP_ENTRY body into a single-entry RIB
/// record.
///
/// ```text
/// {src_as:u16, dst_as:u16, if_index:u16, afi:u16,
///  src_addr, dst_addr, view:u16, status:u16, originated:u32,
///  afi:u16, safi:u8, nh_len:u8, next_hop, prefix (NLRI),
///  attr_len:u16, attrs}
/// ```
///
/// The destination AS and address are written into the single slot of
/// the caller's synthetic [PeerTable]. The next hop is decoded at the
/// fixed width of the record's family, but the cursor advances by the
/// announced `nh_len`.
pub fn parse_bgp4mp_entry(
    header: &CommonHeader,
    data: &[u8],
    peers: &mut PeerTable,
) -> Result<Rib, ParserError> {
    let mut cursor = ByteCursor::new(data);
    if header.is_extended() {
        cursor.skip(4)?; // microsecond timestamp, unused for RIB records
    }

    cursor.skip(2)?; // source AS
    let peer_asn = cursor.read_u16()? as u32;
    cursor.skip(2)?; // interface index
    let afi = cursor.read_u16()?;
    let aid = Aid::from_afi_safi(afi, None).ok_or(ParserError::UnknownFamily { afi, safi: None })?;
    cursor.read_address(aid)?; // source address
    let peer_addr = cursor.read_address(aid)?;

    cursor.skip(4)?; // view and status
    let originated_time = cursor.read_u32()?;

    let afi = cursor.read_u16()?;
    let safi = cursor.read_u8()?;
    let aid = Aid::from_afi_safi(afi, Some(safi)).ok_or(ParserError::UnknownFamily {
        afi,
        safi: Some(safi),
    })?;

    let nh_len = cursor.read_u8()? as usize;
    let next_hop = {
        let mut peek = cursor;
        peek.read_address(aid)?
    };
    cursor.skip(nh_len)?;

    let prefix = read_nlri_prefix(&mut cursor, aid)?;

    let attr_len = cursor.read_u16()? as usize;
    let attr_data = cursor.read_exact(attr_len)?;
    let mut entry = RibEntry {
        originated_time,
        next_hop,
        ..RibEntry::default()
    };
    AttributeDecoder::new(aid, false).parse_attributes(attr_data, &mut entry)?;

    let slot = &mut peers.peers[0];
    slot.addr = peer_addr;
    slot.asn = peer_asn;

    Ok(Rib {
        sequence_number: 0,
        prefix,
        add_path: false,
        entries: vec![entry],
    })
}
