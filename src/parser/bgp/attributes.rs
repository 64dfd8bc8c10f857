/*!
BGP path attribute extraction for RIB entries.

Iterates the attribute TLVs of one entry, pulling out the well-known
fields (ORIGIN, AS_PATH, NEXT_HOP, MED, LOCAL_PREF), normalizing the
AS path to the 4-byte-ASN encoding, extracting the next hop from
MP_REACH_NLRI, and preserving everything else byte-for-byte.
*/
use bytes::{BufMut, Bytes, BytesMut};
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::ParserError;
use crate::models::{Addr, Aid, AttrType, RibEntry, ATTR_FLAG_EXT_LEN, MAX_EXTRA_ATTRS};
use crate::parser::utils::ByteCursor;

/// Decodes one attribute span into the typed fields of a [RibEntry].
pub struct AttributeDecoder {
    aid: Aid,
    /// True when the surrounding record format already carries 4-byte
    /// AS numbers in AS_PATH (TABLE_DUMP_V2 per RFC 6396).
    as4_aspath: bool,
}

impl AttributeDecoder {
    pub fn new(aid: Aid, as4_aspath: bool) -> AttributeDecoder {
        AttributeDecoder { aid, as4_aspath }
    }

    /// Iterate the TLVs of `data` until the span is exhausted, filling
    /// in `entry`. Any length inconsistency fails the whole entry.
    pub fn parse_attributes(&self, data: &[u8], entry: &mut RibEntry) -> Result<(), ParserError> {
        let mut cursor = ByteCursor::new(data);

        while cursor.remaining() > 0 {
            let tlv_start = cursor.position();
            let flags = cursor.read_u8()?;
            let attr_type = cursor.read_u8()?;
            let attr_len = match flags & ATTR_FLAG_EXT_LEN {
                0 => cursor.read_u8()? as usize,
                _ => cursor.read_u16()? as usize,
            };
            let payload = cursor.read_exact(attr_len)?;

            match AttrType::try_from(attr_type) {
                Ok(AttrType::Origin) => {
                    if attr_len != 1 {
                        return Err(ParserError::Truncated);
                    }
                    entry.origin = payload[0];
                }
                Ok(AttrType::AsPath) => {
                    entry.as_path = Some(match self.as4_aspath {
                        true => Bytes::copy_from_slice(payload),
                        false => aspath_inflate(payload)?,
                    });
                }
                Ok(AttrType::NextHop) => {
                    if attr_len != 4 {
                        return Err(ParserError::Truncated);
                    }
                    // only meaningful for plain IPv4 records; other
                    // families get their next hop from MP_REACH_NLRI
                    if self.aid == Aid::Ipv4 {
                        let octets: [u8; 4] = payload.try_into().unwrap();
                        entry.next_hop = Addr::Ipv4(Ipv4Addr::from(octets));
                    }
                }
                Ok(AttrType::MultiExitDisc) => {
                    if attr_len != 4 {
                        return Err(ParserError::Truncated);
                    }
                    entry.med = Some(u32::from_be_bytes(payload.try_into().unwrap()));
                }
                Ok(AttrType::LocalPref) => {
                    if attr_len != 4 {
                        return Err(ParserError::Truncated);
                    }
                    entry.local_pref = Some(u32::from_be_bytes(payload.try_into().unwrap()));
                }
                Ok(AttrType::MpReachNlri) => {
                    if let Some(next_hop) = self.extract_mp_next_hop(payload)? {
                        entry.next_hop = next_hop;
                    }
                }
                Ok(AttrType::As4Path) if !self.as4_aspath => {
                    // replaces whatever AS_PATH put there
                    entry.as_path = Some(Bytes::copy_from_slice(payload));
                }
                _ => {
                    // unrecognized types, and AS4_PATH in a record that
                    // is already 4-byte encoded, are kept raw with
                    // their header
                    if entry.extra_attrs.len() >= MAX_EXTRA_ATTRS {
                        return Err(ParserError::TooManyAttrs);
                    }
                    entry
                        .extra_attrs
                        .push(Bytes::copy_from_slice(&data[tlv_start..cursor.position()]));
                }
            }
        }

        Ok(())
    }

    /// Pull the next-hop address out of an MP_REACH_NLRI payload.
    ///
    /// Two encodings are in the wild: RFC 6396 section 4.3.4 abbreviates
    /// the attribute to `{nh_len, nh, ...}`, while most implementations
    /// kept the RFC 4760 form with its AFI/SAFI/reserved prelude. Only
    /// the abbreviated form has the first byte equal to the remaining
    /// payload length, which disambiguates the two.
    fn extract_mp_next_hop(&self, payload: &[u8]) -> Result<Option<Addr>, ParserError> {
        if payload.is_empty() {
            return Err(ParserError::Truncated);
        }
        let data = match payload[0] as usize != payload.len() - 1 {
            true => payload.get(3..).ok_or(ParserError::Truncated)?,
            false => payload,
        };

        let next_hop = match self.aid {
            Aid::Ipv6 => {
                let octets: [u8; 16] = data
                    .get(1..17)
                    .ok_or(ParserError::Truncated)?
                    .try_into()
                    .unwrap();
                Some(Addr::Ipv6(Ipv6Addr::from(octets)))
            }
            Aid::VpnIpv4 => {
                // skip the 8-byte route distinguisher in the next hop
                let octets: [u8; 4] = data
                    .get(9..13)
                    .ok_or(ParserError::Truncated)?
                    .try_into()
                    .unwrap();
                Some(Addr::VpnIpv4(Ipv4Addr::from(octets)))
            }
            Aid::VpnIpv6 => {
                let octets: [u8; 16] = data
                    .get(9..25)
                    .ok_or(ParserError::Truncated)?
                    .try_into()
                    .unwrap();
                Some(Addr::VpnIpv6(Ipv6Addr::from(octets)))
            }
            // IPv4 records take their next hop from NEXT_HOP instead
            Aid::Ipv4 | Aid::Unspec => None,
        };
        Ok(next_hop)
    }
}

/// Re-encode an AS_PATH from 2-byte to 4-byte ASNs by zero extension.
///
/// The input is a sequence of `{seg_type, seg_len, seg_len x 2 bytes}`
/// segments. Two passes: the first validates segment framing and sizes
/// the output, the second copies segment headers and widens each ASN.
pub fn aspath_inflate(data: &[u8]) -> Result<Bytes, ParserError> {
    let mut inflated_len = 0usize;
    let mut rest = data;
    while !rest.is_empty() {
        if rest.len() < 2 {
            return Err(ParserError::Truncated);
        }
        let seg_size = 2 + 2 * rest[1] as usize;
        if seg_size > rest.len() {
            return Err(ParserError::Truncated);
        }
        inflated_len += 2 + 4 * rest[1] as usize;
        rest = &rest[seg_size..];
    }

    let mut out = BytesMut::with_capacity(inflated_len);
    let mut rest = data;
    while !rest.is_empty() {
        let seg_len = rest[1] as usize;
        out.put_u8(rest[0]);
        out.put_u8(rest[1]);
        for asn in rest[2..2 + 2 * seg_len].chunks_exact(2) {
            out.put_u16(0);
            out.put_slice(asn);
        }
        rest = &rest[2 + 2 * seg_len..];
    }
    Ok(out.freeze())
}
