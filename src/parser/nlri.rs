/*!
NLRI prefix decoders, one per address family.

Each decoder reads a one-byte length in bits followed by the prefix
bits rounded up to whole bytes. The VPN forms additionally strip the
MPLS label stack and the route distinguisher from the announced length,
so the returned [Prefix] always carries a plain IP prefix length. This
module is the extension point for new address families.
*/
use ipnet::{Ipv4Net, Ipv6Net};
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::ParserError;
use crate::models::{Addr, Aid, Prefix};
use crate::parser::utils::ByteCursor;

/// Read one NLRI-encoded prefix of the given family from the cursor.
pub fn read_nlri_prefix(cursor: &mut ByteCursor, aid: Aid) -> Result<Prefix, ParserError> {
    match aid {
        Aid::Ipv4 => read_ipv4_prefix(cursor),
        Aid::Ipv6 => read_ipv6_prefix(cursor),
        Aid::VpnIpv4 | Aid::VpnIpv6 => read_vpn_prefix(cursor, aid, false),
        Aid::Unspec => Err(ParserError::UnknownFamily { afi: 0, safi: None }),
    }
}

fn read_ipv4_prefix(cursor: &mut ByteCursor) -> Result<Prefix, ParserError> {
    let bit_len = cursor.read_u8()?;
    if bit_len > 32 {
        return Err(ParserError::BadPrefixLen {
            bits: bit_len,
            aid: Aid::Ipv4,
        });
    }
    let byte_len = (bit_len as usize + 7) / 8;
    let mut buf = [0u8; 4];
    buf[..byte_len].copy_from_slice(cursor.read_exact(byte_len)?);
    let addr = Ipv4Addr::from(buf);
    Ipv4Net::new(addr, bit_len).map_err(|_| ParserError::BadPrefixLen {
        bits: bit_len,
        aid: Aid::Ipv4,
    })?;
    Ok(Prefix {
        addr: Addr::Ipv4(addr),
        prefix_len: bit_len,
    })
}

fn read_ipv6_prefix(cursor: &mut ByteCursor) -> Result<Prefix, ParserError> {
    let bit_len = cursor.read_u8()?;
    if bit_len > 128 {
        return Err(ParserError::BadPrefixLen {
            bits: bit_len,
            aid: Aid::Ipv6,
        });
    }
    let byte_len = (bit_len as usize + 7) / 8;
    let mut buf = [0u8; 16];
    buf[..byte_len].copy_from_slice(cursor.read_exact(byte_len)?);
    let addr = Ipv6Addr::from(buf);
    Ipv6Net::new(addr, bit_len).map_err(|_| ParserError::BadPrefixLen {
        bits: bit_len,
        aid: Aid::Ipv6,
    })?;
    Ok(Prefix {
        addr: Addr::Ipv6(addr),
        prefix_len: bit_len,
    })
}

/// VPN NLRI (RFC 4364 section 4.3.4): the announced bit length covers
/// the MPLS label stack, the 8-byte route distinguisher, and the IP
/// prefix. Labels are 3 bytes each, terminated by the bottom-of-stack
/// bit; withdraws carry a single compatibility label instead. Labels
/// and distinguisher are stripped and not modeled.
fn read_vpn_prefix(
    cursor: &mut ByteCursor,
    aid: Aid,
    is_withdraw: bool,
) -> Result<Prefix, ParserError> {
    let bit_len = cursor.read_u8()?;
    let mut plen = bit_len as usize;

    loop {
        if plen < 24 {
            return Err(ParserError::Truncated);
        }
        let label = cursor.read_exact(3)?;
        plen -= 24;
        if is_withdraw || label[2] & 0x01 != 0 {
            break;
        }
    }

    if plen < 64 {
        return Err(ParserError::Truncated);
    }
    cursor.read_u64()?; // route distinguisher
    plen -= 64;

    if plen > aid.max_prefix_len() as usize {
        return Err(ParserError::BadPrefixLen {
            bits: bit_len,
            aid,
        });
    }
    let byte_len = (plen + 7) / 8;
    let addr = match aid {
        Aid::VpnIpv4 => {
            let mut buf = [0u8; 4];
            buf[..byte_len].copy_from_slice(cursor.read_exact(byte_len)?);
            Addr::VpnIpv4(Ipv4Addr::from(buf))
        }
        _ => {
            let mut buf = [0u8; 16];
            buf[..byte_len].copy_from_slice(cursor.read_exact(byte_len)?);
            Addr::VpnIpv6(Ipv6Addr::from(buf))
        }
    };
    Ok(Prefix {
        addr,
        prefix_len: plen as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_prefix() {
        // 10.0.0.0/24 encodes as 3 address bytes
        let data = [0x18, 0x0A, 0x00, 0x00];
        let mut cur = ByteCursor::new(&data);
        let prefix = read_nlri_prefix(&mut cur, Aid::Ipv4).unwrap();
        assert_eq!(prefix.addr, Addr::Ipv4(Ipv4Addr::new(10, 0, 0, 0)));
        assert_eq!(prefix.prefix_len, 24);
        assert_eq!(cur.remaining(), 0);

        // /22 rounds up to 3 bytes as well
        let data = [0x16, 0xC0, 0x00, 0x08];
        let mut cur = ByteCursor::new(&data);
        let prefix = read_nlri_prefix(&mut cur, Aid::Ipv4).unwrap();
        assert_eq!(prefix.addr, Addr::Ipv4(Ipv4Addr::new(192, 0, 8, 0)));
        assert_eq!(prefix.prefix_len, 22);

        // the default route consumes only its length byte
        let data = [0x00];
        let mut cur = ByteCursor::new(&data);
        let prefix = read_nlri_prefix(&mut cur, Aid::Ipv4).unwrap();
        assert_eq!(prefix.prefix_len, 0);
        assert_eq!(cur.remaining(), 0);
    }

    #[test]
    fn test_ipv4_prefix_errors() {
        let data = [0x21, 0x0A, 0x00, 0x00, 0x00, 0x00];
        let mut cur = ByteCursor::new(&data);
        assert!(matches!(
            read_nlri_prefix(&mut cur, Aid::Ipv4),
            Err(ParserError::BadPrefixLen { bits: 33, .. })
        ));

        let data = [0x18, 0x0A];
        let mut cur = ByteCursor::new(&data);
        assert!(matches!(
            read_nlri_prefix(&mut cur, Aid::Ipv4),
            Err(ParserError::Truncated)
        ));
    }

    #[test]
    fn test_ipv6_prefix() {
        // 2001:db8::/32
        let data = [0x20, 0x20, 0x01, 0x0D, 0xB8];
        let mut cur = ByteCursor::new(&data);
        let prefix = read_nlri_prefix(&mut cur, Aid::Ipv6).unwrap();
        assert_eq!(prefix.addr, Addr::Ipv6("2001:db8::".parse().unwrap()));
        assert_eq!(prefix.prefix_len, 32);

        let data = [0x81, 0x00];
        let mut cur = ByteCursor::new(&data);
        assert!(matches!(
            read_nlri_prefix(&mut cur, Aid::Ipv6),
            Err(ParserError::BadPrefixLen { bits: 129, .. })
        ));
    }

    #[test]
    fn test_vpn_prefix() {
        // 120 bits: one label (BoS set) + RD 100:1 + 10.1.0.0/32
        let data = [
            120, // bit length: 24 + 64 + 32
            0x00, 0x01, 0x01, // label, bottom-of-stack
            0x00, 0x00, 0x00, 0x64, 0x00, 0x00, 0x00, 0x01, // RD
            10, 1, 0, 0, // address
        ];
        let mut cur = ByteCursor::new(&data);
        let prefix = read_nlri_prefix(&mut cur, Aid::VpnIpv4).unwrap();
        assert_eq!(prefix.addr, Addr::VpnIpv4(Ipv4Addr::new(10, 1, 0, 0)));
        assert_eq!(prefix.prefix_len, 32);
        assert_eq!(cur.remaining(), 0);
    }

    #[test]
    fn test_vpn_prefix_two_labels() {
        // 136 bits: two labels (second has BoS) + RD + /24
        let data = [
            136, //
            0x00, 0x01, 0x00, // label, more to come
            0x00, 0x02, 0x01, // label, bottom-of-stack
            0x00, 0x00, 0x00, 0x64, 0x00, 0x00, 0x00, 0x01, // RD
            10, 2, 0, // address
        ];
        let mut cur = ByteCursor::new(&data);
        let prefix = read_nlri_prefix(&mut cur, Aid::VpnIpv4).unwrap();
        assert_eq!(prefix.addr, Addr::VpnIpv4(Ipv4Addr::new(10, 2, 0, 0)));
        assert_eq!(prefix.prefix_len, 24);
    }

    #[test]
    fn test_vpn_prefix_errors() {
        // length shorter than a single label
        let data = [16, 0x00, 0x01];
        let mut cur = ByteCursor::new(&data);
        assert!(matches!(
            read_nlri_prefix(&mut cur, Aid::VpnIpv4),
            Err(ParserError::Truncated)
        ));

        // label present but no room for the distinguisher
        let data = [48, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00];
        let mut cur = ByteCursor::new(&data);
        assert!(matches!(
            read_nlri_prefix(&mut cur, Aid::VpnIpv4),
            Err(ParserError::Truncated)
        ));

        // stripped length exceeds the IPv4 width
        let data = [
            136, //
            0x00, 0x01, 0x01, //
            0x00, 0x00, 0x00, 0x64, 0x00, 0x00, 0x00, 0x01, //
            10, 0, 0, 0, 0, 0, 0,
        ];
        let mut cur = ByteCursor::new(&data);
        assert!(matches!(
            read_nlri_prefix(&mut cur, Aid::VpnIpv4),
            Err(ParserError::BadPrefixLen { .. })
        ));
    }
}
