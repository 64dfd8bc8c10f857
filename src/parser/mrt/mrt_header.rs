use bytes::Buf;
use std::io::{ErrorKind, Read};

use crate::error::ParserError;
use crate::models::CommonHeader;

/// Read the 12-byte MRT common header [RFC6396][header].
///
/// Returns `Ok(None)` when the source runs out before a full header is
/// available: a short read here is the normal end-of-stream signal, not
/// an error.
///
/// [header]: https://tools.ietf.org/html/rfc6396#section-4.1
pub fn parse_common_header<T: Read>(input: &mut T) -> Result<Option<CommonHeader>, ParserError> {
    let mut raw_bytes = [0u8; 12];
    match input.read_exact(&mut raw_bytes) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(ParserError::Io(e)),
    }

    let mut data = &raw_bytes[..];
    let timestamp = data.get_u32();
    let entry_type = data.get_u16();
    let entry_subtype = data.get_u16();
    // the length field does not include the common header itself
    let length = data.get_u32();

    Ok(Some(CommonHeader {
        timestamp,
        entry_type,
        entry_subtype,
        length,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;

    #[test]
    fn test_parse_common_header() {
        let data: &[u8] = &[
            0x5F, 0x00, 0x00, 0x00, // timestamp
            0x00, 0x0D, // type 13
            0x00, 0x01, // subtype 1
            0x00, 0x00, 0x00, 0x08, // length
        ];
        let header = parse_common_header(&mut &data[..]).unwrap().unwrap();
        assert_eq!(header.timestamp, 0x5F000000);
        assert_eq!(header.entry_type, u16::from(EntryType::TABLE_DUMP_V2));
        assert_eq!(header.entry_subtype, 1);
        assert_eq!(header.length, 8);
        assert!(!header.is_extended());
    }

    #[test]
    fn test_short_header_is_clean_eof() {
        let data: &[u8] = &[];
        assert!(parse_common_header(&mut &data[..]).unwrap().is_none());

        let data: &[u8] = &[0x00, 0x01, 0x02];
        assert!(parse_common_header(&mut &data[..]).unwrap().is_none());

        let data: &[u8] = &[0; 11];
        assert!(parse_common_header(&mut &data[..]).unwrap().is_none());
    }
}
