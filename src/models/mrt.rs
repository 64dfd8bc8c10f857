//! MRT record header and wire-level type codes.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// MRT common header.
///
/// A CommonHeader ([RFC6396 section 2][header-link]) is constructed as
/// the following:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           Timestamp                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |             Type              |            Subtype            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                             Length                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The type field is kept as the raw wire value so that records of
/// unknown type can be reported and skipped rather than rejected.
/// For the `_ET` types the leading microsecond field is part of the
/// payload and consumed by the per-type decoders.
///
/// [header-link]: https://datatracker.ietf.org/doc/html/rfc6396#section-2
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommonHeader {
    pub timestamp: u32,
    pub entry_type: u16,
    pub entry_subtype: u16,
    pub length: u32,
}

impl CommonHeader {
    /// Whether this record uses the extended-timestamp header variant.
    pub fn is_extended(&self) -> bool {
        self.entry_type == u16::from(EntryType::BGP4MP_ET)
    }
}

/// MRT entry type.
///
/// EntryType indicates the type of the current MRT record. Type 0 to 10
/// are deprecated.
///
/// Excerpt from [RFC6396 section 4](https://datatracker.ietf.org/doc/html/rfc6396#section-4):
/// ```text
///     11   OSPFv2
///     12   TABLE_DUMP
///     13   TABLE_DUMP_V2
///     16   BGP4MP
///     17   BGP4MP_ET
///     32   ISIS
///     33   ISIS_ET
///     48   OSPFv3
///     49   OSPFv3_ET
/// ```
#[derive(Debug, TryFromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(non_camel_case_types)]
#[repr(u16)]
pub enum EntryType {
    // START DEPRECATED
    NULL = 0,
    START = 1,
    DIE = 2,
    I_AM_DEAD = 3,
    PEER_DOWN = 4,
    BGP = 5,
    RIP = 6,
    IDRP = 7,
    RIPNG = 8,
    BGP4PLUS = 9,
    BGP4PLUS_01 = 10,
    // END DEPRECATED
    OSPFv2 = 11,
    TABLE_DUMP = 12,
    TABLE_DUMP_V2 = 13,
    BGP4MP = 16,
    BGP4MP_ET = 17,
    ISIS = 32,
    ISIS_ET = 33,
    OSPFv3 = 48,
    OSPFv3_ET = 49,
}

/// TableDump version 2 subtypes.
///
/// <https://www.iana.org/assignments/mrt/mrt.xhtml#subtype-codes>
#[derive(Debug, TryFromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum TableDumpV2Type {
    PeerIndexTable = 1,
    RibIpv4Unicast = 2,
    RibIpv4Multicast = 3,
    RibIpv6Unicast = 4,
    RibIpv6Multicast = 5,
    RibGeneric = 6,
    GeoPeerTable = 7,
    RibIpv4UnicastAddPath = 8,
    RibIpv4MulticastAddPath = 9,
    RibIpv6UnicastAddPath = 10,
    RibIpv6MulticastAddPath = 11,
    RibGenericAddPath = 12,
}

/// BGP4MP subtypes, including the pre-RFC6396 `Entry` and `Snapshot`
/// codes still found in old archives.
///
/// <https://www.iana.org/assignments/mrt/mrt.xhtml#subtype-codes>
#[derive(Debug, TryFromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Bgp4MpType {
    StateChange = 0,
    Message = 1,
    Entry = 2,
    Snapshot = 3,
    MessageAs4 = 4,
    StateChangeAs4 = 5,
    MessageLocal = 6,
    MessageAs4Local = 7,
    MessageAddpath = 8,
    MessageAs4Addpath = 9,
    MessageLocalAddpath = 10,
    MessageAs4LocalAddpath = 11,
}

impl Bgp4MpType {
    /// Subtypes whose AS fields are 4 bytes wide.
    pub fn is_as4(&self) -> bool {
        matches!(
            self,
            Bgp4MpType::StateChangeAs4
                | Bgp4MpType::MessageAs4
                | Bgp4MpType::MessageAs4Local
                | Bgp4MpType::MessageAs4Addpath
                | Bgp4MpType::MessageAs4LocalAddpath
        )
    }

    /// Subtypes carrying the RFC 7911 additional-path marker.
    pub fn is_addpath(&self) -> bool {
        matches!(
            self,
            Bgp4MpType::MessageAddpath
                | Bgp4MpType::MessageAs4Addpath
                | Bgp4MpType::MessageLocalAddpath
                | Bgp4MpType::MessageAs4LocalAddpath
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_codes() {
        assert_eq!(EntryType::try_from(12u16), Ok(EntryType::TABLE_DUMP));
        assert_eq!(EntryType::try_from(13u16), Ok(EntryType::TABLE_DUMP_V2));
        assert_eq!(EntryType::try_from(16u16), Ok(EntryType::BGP4MP));
        assert_eq!(EntryType::try_from(17u16), Ok(EntryType::BGP4MP_ET));
        // 14, 15 were never assigned
        assert!(EntryType::try_from(14u16).is_err());
        assert!(EntryType::try_from(15u16).is_err());
        assert!(EntryType::try_from(255u16).is_err());
    }

    #[test]
    fn test_is_extended() {
        let mut header = CommonHeader {
            timestamp: 0,
            entry_type: EntryType::BGP4MP.into(),
            entry_subtype: 0,
            length: 0,
        };
        assert!(!header.is_extended());
        header.entry_type = EntryType::BGP4MP_ET.into();
        assert!(header.is_extended());
    }

    #[test]
    fn test_bgp4mp_subtype_flags() {
        assert!(Bgp4MpType::StateChangeAs4.is_as4());
        assert!(!Bgp4MpType::StateChange.is_as4());
        assert!(Bgp4MpType::MessageAs4Addpath.is_as4());
        assert!(Bgp4MpType::MessageAs4Addpath.is_addpath());
        assert!(Bgp4MpType::MessageLocalAddpath.is_addpath());
        assert!(!Bgp4MpType::MessageAs4.is_addpath());
        assert!(!Bgp4MpType::Entry.is_as4());
    }
}
