//! BGP attribute codes, FSM states, and BGP4MP record structs.

use bytes::Bytes;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::models::Addr;

/// Recognized BGP path attribute type codes (RFC 4271 section 4.3,
/// RFC 4760, RFC 6793). Everything else is preserved raw.
#[derive(Debug, TryFromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum AttrType {
    Origin = 1,
    AsPath = 2,
    NextHop = 3,
    MultiExitDisc = 4,
    LocalPref = 5,
    MpReachNlri = 14,
    As4Path = 17,
}

/// Attribute flags octet: extended-length bit (RFC 4271 section 4.3).
pub const ATTR_FLAG_EXT_LEN: u8 = 0x10;

/// BGP finite state machine states (RFC 4271 section 8.2.2).
///
/// Records may carry out-of-range state values; those are passed
/// through as raw `u16` in [BgpStateChange] and only named here.
#[derive(Debug, TryFromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum BgpState {
    Idle = 1,
    Connect = 2,
    Active = 3,
    OpenSent = 4,
    OpenConfirm = 5,
    Established = 6,
}

/// Printable name for a wire FSM state value.
pub fn bgp_state_name(state: u16) -> &'static str {
    match BgpState::try_from(state) {
        Ok(BgpState::Idle) => "Idle",
        Ok(BgpState::Connect) => "Connect",
        Ok(BgpState::Active) => "Active",
        Ok(BgpState::OpenSent) => "OpenSent",
        Ok(BgpState::OpenConfirm) => "OpenConfirm",
        Ok(BgpState::Established) => "Established",
        Err(_) => "Unknown",
    }
}

/// Record timestamp: header seconds plus the `_ET` microsecond field
/// scaled to nanoseconds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordTime {
    pub sec: u32,
    pub nsec: u32,
}

/// A decoded BGP4MP state-change record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgpStateChange {
    pub time: RecordTime,
    pub src_as: u32,
    pub dst_as: u32,
    pub src: Addr,
    pub dst: Addr,
    pub old_state: u16,
    pub new_state: u16,
}

/// A decoded BGP4MP message record. The BGP message itself is copied
/// wholesale and not parsed further.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgpMessage {
    pub time: RecordTime,
    pub src_as: u32,
    pub dst_as: u32,
    pub src: Addr,
    pub dst: Addr,
    pub add_path: bool,
    pub msg: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_type_codes() {
        assert_eq!(AttrType::try_from(1u8), Ok(AttrType::Origin));
        assert_eq!(AttrType::try_from(2u8), Ok(AttrType::AsPath));
        assert_eq!(AttrType::try_from(14u8), Ok(AttrType::MpReachNlri));
        assert_eq!(AttrType::try_from(17u8), Ok(AttrType::As4Path));
        // communities are not extracted, they stay raw
        assert!(AttrType::try_from(8u8).is_err());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(bgp_state_name(1), "Idle");
        assert_eq!(bgp_state_name(6), "Established");
        assert_eq!(bgp_state_name(0), "Unknown");
        assert_eq!(bgp_state_name(7), "Unknown");
    }
}
