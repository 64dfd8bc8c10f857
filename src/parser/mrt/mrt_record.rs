use log::warn;
use std::io::{ErrorKind, Read};

use crate::error::ParserError;
use crate::models::{
    Aid, AsnLength, Bgp4MpType, BgpMessage, BgpStateChange, CommonHeader, EntryType, PeerTable,
    Rib, TableDumpV2Type, AFI_IPV4, AFI_IPV6,
};
use crate::parser::mrt::messages::{
    parse_bgp4mp_entry, parse_bgp4mp_message, parse_bgp4mp_state_change, parse_peer_index_table,
    parse_rib_afi_entries, parse_table_dump,
};
use crate::parser::mrt::mrt_header::parse_common_header;

/// Per-record-class callbacks. Unset sinks cause that class of record
/// to be parsed but not delivered; RIB-class records are not even
/// parsed without a `dump` sink.
///
/// The dump sink receives the peer table the record's entries index
/// into; it is `None` for TABLE_DUMP_V2 RIB records seen before any
/// PEER_INDEX_TABLE. A sink that needs the table past its own return
/// must clone it.
#[derive(Default)]
pub struct MrtSinks<'a> {
    pub dump: Option<Box<dyn FnMut(&Rib, Option<&PeerTable>) + 'a>>,
    pub state: Option<Box<dyn FnMut(&BgpStateChange) + 'a>>,
    pub message: Option<Box<dyn FnMut(&BgpMessage) + 'a>>,
}

impl<'a> MrtSinks<'a> {
    pub fn new() -> MrtSinks<'a> {
        MrtSinks::default()
    }

    pub fn on_dump(mut self, f: impl FnMut(&Rib, Option<&PeerTable>) + 'a) -> MrtSinks<'a> {
        self.dump = Some(Box::new(f));
        self
    }

    pub fn on_state(mut self, f: impl FnMut(&BgpStateChange) + 'a) -> MrtSinks<'a> {
        self.state = Some(Box::new(f));
        self
    }

    pub fn on_message(mut self, f: impl FnMut(&BgpMessage) + 'a) -> MrtSinks<'a> {
        self.message = Some(Box::new(f));
        self
    }
}

/// Pull-based MRT record parser over any blocking byte source.
///
/// The parser owns the cross-record state: the peer index table from
/// the most recent PEER_INDEX_TABLE record, and the synthetic
/// single-slot table that legacy TABLE_DUMP and BGP4MP_ENTRY records
/// write their inline peer information into. The two are kept apart so
/// a legacy record can never clobber a real peer index table.
pub struct MrtParser<R> {
    reader: R,
    verbose: bool,
    peers: Option<PeerTable>,
    legacy_peers: Option<PeerTable>,
}

impl<R: Read> MrtParser<R> {
    pub fn new(reader: R) -> MrtParser<R> {
        MrtParser {
            reader,
            verbose: false,
            peers: None,
            legacy_peers: None,
        }
    }

    /// Emit diagnostics (through the `log` facade) for deprecated or
    /// unknown record types and discarded records. Off by default.
    pub fn verbose(mut self, verbose: bool) -> MrtParser<R> {
        self.verbose = verbose;
        self
    }

    /// The peer index table from the most recent PEER_INDEX_TABLE
    /// record, if any.
    pub fn peer_table(&self) -> Option<&PeerTable> {
        self.peers.as_ref()
    }

    /// Drive the stream to end of file, invoking sinks once per
    /// successfully decoded record, in input order.
    ///
    /// Records that fail a recoverable check (truncation, unknown
    /// family, bad prefix length) are discarded individually and the
    /// stream continues. I/O failures and the attribute-count cap
    /// abort with `Err`.
    pub fn run(&mut self, sinks: &mut MrtSinks) -> Result<(), ParserError> {
        while let Some((header, payload)) = self.next_record()? {
            match self.dispatch(&header, &payload, sinks) {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => {
                    if self.verbose {
                        warn!(
                            "discarding record type {} subtype {}: {}",
                            header.entry_type, header.entry_subtype, e
                        );
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Read one framed record: the 12-byte common header, then exactly
    /// `length` payload bytes. A short read in either part is the end
    /// of the stream; a truncated trailing record is dropped silently.
    fn next_record(&mut self) -> Result<Option<(CommonHeader, Vec<u8>)>, ParserError> {
        let header = match parse_common_header(&mut self.reader)? {
            Some(header) => header,
            None => return Ok(None),
        };

        let mut payload = vec![0u8; header.length as usize];
        match self.reader.read_exact(&mut payload) {
            Ok(()) => Ok(Some((header, payload))),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(ParserError::Io(e)),
        }
    }

    fn dispatch(
        &mut self,
        header: &CommonHeader,
        data: &[u8],
        sinks: &mut MrtSinks,
    ) -> Result<(), ParserError> {
        let entry_type = match EntryType::try_from(header.entry_type) {
            Ok(entry_type) => entry_type,
            Err(_) => {
                if self.verbose {
                    warn!("unknown MRT type {}", header.entry_type);
                }
                return Ok(());
            }
        };

        match entry_type {
            EntryType::NULL
            | EntryType::START
            | EntryType::DIE
            | EntryType::I_AM_DEAD
            | EntryType::PEER_DOWN
            | EntryType::BGP
            | EntryType::IDRP
            | EntryType::BGP4PLUS
            | EntryType::BGP4PLUS_01 => {
                if self.verbose {
                    warn!("deprecated MRT type {}", header.entry_type);
                }
            }
            EntryType::RIP
            | EntryType::RIPNG
            | EntryType::OSPFv2
            | EntryType::ISIS
            | EntryType::ISIS_ET
            | EntryType::OSPFv3
            | EntryType::OSPFv3_ET => {
                if self.verbose {
                    warn!("unsupported MRT type {}", header.entry_type);
                }
            }
            EntryType::TABLE_DUMP => {
                let aid = match header.entry_subtype {
                    AFI_IPV4 => Aid::Ipv4,
                    AFI_IPV6 => Aid::Ipv6,
                    subtype => {
                        if self.verbose {
                            warn!("unknown AFI {} in table dump", subtype);
                        }
                        return Ok(());
                    }
                };
                if sinks.dump.is_none() {
                    return Ok(());
                }
                let peers = self.legacy_peers.get_or_insert_with(PeerTable::synthetic);
                let rib = parse_table_dump(data, aid, peers)?;
                if let Some(dump) = sinks.dump.as_mut() {
                    dump(&rib, Some(&*peers));
                }
            }
            EntryType::TABLE_DUMP_V2 => self.dispatch_table_dump_v2(header, data, sinks)?,
            EntryType::BGP4MP | EntryType::BGP4MP_ET => {
                self.dispatch_bgp4mp(header, data, sinks)?
            }
        }
        Ok(())
    }

    fn dispatch_table_dump_v2(
        &mut self,
        header: &CommonHeader,
        data: &[u8],
        sinks: &mut MrtSinks,
    ) -> Result<(), ParserError> {
        let sub_type = match TableDumpV2Type::try_from(header.entry_subtype) {
            Ok(sub_type) => sub_type,
            Err(_) => {
                if self.verbose {
                    warn!("unhandled DUMP_V2 subtype {}", header.entry_subtype);
                }
                return Ok(());
            }
        };

        match sub_type {
            TableDumpV2Type::PeerIndexTable => {
                if sinks.dump.is_none() {
                    return Ok(());
                }
                // the previous table is released first, so a failed
                // replacement leaves no table behind
                self.peers = None;
                self.peers = Some(parse_peer_index_table(data)?);
            }
            TableDumpV2Type::GeoPeerTable => {
                if self.verbose {
                    warn!("unhandled DUMP_V2 subtype {}", header.entry_subtype);
                }
            }
            _ => {
                if sinks.dump.is_none() {
                    return Ok(());
                }
                let rib = parse_rib_afi_entries(data, sub_type)?;
                if let Some(dump) = sinks.dump.as_mut() {
                    dump(&rib, self.peers.as_ref());
                }
            }
        }
        Ok(())
    }

    fn dispatch_bgp4mp(
        &mut self,
        header: &CommonHeader,
        data: &[u8],
        sinks: &mut MrtSinks,
    ) -> Result<(), ParserError> {
        let sub_type = match Bgp4MpType::try_from(header.entry_subtype) {
            Ok(sub_type) => sub_type,
            Err(_) => {
                if self.verbose {
                    warn!("unhandled BGP4MP subtype {}", header.entry_subtype);
                }
                return Ok(());
            }
        };

        let asn_len = match sub_type.is_as4() {
            true => AsnLength::Bits32,
            false => AsnLength::Bits16,
        };

        match sub_type {
            Bgp4MpType::StateChange | Bgp4MpType::StateChangeAs4 => {
                let state = parse_bgp4mp_state_change(header, data, asn_len)?;
                if let Some(sink) = sinks.state.as_mut() {
                    sink(&state);
                }
            }
            Bgp4MpType::Message
            | Bgp4MpType::MessageAs4
            | Bgp4MpType::MessageLocal
            | Bgp4MpType::MessageAs4Local
            | Bgp4MpType::MessageAddpath
            | Bgp4MpType::MessageAs4Addpath
            | Bgp4MpType::MessageLocalAddpath
            | Bgp4MpType::MessageAs4LocalAddpath => {
                let message = parse_bgp4mp_message(header, data, asn_len, sub_type.is_addpath())?;
                if let Some(sink) = sinks.message.as_mut() {
                    sink(&message);
                }
            }
            Bgp4MpType::Entry => {
                if sinks.dump.is_none() {
                    return Ok(());
                }
                let peers = self.legacy_peers.get_or_insert_with(PeerTable::synthetic);
                let rib = parse_bgp4mp_entry(header, data, peers)?;
                if let Some(dump) = sinks.dump.as_mut() {
                    dump(&rib, Some(&*peers));
                }
            }
            Bgp4MpType::Snapshot => {
                if self.verbose {
                    warn!("unhandled BGP4MP subtype {}", header.entry_subtype);
                }
            }
        }
        Ok(())
    }
}
