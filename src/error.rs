use std::fmt::{self, Display, Formatter};
use std::io::ErrorKind;
use std::{error::Error, io};

use crate::models::Aid;

/// Errors raised while framing or decoding MRT records.
#[derive(Debug)]
pub enum ParserError {
    /// The underlying reader failed with a real I/O error (not EOF).
    Io(io::Error),
    /// A bounds or length check failed inside the current record.
    Truncated,
    /// An AFI/SAFI pair does not map to any supported address family.
    UnknownFamily { afi: u16, safi: Option<u8> },
    /// An NLRI bit length exceeds the width of its address family.
    BadPrefixLen { bits: u8, aid: Aid },
    /// A single RIB entry carries more than 254 unrecognized attributes.
    TooManyAttrs,
}

impl ParserError {
    /// Recoverable errors discard the current record only; the framer
    /// continues with the next record. Everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ParserError::Truncated
                | ParserError::UnknownFamily { .. }
                | ParserError::BadPrefixLen { .. }
        )
    }
}

impl Display for ParserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParserError::Io(e) => write!(f, "io error: {}", e),
            ParserError::Truncated => write!(f, "truncated record"),
            ParserError::UnknownFamily {
                afi,
                safi: Some(safi),
            } => {
                write!(f, "unhandled AFI/SAFI {}/{}", afi, safi)
            }
            ParserError::UnknownFamily { afi, safi: None } => {
                write!(f, "unhandled AFI {}", afi)
            }
            ParserError::BadPrefixLen { bits, aid } => {
                write!(f, "prefix length {} too long for {:?}", bits, aid)
            }
            ParserError::TooManyAttrs => write!(f, "too many attributes"),
        }
    }
}

impl Error for ParserError {}

impl From<io::Error> for ParserError {
    fn from(io_error: io::Error) -> Self {
        match io_error.kind() {
            // a short read inside a record is a framing problem, not an
            // I/O failure
            ErrorKind::UnexpectedEof => ParserError::Truncated,
            _ => ParserError::Io(io_error),
        }
    }
}
