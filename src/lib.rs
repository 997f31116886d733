#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod error;
pub mod packet;

pub use error::{ChecksumError, DatagramError, FieldError, HeaderError, LengthError, PortError};
pub use packet::{
    Datagram, DatagramBuilder, csum,
    net_types::{
        Checksum, Header, Length, MAX_PAYLOAD, PROTOCOL_NUMBER, Port, PortClass, PseudoHeader,
    },
};
