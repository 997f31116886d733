//! The validated field types that make up a UDP header, and the header itself
//!
//! Every type here is a plain value, once constructed it is known to be valid
//! and can be freely copied and shared between threads.

use super::csum;
use crate::error::{ChecksumError, FieldError, HeaderError, LengthError, PortError};
use std::{fmt, net::Ipv4Addr};

/// The [protocol number](https://en.wikipedia.org/wiki/List_of_IP_protocol_numbers)
/// of UDP, placed in the [`PseudoHeader`]
pub const PROTOCOL_NUMBER: u8 = 17;

/// The largest data payload a single datagram can carry, the 16-bit length
/// field minus the header
pub const MAX_PAYLOAD: usize = u16::MAX as usize - Header::LEN;

/// Reads a big-endian `u16` from the first 2 bytes of `bytes`
#[inline]
fn read_u16(bytes: &[u8]) -> Result<u16, FieldError> {
    match bytes {
        [] => Err(FieldError::Empty),
        [_] => Err(FieldError::InsufficientBytes),
        [hi, lo, ..] => Ok(u16::from_be_bytes([*hi, *lo])),
    }
}

/// A UDP [port](https://en.wikipedia.org/wiki/Port_(computer_networking))
///
/// All 65536 values are valid
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Port(u16);

/// The conventional sub-range a [`Port`] belongs to
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PortClass {
    /// `[0, 1024)`, assigned to system services
    WellKnown,
    /// `[1024, 49152)`, assigned on request
    Registered,
    /// `[49152, 65535]`, ephemeral ports that are never assigned
    Dynamic,
}

impl Port {
    /// [Echo](https://www.rfc-editor.org/rfc/rfc862)
    pub const ECHO: Self = Self(7);
    /// [DNS](https://www.rfc-editor.org/rfc/rfc1035)
    pub const DNS: Self = Self(53);
    /// DHCP server (BOOTP)
    pub const DHCP_SERVER: Self = Self(67);
    /// DHCP client (BOOTP)
    pub const DHCP_CLIENT: Self = Self(68);
    /// [TFTP](https://www.rfc-editor.org/rfc/rfc1350)
    pub const TFTP: Self = Self(69);
    /// HTTP, used by eg. QUIC fallback
    pub const HTTP: Self = Self(80);
    /// [NTP](https://www.rfc-editor.org/rfc/rfc5905)
    pub const NTP: Self = Self(123);
    /// SNMP
    pub const SNMP: Self = Self(161);
    /// HTTPS, used by QUIC
    pub const HTTPS: Self = Self(443);
    /// [Syslog](https://www.rfc-editor.org/rfc/rfc5426)
    pub const SYSLOG: Self = Self(514);

    const REGISTERED_START: u16 = 1024;
    const DYNAMIC_START: u16 = 49152;

    /// Creates a port from its numeric value
    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// The numeric value of the port
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Reads a port from the first 2 bytes of `bytes`, in network order
    ///
    /// # Errors
    ///
    /// Fewer than 2 bytes were supplied
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PortError> {
        read_u16(bytes).map(Self)
    }

    /// The port in network order
    #[inline]
    pub const fn serialize(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// True for ports below 1024
    #[inline]
    pub const fn is_well_known(self) -> bool {
        self.0 < Self::REGISTERED_START
    }

    /// True for ports in `[1024, 49152)`
    #[inline]
    pub const fn is_registered(self) -> bool {
        self.0 >= Self::REGISTERED_START && self.0 < Self::DYNAMIC_START
    }

    /// True for ports of 49152 and above
    #[inline]
    pub const fn is_dynamic(self) -> bool {
        self.0 >= Self::DYNAMIC_START
    }

    /// The sub-range this port belongs to
    #[inline]
    pub const fn class(self) -> PortClass {
        if self.is_well_known() {
            PortClass::WellKnown
        } else if self.is_registered() {
            PortClass::Registered
        } else {
            PortClass::Dynamic
        }
    }
}

impl From<u16> for Port {
    #[inline]
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Port> for u16 {
    #[inline]
    fn from(port: Port) -> Self {
        port.0
    }
}

impl fmt::Debug for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The length in bytes of a datagram, header included
///
/// A length is never smaller than the 8 byte header
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Length(u16);

impl Length {
    /// The smallest valid length, a datagram with an empty payload
    pub const MIN: u16 = Header::LEN as u16;

    /// Creates a length, validating that it can hold at least a header
    ///
    /// # Errors
    ///
    /// `raw` is less than [`Self::MIN`]
    #[inline]
    pub fn new(raw: u16) -> Result<Self, LengthError> {
        if raw < Self::MIN {
            return Err(LengthError::TooShort(raw));
        }

        Ok(Self(raw))
    }

    /// Reads a length from the first 2 bytes of `bytes`, in network order
    ///
    /// # Errors
    ///
    /// - Fewer than 2 bytes were supplied
    /// - The value read is less than [`Self::MIN`]
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LengthError> {
        Self::new(read_u16(bytes)?)
    }

    /// The total length, header included
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// The length of the data payload
    #[inline]
    pub const fn data(self) -> u16 {
        self.0 - Self::MIN
    }

    /// The length in network order
    #[inline]
    pub const fn serialize(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl TryFrom<u16> for Length {
    type Error = LengthError;

    #[inline]
    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<Length> for u16 {
    #[inline]
    fn from(length: Length) -> Self {
        length.0
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The [checksum](https://en.wikipedia.org/wiki/Internet_checksum) of a datagram
///
/// A value of 0 means the sender did not calculate a checksum. A calculated
/// checksum is never 0, see [`csum::compute`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Checksum(u16);

impl Checksum {
    /// No checksum was calculated
    pub const ABSENT: Self = Self(0);

    /// Creates a checksum from its numeric value
    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// The numeric value of the checksum
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// True if no checksum was calculated by the sender
    #[inline]
    pub const fn is_absent(self) -> bool {
        self.0 == 0
    }

    /// Reads a checksum from the first 2 bytes of `bytes`, in network order
    ///
    /// # Errors
    ///
    /// Fewer than 2 bytes were supplied
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ChecksumError> {
        read_u16(bytes).map(Self)
    }

    /// The checksum in network order
    #[inline]
    pub const fn serialize(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Calculates the checksum over the serialized pseudo header, the
    /// serialized header with its checksum field set to 0, and the data
    #[inline]
    pub fn compute(
        pseudo: impl AsRef<[u8]>,
        header: impl AsRef<[u8]>,
        data: impl AsRef<[u8]>,
    ) -> Self {
        Self(csum::compute(pseudo.as_ref(), header.as_ref(), data.as_ref()))
    }

    /// Checks the checksum field contained in the serialized `header`
    ///
    /// This does not special case an absent checksum, see [`Self::is_absent`]
    #[inline]
    pub fn verify(
        pseudo: impl AsRef<[u8]>,
        header: impl AsRef<[u8]>,
        data: impl AsRef<[u8]>,
    ) -> bool {
        csum::verify(pseudo.as_ref(), header.as_ref(), data.as_ref())
    }
}

impl From<u16> for Checksum {
    #[inline]
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

/// The [IPv4 pseudo header](https://en.wikipedia.org/wiki/User_Datagram_Protocol#IPv4_pseudo_header)
///
/// This is never transmitted, it is only ever fed into a checksum calculation.
///
/// ```text
/// +--------+--------+--------+--------+
/// |          Source Address           |
/// +--------+--------+--------+--------+
/// |        Destination Address        |
/// +--------+--------+--------+--------+
/// |  Zero  |Protocol|   UDP Length    |
/// +--------+--------+--------+--------+
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PseudoHeader {
    /// The source IP
    pub source: Ipv4Addr,
    /// The destination IP
    pub destination: Ipv4Addr,
    /// The total length of the datagram being checksummed, header included.
    ///
    /// This must match the datagram, it is not validated
    pub length: u16,
}

impl PseudoHeader {
    /// The length in bytes of the serialized pseudo header
    pub const LEN: usize = 12;

    /// Creates a new [`Self`]
    #[inline]
    pub const fn new(source: Ipv4Addr, destination: Ipv4Addr, length: u16) -> Self {
        Self {
            source,
            destination,
            length,
        }
    }

    /// Creates a new [`Self`] with the length taken from `datagram`
    #[inline]
    pub fn for_datagram(
        source: Ipv4Addr,
        destination: Ipv4Addr,
        datagram: &super::Datagram,
    ) -> Self {
        Self::new(source, destination, datagram.header().length.raw())
    }

    /// The pseudo header as it is summed
    #[inline]
    pub fn serialize(&self) -> [u8; Self::LEN] {
        let mut bytes = [0u8; Self::LEN];
        bytes[0..4].copy_from_slice(&self.source.octets());
        bytes[4..8].copy_from_slice(&self.destination.octets());
        bytes[9] = PROTOCOL_NUMBER;
        bytes[10..12].copy_from_slice(&self.length.to_be_bytes());
        bytes
    }
}

/// The [UDP](https://en.wikipedia.org/wiki/User_Datagram_Protocol) header
///
/// ```text
///  0      7 8     15 16    23 24    31
/// +--------+--------+--------+--------+
/// |     Source      |   Destination   |
/// |      Port       |      Port       |
/// +--------+--------+--------+--------+
/// |                 |                 |
/// |     Length      |    Checksum     |
/// +--------+--------+--------+--------+
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    /// The source port of the sender
    pub source: Port,
    /// The destination port
    pub destination: Port,
    /// The length of this header and the data portion following it
    pub length: Length,
    /// The checksum of the [`PseudoHeader`], this header (with the checksum
    /// field set to 0), and the data payload
    pub checksum: Checksum,
}

impl Header {
    /// The length in bytes of the serialized header
    pub const LEN: usize = 8;

    /// Creates a new [`Self`]
    #[inline]
    pub const fn new(source: Port, destination: Port, length: Length, checksum: Checksum) -> Self {
        Self {
            source,
            destination,
            length,
            checksum,
        }
    }

    /// Parses a header from the first 8 bytes of `bytes`
    ///
    /// # Errors
    ///
    /// - `bytes` is shorter than [`Self::LEN`]
    /// - One of the fields is invalid, the error names the field
    pub fn parse(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() < Self::LEN {
            return Err(HeaderError::InsufficientBytes(bytes.len()));
        }

        let source = Port::from_bytes(&bytes[0..2]).map_err(HeaderError::Source)?;
        let destination = Port::from_bytes(&bytes[2..4]).map_err(HeaderError::Destination)?;
        let length = Length::from_bytes(&bytes[4..6]).map_err(HeaderError::Length)?;
        let checksum = Checksum::from_bytes(&bytes[6..8]).map_err(HeaderError::Checksum)?;

        Ok(Self {
            source,
            destination,
            length,
            checksum,
        })
    }

    /// The header in network order
    #[inline]
    pub fn serialize(&self) -> [u8; Self::LEN] {
        let mut bytes = [0u8; Self::LEN];
        bytes[0..2].copy_from_slice(&self.source.serialize());
        bytes[2..4].copy_from_slice(&self.destination.serialize());
        bytes[4..6].copy_from_slice(&self.length.serialize());
        bytes[6..8].copy_from_slice(&self.checksum.serialize());
        bytes
    }

    /// Returns a new [`Self`] with the checksum replaced
    #[inline]
    pub fn with_checksum(&self, checksum: Checksum) -> Self {
        Self { checksum, ..*self }
    }

    /// Returns a new [`Self`] with the source and destination ports swapped
    #[inline]
    pub fn swapped(&self) -> Self {
        Self {
            source: self.destination,
            destination: self.source,
            length: self.length,
            checksum: self.checksum,
        }
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Header")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("length", &self.length)
            .field("checksum", &self.checksum)
            .finish()
    }
}
