//! Utilities for [`Datagram`] construction, parsing and checksumming

pub mod csum;
pub mod net_types;

use crate::error::DatagramError;
use net_types::{Checksum, Header, Length, Port, PseudoHeader};
use std::{fmt, net::Ipv4Addr};

/// A UDP datagram, a [`Header`] followed by a data payload
///
/// ```text
/// ┌────────┌──────────────────────┐
/// │udp     │data...               │
/// └────────└──────────────────────┘
/// ▲        ▲                      ▲
/// │        │                      │
/// 0        +8                     length
/// ```
///
/// The header's length always matches the payload, which is why the fields are
/// not public. Operations that change the datagram return a new [`Self`]
/// instead of modifying it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Datagram {
    header: Header,
    data: Vec<u8>,
}

impl Datagram {
    /// Creates a new datagram with the length calculated from `data`
    ///
    /// # Errors
    ///
    /// `data` is larger than [`net_types::MAX_PAYLOAD`]
    pub fn create(
        source: Port,
        destination: Port,
        data: impl Into<Vec<u8>>,
        checksum: Checksum,
    ) -> Result<Self, DatagramError> {
        let data = data.into();

        let total = Header::LEN + data.len();
        if total > u16::MAX as usize {
            return Err(DatagramError::DataTooLarge(data.len()));
        }

        let length = Length::new(total as u16)?;

        Ok(Self {
            header: Header::new(source, destination, length, checksum),
            data,
        })
    }

    /// Creates a new datagram without a checksum, see [`Self::with_checksum`]
    ///
    /// # Errors
    ///
    /// `data` is larger than [`net_types::MAX_PAYLOAD`]
    #[inline]
    pub fn new(
        source: Port,
        destination: Port,
        data: impl Into<Vec<u8>>,
    ) -> Result<Self, DatagramError> {
        Self::create(source, destination, data, Checksum::ABSENT)
    }

    /// Parses a datagram from `bytes`
    ///
    /// The length in the header determines the size of the payload, any bytes
    /// following it are ignored.
    ///
    /// # Errors
    ///
    /// - The header could not be parsed
    /// - `bytes` does not hold as much data as the header declares
    pub fn parse(bytes: &[u8]) -> Result<Self, DatagramError> {
        let header = Header::parse(bytes)?;

        let expected = header.length.data() as usize;
        let rest = &bytes[Header::LEN..];
        if rest.len() < expected {
            return Err(DatagramError::InsufficientData {
                expected,
                got: rest.len(),
            });
        }

        if rest.len() > expected {
            log::trace!(
                "ignoring {} bytes following datagram of length {}",
                rest.len() - expected,
                header.length
            );
        }

        Ok(Self {
            header,
            data: rest[..expected].to_vec(),
        })
    }

    /// Returns a copy of this datagram with the checksum calculated
    ///
    /// The length of `pseudo` must be the length of this datagram, see
    /// [`PseudoHeader::for_datagram`]
    pub fn with_checksum(&self, pseudo: &PseudoHeader) -> Self {
        let zeroed = self.header.with_checksum(Checksum::ABSENT);
        let checksum = Checksum::compute(pseudo.serialize(), zeroed.serialize(), &self.data);

        log::trace!(
            "checksum {checksum} for {} -> {} ({} bytes)",
            self.header.source,
            self.header.destination,
            self.header.length
        );

        Self {
            header: self.header.with_checksum(checksum),
            data: self.data.clone(),
        }
    }

    /// Checks the checksum of this datagram
    ///
    /// Always true if the sender did not calculate a checksum
    pub fn verify_checksum(&self, pseudo: &PseudoHeader) -> bool {
        if self.header.checksum.is_absent() {
            return true;
        }

        let valid = Checksum::verify(pseudo.serialize(), self.header.serialize(), &self.data);
        if !valid {
            log::debug!(
                "checksum {} failed verification for {} -> {} ({} bytes)",
                self.header.checksum,
                self.header.source,
                self.header.destination,
                self.header.length
            );
        }

        valid
    }

    /// Returns a copy of this datagram with the ports replaced
    ///
    /// If a checksum is present it is adjusted for the new ports without
    /// summing the payload again
    pub fn with_ports(&self, source: Port, destination: Port) -> Self {
        let header = Header {
            source,
            destination,
            ..self.header
        };

        let header = if self.header.checksum.is_absent() {
            header
        } else {
            let old = self.header.serialize();
            let new = header.serialize();
            header.with_checksum(Checksum::new(csum::adjust(
                self.header.checksum.raw(),
                &old[..4],
                &new[..4],
            )))
        };

        Self {
            header,
            data: self.data.clone(),
        }
    }

    /// Creates a new datagram, without a checksum, sent back to the source
    /// of this one
    ///
    /// # Errors
    ///
    /// `data` is larger than [`net_types::MAX_PAYLOAD`]
    #[inline]
    pub fn reply(&self, data: impl Into<Vec<u8>>) -> Result<Self, DatagramError> {
        let header = self.header.swapped();
        Self::new(header.source, header.destination, data)
    }

    /// The datagram in network order
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.total_len());
        bytes.extend_from_slice(&self.header.serialize());
        bytes.extend_from_slice(&self.data);
        bytes
    }

    /// Writes the datagram in network order to `writer`
    ///
    /// # Errors
    ///
    /// The writer failed
    pub fn write_to<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.header.serialize())?;
        writer.write_all(&self.data)
    }

    /// The header
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The source port
    #[inline]
    pub fn source(&self) -> Port {
        self.header.source
    }

    /// The destination port
    #[inline]
    pub fn destination(&self) -> Port {
        self.header.destination
    }

    /// The checksum
    #[inline]
    pub fn checksum(&self) -> Checksum {
        self.header.checksum
    }

    /// The data payload
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The total length in bytes, header included
    #[inline]
    pub fn total_len(&self) -> usize {
        self.header.length.raw() as usize
    }

    /// Consumes the datagram, returning its data payload
    #[inline]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Consumes the datagram, returning its header and data payload
    #[inline]
    pub fn into_parts(self) -> (Header, Vec<u8>) {
        (self.header, self.data)
    }
}

impl fmt::Debug for Datagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Datagram")
            .field("header", &self.header)
            .field("data_length", &self.data.len())
            .finish_non_exhaustive()
    }
}

/// Builder for a [`Datagram`]
///
/// ```
/// let datagram = udpwire::DatagramBuilder {
///     destination: udpwire::Port::DNS,
///     payload: b"query".to_vec(),
///     addresses: Some(([192, 168, 1, 2].into(), [192, 168, 1, 1].into())),
///     ..Default::default()
/// }
/// .build()
/// .expect("failed to build datagram");
///
/// assert!(!datagram.checksum().is_absent());
/// ```
#[derive(Clone, Default, Debug)]
pub struct DatagramBuilder {
    /// The source port
    pub source: Port,
    /// The destination port
    pub destination: Port,
    /// The data payload
    pub payload: Vec<u8>,
    /// The source and destination IPs. If set, the checksum is calculated,
    /// otherwise the datagram is built without one.
    pub addresses: Option<(Ipv4Addr, Ipv4Addr)>,
}

impl DatagramBuilder {
    /// Builds the [`Datagram`]
    ///
    /// # Errors
    ///
    /// The payload is larger than [`net_types::MAX_PAYLOAD`]
    pub fn build(self) -> Result<Datagram, DatagramError> {
        let datagram = Datagram::new(self.source, self.destination, self.payload)?;

        let Some((source, destination)) = self.addresses else {
            return Ok(datagram);
        };

        let pseudo = PseudoHeader::for_datagram(source, destination, &datagram);
        Ok(datagram.with_checksum(&pseudo))
    }
}
