//! Errors that can occur when parsing or constructing datagrams
//!
//! Composite errors wrap the error of the field that failed rather than
//! flattening it, so the origin of a failure is always available through
//! [`std::error::Error::source`]

use std::fmt;

/// Errors that can occur when reading a 2 octet field
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// No bytes were supplied
    Empty,
    /// Only 1 of the 2 required bytes was supplied
    InsufficientBytes,
}

/// Errors that can occur when reading a [`crate::Port`]
pub type PortError = FieldError;
/// Errors that can occur when reading a [`crate::Checksum`]
pub type ChecksumError = FieldError;

impl FieldError {
    /// Gets a static string description of the error
    #[inline]
    pub fn discriminant(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::InsufficientBytes => "insufficient bytes",
        }
    }
}

impl std::error::Error for FieldError {}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("no bytes were supplied"),
            Self::InsufficientBytes => f.write_str("1 byte was supplied, 2 are required"),
        }
    }
}

/// Errors that can occur when reading or constructing a [`crate::Length`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LengthError {
    /// No bytes were supplied
    Empty,
    /// Only 1 of the 2 required bytes was supplied
    InsufficientBytes,
    /// The value is smaller than the size of the UDP header
    TooShort(u16),
}

impl LengthError {
    /// Gets a static string description of the error
    #[inline]
    pub fn discriminant(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::InsufficientBytes => "insufficient bytes",
            Self::TooShort(_) => "too short",
        }
    }
}

impl std::error::Error for LengthError {}

impl fmt::Display for LengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("no bytes were supplied"),
            Self::InsufficientBytes => f.write_str("1 byte was supplied, 2 are required"),
            Self::TooShort(len) => {
                write!(
                    f,
                    "length {len} is less than the header size of {}",
                    crate::Length::MIN
                )
            }
        }
    }
}

impl From<FieldError> for LengthError {
    #[inline]
    fn from(value: FieldError) -> Self {
        match value {
            FieldError::Empty => Self::Empty,
            FieldError::InsufficientBytes => Self::InsufficientBytes,
        }
    }
}

/// Errors that can occur when parsing a [`crate::Header`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// The buffer was smaller than the 8 byte header, contains the size of the buffer
    InsufficientBytes(usize),
    /// The source port could not be read
    Source(PortError),
    /// The destination port could not be read
    Destination(PortError),
    /// The length could not be read or was invalid
    Length(LengthError),
    /// The checksum could not be read
    Checksum(ChecksumError),
}

impl HeaderError {
    /// Gets a static string description of the error
    #[inline]
    pub fn discriminant(&self) -> &'static str {
        match self {
            Self::InsufficientBytes(_) => "insufficient bytes",
            Self::Source(_) => "source port",
            Self::Destination(_) => "destination port",
            Self::Length(_) => "length",
            Self::Checksum(_) => "checksum",
        }
    }
}

impl std::error::Error for HeaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InsufficientBytes(_) => None,
            Self::Source(err) | Self::Destination(err) | Self::Checksum(err) => Some(err),
            Self::Length(err) => Some(err),
        }
    }
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientBytes(count) => {
                write!(
                    f,
                    "{count} bytes were supplied, the header requires {}",
                    crate::Header::LEN
                )
            }
            Self::Source(err) => write!(f, "invalid source port: {err}"),
            Self::Destination(err) => write!(f, "invalid destination port: {err}"),
            Self::Length(err) => write!(f, "invalid length: {err}"),
            Self::Checksum(err) => write!(f, "invalid checksum: {err}"),
        }
    }
}

/// Errors that can occur when parsing or constructing a [`crate::Datagram`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DatagramError {
    /// The data payload would not fit in the 16-bit length field, contains the
    /// size of the payload
    DataTooLarge(usize),
    /// The length could not be constructed
    Length(LengthError),
    /// The header could not be parsed
    Header(HeaderError),
    /// The header declares more data than the buffer holds
    InsufficientData {
        /// The data length declared by the header
        expected: usize,
        /// The number of bytes following the header
        got: usize,
    },
}

impl DatagramError {
    /// Gets a static string description of the error
    #[inline]
    pub fn discriminant(&self) -> &'static str {
        match self {
            Self::DataTooLarge(_) => "data too large",
            Self::Length(_) => "length",
            Self::Header(_) => "header",
            Self::InsufficientData { .. } => "insufficient data",
        }
    }
}

impl std::error::Error for DatagramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Length(err) => Some(err),
            Self::Header(err) => Some(err),
            Self::DataTooLarge(_) | Self::InsufficientData { .. } => None,
        }
    }
}

impl fmt::Display for DatagramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataTooLarge(size) => {
                write!(
                    f,
                    "data payload of {size} bytes exceeds the maximum of {}",
                    crate::MAX_PAYLOAD
                )
            }
            Self::Length(err) => write!(f, "invalid length: {err}"),
            Self::Header(err) => write!(f, "invalid header: {err}"),
            Self::InsufficientData { expected, got } => {
                write!(
                    f,
                    "header declares {expected} bytes of data, but only {got} are available"
                )
            }
        }
    }
}

impl From<LengthError> for DatagramError {
    #[inline]
    fn from(value: LengthError) -> Self {
        Self::Length(value)
    }
}

impl From<HeaderError> for DatagramError {
    #[inline]
    fn from(value: HeaderError) -> Self {
        Self::Header(value)
    }
}
