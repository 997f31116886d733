//! Utilities for calculating [internet checksums](https://en.wikipedia.org/wiki/Internet_checksum)
//! over UDP datagrams
//!
//! A UDP checksum covers three separate spans, the [pseudo header](super::net_types::PseudoHeader),
//! the UDP header (with its checksum field set to 0) and the data payload.
//! The spans are summed one after the other into the same running sum, they
//! are never copied into a single buffer.

/// Adds `bytes` to a running checksum calculation, returning the new running sum
///
/// Octets are paired into big-endian 16-bit words. If `bytes` has an odd
/// length the final octet is the high octet of a word whose low octet is 0.
/// Every call pads on its own, an odd trailing octet is never paired with the
/// first octet of the next span.
#[inline]
pub fn sum_words(initial: u32, bytes: &[u8]) -> u32 {
    let mut sum = initial as u64;

    let mut words = bytes.chunks_exact(2);
    for word in &mut words {
        sum += u16::from_be_bytes([word[0], word[1]]) as u64;
    }

    if let [last] = words.remainder() {
        sum += u16::from_be_bytes([*last, 0]) as u64;
    }

    finalize(sum)
}

/// Reduces an intermediate 64-bit sum to 32-bits that can be fed into
/// further calculations
///
/// The end-around carry keeps the result congruent to `sum` in one's
/// complement arithmetic, so folding it to 16 bits afterwards gives the same
/// value as folding `sum` directly.
#[inline]
pub fn finalize(mut sum: u64) -> u32 {
    while sum > u32::MAX as u64 {
        sum = (sum & 0xffff_ffff) + (sum >> 32);
    }

    sum as u32
}

/// Folds the carries of a running sum back into the low 16 bits
///
/// A single fold is not enough, adding the carry can itself carry again, eg.
/// `0x1ffff` -> `0x10000` -> `0x0001`
#[inline]
pub fn fold(mut sum: u32) -> u16 {
    while sum > 0xffff {
        sum = (sum & 0xffff) + (sum >> 16);
    }

    sum as u16
}

/// Calculates the checksum of the pseudo header, UDP header and data payload
///
/// The header's checksum field must already be 0. A result of 0 is returned
/// as `0xffff`, as a transmitted value of 0 means no checksum was calculated.
#[inline]
pub fn compute(pseudo: &[u8], header: &[u8], data: &[u8]) -> u16 {
    let sum = sum_words(sum_words(sum_words(0, pseudo), header), data);

    match !fold(sum) {
        0 => 0xffff,
        csum => csum,
    }
}

/// Checks a received checksum
///
/// `header` includes the checksum field as it was transmitted. Summing a
/// correctly checksummed region, checksum included, always folds to `0xffff`.
///
/// A transmitted checksum of 0 means none was calculated, that case must be
/// handled by the caller before calling this.
#[inline]
pub fn verify(pseudo: &[u8], header: &[u8], data: &[u8]) -> bool {
    fold(sum_words(sum_words(sum_words(0, pseudo), header), data)) == 0xffff
}

/// Updates an existing checksum after `old` bytes in the checksummed region
/// were replaced with `new` bytes, without recalculating the whole checksum
///
/// This is [RFC 1624](https://www.rfc-editor.org/rfc/rfc1624) equation 3,
/// `HC' = ~(~HC + ~m + m')`. `old` and `new` must have the same length and
/// start on the same word boundary.
#[inline]
pub fn adjust(checksum: u16, old: &[u8], new: &[u8]) -> u16 {
    debug_assert_eq!(old.len(), new.len());

    let removed = !fold(sum_words(0, old));
    let sum = sum_words(!checksum as u32 + removed as u32, new);

    match !fold(sum) {
        0 => 0xffff,
        csum => csum,
    }
}
