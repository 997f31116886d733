use std::net::Ipv4Addr;
use tests::*;
use udpwire::{Checksum, Datagram, Header, Length, Port, PseudoHeader, csum};

fn spans(len: usize) -> ([u8; PseudoHeader::LEN], [u8; Header::LEN]) {
    let total = (Header::LEN + len) as u16;
    let pseudo = PseudoHeader::new(SRC_IP, DST_IP, total);
    let header = Header::new(
        Port::new(9000),
        Port::new(10001),
        Length::new(total).unwrap(),
        Checksum::ABSENT,
    );

    (pseudo.serialize(), header.serialize())
}

/// Ensures we generate the same datagram, checksum included, as etherparse
#[test]
fn checksums_match_etherparse() {
    test_utils::init_logger();

    for data in [SMALL_DATA, ODD_DATA, LARGER, &[]] {
        let expected = test_utils::etherparse_datagram(SRC_IP, DST_IP, 9000, 10001, data);

        let datagram = Datagram::new(Port::new(9000), Port::new(10001), data).unwrap();
        let pseudo = PseudoHeader::for_datagram(SRC_IP, DST_IP, &datagram);
        let datagram = datagram.with_checksum(&pseudo);

        assert_eq!(datagram.serialize(), expected, "payload of {}", data.len());
        assert!(datagram.verify_checksum(&pseudo));
    }
}

/// Ensures every payload size, odd and even, matches an independent implementation
#[test]
fn checksum_sizes() {
    const LEN: usize = 2048;
    let mut v = [0u8; LEN];

    let mut mismatches = 0;
    for i in 1..LEN {
        v[i] = (i & 0xff) as u8;

        let block = &v[..i];
        let (pseudo, header) = spans(block.len());

        let external = reference_checksum(&pseudo, &header, block);
        let ours = csum::compute(&pseudo, &header, block);

        if external != ours {
            eprintln!("{i} expected: {external:04x}, actual: {ours:04x}");
            mismatches += 1;
        }

        let external = u16::from_be_bytes(internet_checksum::checksum(block));
        let ours = !csum::fold(csum::sum_words(0, block));

        if external != ours {
            eprintln!("{i} (single span) expected: {external:04x}, actual: {ours:04x}");
            mismatches += 1;
        }
    }

    assert_eq!(mismatches, 0);
}

/// A maximum size payload of `0xff` carries out of the low 16 bits many times
#[test]
fn maximum_payload_carries() {
    let data = vec![0xff; udpwire::MAX_PAYLOAD];
    let (pseudo, header) = spans(data.len());

    let sum = csum::sum_words(csum::sum_words(csum::sum_words(0, &pseudo), &header), &data);
    assert!(sum > 0x1_ffff);

    assert_eq!(
        csum::compute(&pseudo, &header, &data),
        reference_checksum(&pseudo, &header, &data)
    );
}

/// The sum of the words is `0x1ffff`, folding once leaves `0x10000`, which
/// would truncate to a checksum of `0xffff` instead of the correct `0xfffe`
#[test]
fn folds_twice() {
    let pseudo = [0xff, 0xff];
    let header = [0xff, 0xff];
    let data = [0x00, 0x01];

    assert_eq!(csum::compute(&pseudo, &header, &data), 0xfffe);
    assert_eq!(Checksum::compute(pseudo, header, data).raw(), 0xfffe);
}

/// A checksum that calculates to 0 must be sent as `0xffff`
#[test]
fn zero_is_all_ones() {
    const ZERO: Ipv4Addr = Ipv4Addr::UNSPECIFIED;

    // pseudo header and header sum to 0x0025, the payload supplies the rest of 0xffff
    let datagram = Datagram::new(Port::new(0), Port::new(0), [0xff, 0xda]).unwrap();
    let pseudo = PseudoHeader::for_datagram(ZERO, ZERO, &datagram);

    let datagram = datagram.with_checksum(&pseudo);
    assert_eq!(datagram.checksum().raw(), 0xffff);
    assert!(!datagram.checksum().is_absent());
    assert!(datagram.verify_checksum(&pseudo));
}

#[test]
fn compute_is_deterministic() {
    let (pseudo, header) = spans(LARGER.len());

    let first = Checksum::compute(pseudo, header, LARGER);
    let second = Checksum::compute(pseudo, header, LARGER);
    assert_eq!(first, second);
}

/// Each span is padded on its own, an odd byte is not paired across spans
#[test]
fn spans_are_padded_independently() {
    // 0x0100 + 0x0200, rather than the 0x0102 a contiguous buffer would sum to
    assert_eq!(csum::compute(&[0x01], &[0x02], &[]), !0x0300);
    assert_ne!(
        csum::compute(&[0x01], &[0x02], &[]),
        u16::from_be_bytes(internet_checksum::checksum(&[0x01, 0x02]))
    );
}

#[test]
fn verify_detects_corruption() {
    let datagram = Datagram::new(Port::new(5353), Port::DNS, SMALL_DATA).unwrap();
    let pseudo = PseudoHeader::for_datagram(SRC_IP, DST_IP, &datagram);
    let bytes = datagram.with_checksum(&pseudo).serialize();
    let pseudo = pseudo.serialize();

    assert!(Checksum::verify(pseudo, &bytes[..Header::LEN], &bytes[Header::LEN..]));

    for i in 0..bytes.len() {
        let mut corrupt = bytes.clone();
        corrupt[i] ^= 0x10;

        assert!(
            !Checksum::verify(pseudo, &corrupt[..Header::LEN], &corrupt[Header::LEN..]),
            "corruption of byte {i} was not detected"
        );
    }

    // the checksum covers the addresses even though they are never transmitted
    let wrong = PseudoHeader::new(Ipv4Addr::new(10, 0, 0, 1), DST_IP, bytes.len() as u16);
    assert!(!Checksum::verify(
        wrong.serialize(),
        &bytes[..Header::LEN],
        &bytes[Header::LEN..]
    ));
}

#[test]
fn absent_checksum_is_not_verified() {
    let datagram = Datagram::new(Port::new(5353), Port::DNS, SMALL_DATA).unwrap();
    let unrelated = PseudoHeader::new(Ipv4Addr::LOCALHOST, Ipv4Addr::BROADCAST, 1);

    assert!(datagram.checksum().is_absent());
    assert!(datagram.verify_checksum(&unrelated));
}

/// Ensures adjusting a checksum for new ports gives the same result as
/// calculating it from scratch
#[test]
fn adjusts_for_new_ports() {
    test_utils::init_logger();

    let original = Datagram::new(Port::new(40000), Port::DNS, LARGER).unwrap();
    let pseudo = PseudoHeader::for_datagram(SRC_IP, DST_IP, &original);
    let original = original.with_checksum(&pseudo);

    for (source, destination) in [
        (0, 0),
        (1, 53),
        (12345, 53),
        (40000, 5353),
        (u16::MAX, u16::MAX),
        (0xff00, 0x00ff),
    ] {
        let (source, destination) = (Port::new(source), Port::new(destination));

        let adjusted = original.with_ports(source, destination);
        let expected = Datagram::new(source, destination, LARGER)
            .unwrap()
            .with_checksum(&pseudo);

        assert_eq!(adjusted, expected, "{source} -> {destination}");
        assert!(adjusted.verify_checksum(&pseudo));
    }

    let unchecked = Datagram::new(Port::new(40000), Port::DNS, LARGER).unwrap();
    assert!(
        unchecked
            .with_ports(Port::new(1), Port::new(2))
            .checksum()
            .is_absent()
    );
}
