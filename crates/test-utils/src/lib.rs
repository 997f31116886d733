pub use etherparse;

use std::net::Ipv4Addr;

static LOGGER: std::sync::Once = std::sync::Once::new();

/// The IPv4 header etherparse writes in front of the UDP datagram, no options
const IPV4_HEADER_LEN: usize = 20;

/// Initializes logging for the test binary, can be called from every test
pub fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::builder().is_test(true).init();
    });
}

/// Builds a checksummed UDP datagram with etherparse, used as the reference
/// our own serialization is compared to
pub fn etherparse_datagram(
    source: Ipv4Addr,
    destination: Ipv4Addr,
    source_port: u16,
    destination_port: u16,
    payload: &[u8],
) -> Vec<u8> {
    let mut packet = Vec::with_capacity(IPV4_HEADER_LEN + udpwire::Header::LEN + payload.len());

    etherparse::PacketBuilder::ipv4(source.octets(), destination.octets(), 64)
        .udp(source_port, destination_port)
        .write(&mut packet, payload)
        .expect("failed to build packet");

    packet.split_off(IPV4_HEADER_LEN)
}

/// Parses a UDP header with etherparse, converted to our [`udpwire::Header`]
pub fn etherparse_header(bytes: &[u8]) -> udpwire::Header {
    let (udp, _rest) =
        etherparse::UdpHeader::from_slice(bytes).expect("failed to parse UDP header");

    udpwire::Header::new(
        udp.source_port.into(),
        udp.destination_port.into(),
        udpwire::Length::new(udp.length).expect("etherparse accepted an invalid length"),
        udp.checksum.into(),
    )
}

