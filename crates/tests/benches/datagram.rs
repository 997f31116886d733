use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tests::*;
use udpwire::{Datagram, Port, PseudoHeader};

fn generate(len: usize) -> Vec<u8> {
    const PAYLOAD: &[u8] = &[0xc0; 2048];

    test_utils::etherparse_datagram(SRC_IP, DST_IP, 8888, 54321, &PAYLOAD[..len])
}

#[inline]
fn parse(bytes: &[u8]) -> Datagram {
    Datagram::parse(bytes).unwrap()
}

#[inline]
fn reply(bytes: &[u8]) -> Vec<u8> {
    let request = Datagram::parse(bytes).unwrap();
    let reply = request.reply(request.data()).unwrap();
    let pseudo = PseudoHeader::for_datagram(DST_IP, SRC_IP, &reply);
    reply.with_checksum(&pseudo).serialize()
}

#[inline]
fn rewrite_ports(datagram: &Datagram) -> Datagram {
    datagram.with_ports(Port::new(40000), Port::new(53))
}

fn bench_datagram(c: &mut Criterion) {
    use criterion::BenchmarkId;

    let mut group = c.benchmark_group("datagram");

    for i in [0usize, 1, 10, 33, 128, 512, 1024, 1409, 2048] {
        let bytes = generate(i);
        let datagram = parse(&bytes);

        group.bench_function(BenchmarkId::new("parse", i), |b| {
            b.iter(|| parse(black_box(&bytes)));
        });
        group.bench_function(BenchmarkId::new("reply", i), |b| {
            b.iter(|| reply(black_box(&bytes)));
        });
        group.bench_function(BenchmarkId::new("rewrite ports", i), |b| {
            b.iter(|| rewrite_ports(black_box(&datagram)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_datagram);
criterion_main!(benches);
