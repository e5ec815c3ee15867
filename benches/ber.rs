//! BER encoding/decoding benchmarks.
//!
//! Covers the codec work done for every OID a query fetches: encoding the
//! GET request, decoding the agent's response and rendering its value.

use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use snmp_get::format::render;
use snmp_get::message::CommunityMessage;
use snmp_get::oid::Oid;
use snmp_get::pdu::Pdu;
use snmp_get::value::Value;
use snmp_get::varbind::VarBind;
use std::hint::black_box;

/// Common OIDs used in benchmarks
fn common_oids() -> Vec<(&'static str, Oid)> {
    vec![
        ("sysDescr", Oid::from_slice(&[1, 3, 6, 1, 2, 1, 1, 1, 0])),
        ("sysUpTime", Oid::from_slice(&[1, 3, 6, 1, 2, 1, 1, 3, 0])),
        (
            "ifPhysAddress",
            Oid::from_slice(&[1, 3, 6, 1, 2, 1, 2, 2, 1, 6, 1]),
        ),
        (
            "long_oid",
            Oid::from_slice(&[1, 3, 6, 1, 4, 1, 9, 9, 42, 1, 2, 3, 4, 5, 6, 7]),
        ),
    ]
}

fn response_values() -> Vec<(&'static str, Value)> {
    vec![
        ("integer", Value::Integer(42)),
        (
            "text",
            Value::from("Linux edge-router 5.10.0 #1 SMP x86_64"),
        ),
        (
            "binary",
            Value::OctetString(Bytes::from_static(&[0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e])),
        ),
        ("timeticks", Value::TimeTicks(8_640_100)),
        ("counter64", Value::Counter64(1 << 40)),
    ]
}

fn bench_oid_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("oid_parse");

    for (name, oid) in common_oids() {
        let text = oid.to_string();
        group.bench_with_input(BenchmarkId::new("parse", name), &text, |b, text| {
            b.iter(|| black_box(Oid::parse(text).unwrap()))
        });
    }

    group.finish();
}

/// Encoding a single-binding GET request
fn bench_request_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_encode");

    for (name, oid) in common_oids() {
        group.bench_with_input(BenchmarkId::new("v1_get", name), &oid, |b, oid| {
            b.iter(|| {
                let pdu = Pdu::with_varbinds(12345, vec![VarBind::null(oid.clone())]);
                black_box(CommunityMessage::v1(Bytes::from_static(b"public"), pdu).encode())
            })
        });
    }

    group.finish();
}

/// Decoding a response datagram
fn bench_response_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("response_decode");
    let oid = Oid::from_slice(&[1, 3, 6, 1, 2, 1, 1, 1, 0]);

    for (name, value) in response_values() {
        let pdu = Pdu {
            varbinds: vec![VarBind::new(oid.clone(), value)],
            ..Pdu::with_varbinds(12345, Vec::new()).to_response()
        };
        let data = CommunityMessage::v2c(Bytes::from_static(b"public"), pdu).encode();

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("v2c", name), &data, |b, data| {
            b.iter(|| black_box(CommunityMessage::decode(data.clone()).unwrap()))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for (name, value) in response_values() {
        group.bench_with_input(BenchmarkId::new("render", name), &value, |b, value| {
            b.iter(|| black_box(render(value)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_oid_parse,
    bench_request_encode,
    bench_response_decode,
    bench_render,
);
criterion_main!(benches);
