//! Transform throughput benchmarks
//!
//! Measures mapping of OAI-PMH style feeds with varying:
//! - Record counts (1, 10, 100, 1000)
//! - Specification shapes (flat leaves, repeatable rescope)
//! - Empty value filtering (on, off)
//!
//! Run benchmarks: `cargo bench --bench transform_throughput`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::fmt::Write;
use xmlmap::{Namespaces, Specification, Transformer, XmlDocument};

const OAI_NS: &str = "http://www.openarchives.org/OAI/2.0/";

/// Generate a feed with `count` records of three constituents each
fn generate_feed(count: usize) -> String {
    let mut xml = format!(r#"<OAI-PMH xmlns="{}"><ListRecords>"#, OAI_NS);
    for i in 0..count {
        let _ = write!(
            xml,
            r#"<record><header><identifier>{i}</identifier></header><metadata>
<location><country>Country {i}</country><city>City {i}</city></location>
<constituent yeardied="1669">Rembrandt</constituent>
<constituent yeardied="1884">Johannes Mock</constituent>
<constituent yeardied="1775">Georg Friedrich Schmidt</constituent>
</metadata></record>"#
        );
    }
    xml.push_str("</ListRecords></OAI-PMH>");
    xml
}

fn flat_mapping() -> Value {
    json!({
        "id": { "path": ".//oai:identifier/text()" },
        "location": {
            "country": { "path": ".//oai:location/oai:country/text()" },
            "city": { "path": ".//oai:location/oai:city/text()" }
        }
    })
}

fn nested_mapping() -> Value {
    json!({
        "id": { "path": ".//oai:identifier/text()" },
        "constituent": {
            "context": ".//oai:constituent",
            "repeatable": true,
            "values": {
                "name": { "path": "text()" },
                "death_date": { "path": "@yeardied" }
            }
        }
    })
}

fn transformer(mapping: &Value) -> Transformer<'static> {
    let spec = Specification::from_value(mapping).expect("Benchmark mapping is valid");
    Transformer::new(spec, "//oai:record", Namespaces::new().with("oai", OAI_NS))
}

/// Benchmark transform throughput with varying record counts, parse included
fn benchmark_record_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_count");

    for count in [1, 10, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        let feed = generate_feed(count);
        let mut t = transformer(&flat_mapping());
        t.bind_str(feed);

        group.bench_with_input(BenchmarkId::new("records", count), &count, |b, _| {
            b.iter(|| t.transform_all().expect("Failed to transform"));
        });
    }

    group.finish();
}

/// Benchmark specification shapes against an already parsed document
fn benchmark_spec_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("spec_shape");
    let record_count = 100;
    let feed = generate_feed(record_count);
    let doc = XmlDocument::parse(&feed).expect("Benchmark feed is well-formed");
    group.throughput(Throughput::Elements(record_count as u64));

    for (name, mapping) in [("flat", flat_mapping()), ("nested", nested_mapping())] {
        for filter in [false, true] {
            let mut t = transformer(&mapping);
            t.bind_document(&doc).set_filter_empty(filter);
            let id = format!("{}/filter={}", name, filter);
            group.bench_function(BenchmarkId::from_parameter(id), |b| {
                b.iter(|| t.transform_all().expect("Failed to transform"));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_record_counts, benchmark_spec_shapes);
criterion_main!(benches);
