use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use datum_metadata::{DatumMetadata, InfoMap, InfoValue};

fn metadata(size: usize) -> DatumMetadata {
    let mut metadata = DatumMetadata::new();
    for i in 0..size {
        metadata.put_info_value(&format!("key{i}"), Some(InfoValue::from(i as u64)));
        metadata.put_property_info_value(&format!("property{i}"), "unit", Some("W".into()));
        let mut nested = InfoMap::new();
        nested.insert("ratio".to_string(), InfoValue::decimal("0.125").unwrap());
        metadata.put_info_value(&format!("nested{i}"), Some(nested.into()));
        metadata.add_tag(format!("tag{i}"));
    }
    metadata
}

fn codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    for size in [8, 64, 512].iter() {
        let metadata = metadata(*size);
        let json = metadata.to_json();
        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_function(BenchmarkId::new("encode", size), |b| {
            b.iter(|| metadata.to_json());
        });
        group.bench_function(BenchmarkId::new("decode", size), |b| {
            b.iter(|| DatumMetadata::from_json(&json).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, codec);
criterion_main!(benches);
