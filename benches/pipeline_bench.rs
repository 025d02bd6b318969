use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use huffpar::{compress, Backend, PipelineConfig};

fn sample_text(len: usize) -> Vec<u8> {
    let words = [
        "in", "the", "beginning", "was", "word", "and", "light", "darkness", "upon", "face",
        "of", "deep", "waters", "spirit", "moved",
    ];
    let mut out = Vec::with_capacity(len + 16);
    let mut i = 0usize;
    while out.len() < len {
        out.extend_from_slice(words[(i * 7 + i / 3) % words.len()].as_bytes());
        out.push(if i % 11 == 10 { b'\n' } else { b' ' });
        i += 1;
    }
    out.truncate(len);
    out
}

fn bench_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress_1mb");
    let input = sample_text(1 << 20);
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("seq", |b| {
        b.iter(|| compress(black_box(&input), &PipelineConfig::sequential()).unwrap())
    });

    for backend in [Backend::Threads, Backend::Pool] {
        for nw in [2, 4, 8] {
            let config = PipelineConfig::new(backend, nw);
            group.bench_with_input(BenchmarkId::new(backend.name(), nw), &config, |b, cfg| {
                b.iter(|| compress(black_box(&input), cfg).unwrap())
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_backends);
criterion_main!(benches);
