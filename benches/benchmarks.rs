//! Criterion benchmarks for loghandle.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::Rng;

use loghandle::format::{format_record, Record, RecordReader};
use loghandle::handle::LogHandle;
use loghandle::types::{LogOptions, MessageLevel, OpenMode};

/// Random message texts of moderate length.
fn make_messages(count: usize) -> Vec<(MessageLevel, String)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let level = MessageLevel(rng.gen_range(0..5));
            let len = rng.gen_range(16..120);
            let text: String = (0..len)
                .map(|_| rng.gen_range(b'a'..=b'z') as char)
                .collect();
            (level, format!("{} {}", i, text))
        })
        .collect()
}

fn bench_append(c: &mut Criterion) {
    let messages = make_messages(1_000);
    let dir = tempfile::tempdir().unwrap();

    c.bench_function("append_1k_buffered", |b| {
        let path = dir.path().join("buffered.log");
        b.iter_batched(
            || LogHandle::open(&path, OpenMode::Truncate).unwrap(),
            |mut handle| {
                for (level, text) in &messages {
                    handle.add_message(*level, text).unwrap();
                }
                handle.close().unwrap();
            },
            BatchSize::PerIteration,
        );
    });

    c.bench_function("append_1k_timestamped", |b| {
        let path = dir.path().join("timestamped.log");
        let options = LogOptions::with_mode(OpenMode::Truncate).timestamps(true);
        b.iter_batched(
            || LogHandle::open_with(&path, options.clone()).unwrap(),
            |mut handle| {
                for (level, text) in &messages {
                    handle.add_message(*level, text).unwrap();
                }
                handle.close().unwrap();
            },
            BatchSize::PerIteration,
        );
    });
}

fn bench_open_close(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cycle.log");

    c.bench_function("open_close_empty", |b| {
        b.iter(|| {
            let handle = LogHandle::open(&path, OpenMode::Create).unwrap();
            handle.close().unwrap();
        });
    });
}

fn bench_read(c: &mut Criterion) {
    let messages = make_messages(10_000);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("read.log");
    let content: String = messages
        .iter()
        .map(|(level, text)| format_record(*level, text, None))
        .collect();
    std::fs::write(&path, &content).unwrap();

    c.bench_function("read_10k_records", |b| {
        b.iter(|| RecordReader::count(&path).unwrap());
    });

    c.bench_function("parse_line", |b| {
        b.iter(|| Record::parse("16/10 - 09:15:02  2 the quick brown fox"));
    });
}

criterion_group!(benches, bench_append, bench_open_close, bench_read);
criterion_main!(benches);
