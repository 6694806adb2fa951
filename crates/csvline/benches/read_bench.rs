use std::hint::black_box;

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use csvline::{Options, read_from_str};

fn make_csv(rows: usize, multiline: bool) -> String {
    let mut s = String::from("id;name;note\n");
    for i in 0..rows {
        if multiline && i % 10 == 0 {
            s.push_str(&format!("{i};\"name {i}\";\"first\nsecond; {i}\"\n"));
        } else {
            s.push_str(&format!("{i};\"name {i}\";plain {i}\n"));
        }
    }
    s
}

pub fn read_benchmarks(c: &mut Criterion) {
    let cases = [
        ("rows_1k", make_csv(1000, false), false),
        ("multiline_1k", make_csv(1000, true), true),
    ];
    let mut group = c.benchmark_group("read");
    for (name, csv, multiline) in &cases {
        group.throughput(Throughput::Bytes(csv.len() as u64));
        let options = || Options {
            allow_newline_in_quoted_field: *multiline,
            ..Options::default()
        };
        group.bench_function(format!("records::{name}"), |b| {
            b.iter_batched(
                options,
                |opts| black_box(read_from_str(csv, opts).count()),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("access::{name}"), |b| {
            b.iter_batched(
                options,
                |opts| {
                    let mut n = 0;
                    for rec in read_from_str(csv, opts) {
                        let rec = rec.unwrap();
                        n += rec.get("note").unwrap().map_or(0, str::len);
                    }
                    black_box(n)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, read_benchmarks);
criterion_main!(benches);
