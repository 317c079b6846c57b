//! Throughput benchmark for the parse/render round trip, grounded on the
//! teacher's `index_vs_sort` benchmark: generate a realistic dataset into a
//! temp file, then measure the operation under test with `criterion`'s
//! batched iteration so setup cost is excluded from the timed region.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tablecodec::dialect::Dialect;
use tablecodec::parser::{parse_table, ParseConfig};
use tablecodec::record_schema;
use tablecodec::render::render_table;
use tablecodec::resource::LineSource;

record_schema! {
    struct Order {
        id: i64 = "id",
        ordered_at: String = "ordered_at",
        status: String = "status",
        amount: rust_decimal::Decimal = "amount",
    }
}

struct VecLineSource(std::vec::IntoIter<std::io::Result<String>>);

impl LineSource for VecLineSource {
    fn next_line(&mut self) -> Option<std::io::Result<String>> {
        self.0.next()
    }
}

fn generate_document(rows: usize) -> String {
    let mut document = String::from("id,ordered_at,status,amount\n");
    for i in 0..rows {
        let status = match i % 3 {
            0 => "shipped",
            1 => "pending",
            _ => "processing",
        };
        let day = (i % 28) + 1;
        document.push_str(&format!("{i},2024-01-{day:02},{status},{}.50\n", i % 1000));
    }
    document
}

fn lines_of(document: &str) -> VecLineSource {
    VecLineSource(document.lines().map(|line| Ok(line.to_string())).collect::<Vec<_>>().into_iter())
}

fn bench_parse(c: &mut Criterion) {
    let document = generate_document(50_000);

    let mut group = c.benchmark_group("parse_table");
    group.bench_function("50k_rows", |b| {
        b.iter_batched(
            || lines_of(&document),
            |mut source| {
                let config = ParseConfig::default();
                let (table, dropped) = parse_table::<Order>(&mut source, &config).expect("parse");
                assert!(dropped.is_empty());
                assert_eq!(table.size(), 50_000);
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let document = generate_document(50_000);
    let (table, _) = parse_table::<Order>(&mut lines_of(&document), &ParseConfig::default()).expect("parse");
    let dialect = Dialect::new();

    let mut group = c.benchmark_group("render_table");
    group.bench_function("50k_rows", |b| {
        b.iter(|| {
            let rendered = render_table(&table, &dialect);
            assert!(!rendered.is_empty());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_parse, bench_render);
criterion_main!(benches);
