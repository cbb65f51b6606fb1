//! Benchmarks for cell buffer row copies, the hot path of compositing.
//!
//! Run with: cargo bench -p twin-render --bench cell_buffer_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use twin_render::buffer::CellBuffer;
use twin_render::cell::{Attr, Cell};

fn bench_copy_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("cell_buffer/copy_row");
    for (w, h) in [(80, 25), (132, 50), (240, 80)] {
        group.throughput(Throughput::Elements(w as u64 * h as u64));
        let row = vec![Cell::new('x', Attr(0x1E)); w as usize];
        let mut buf = CellBuffer::new(w, h);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{w}x{h}")), &row, |b, row| {
            b.iter(|| {
                for y in 0..h {
                    buf.copy_row_from(0, y, black_box(row));
                }
                black_box(&buf);
            });
        });
    }
    group.finish();
}

fn bench_try_new(c: &mut Criterion) {
    c.bench_function("cell_buffer/try_new_80x25", |b| {
        b.iter(|| black_box(CellBuffer::try_new(80, 25)))
    });
}

criterion_group!(benches, bench_copy_rows, bench_try_new);
criterion_main!(benches);
