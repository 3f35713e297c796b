//! Per-block kernels at every SIMD level available on this machine
//!
//! Run with: cargo bench --bench dct_performance

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jpegli_dct::{forward_dct_1d, generate_quant_table, quant_multipliers, reference_dct8x8, DctKernel};

fn test_block() -> [f32; 64] {
    core::array::from_fn(|i| ((i * 37 + 11) % 256) as f32)
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("dct_8x8");
    let input = test_block();

    group.bench_function("reference", |b| {
        let mut output = [0.0f32; 64];
        b.iter(|| reference_dct8x8(black_box(&input), black_box(&mut output)));
    });

    for kernel in DctKernel::supported() {
        group.bench_with_input(BenchmarkId::new("aan", kernel.level()), &kernel, |b, kernel| {
            b.iter(|| kernel.transform_block(black_box(&input), 8));
        });
    }

    group.finish();
}

fn bench_dct_1d(c: &mut Criterion) {
    let mut group = c.benchmark_group("dct_1d");
    for size in [4usize, 8, 16] {
        let input: Vec<f32> = (0..size).map(|i| i as f32 * 3.0).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            let mut values = input.clone();
            b.iter(|| {
                values.copy_from_slice(input);
                forward_dct_1d(black_box(&mut values));
            });
        });
    }
    group.finish();
}

fn bench_quantize(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize");
    let qmc = quant_multipliers(&generate_quant_table(90.0));

    for kernel in DctKernel::supported() {
        let dct = kernel.transform_block(&test_block(), 8);
        group.bench_with_input(BenchmarkId::new("dead_zone", kernel.level()), &kernel, |b, kernel| {
            b.iter(|| kernel.quantize_block(black_box(&dct), &qmc, black_box(0.9)));
        });
        group.bench_with_input(BenchmarkId::new("plain", kernel.level()), &kernel, |b, kernel| {
            b.iter(|| kernel.quantize_block_no_aq(black_box(&dct), &qmc));
        });
    }

    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose_8x8");
    let input = test_block();

    for kernel in DctKernel::supported() {
        group.bench_with_input(BenchmarkId::from_parameter(kernel.level()), &kernel, |b, kernel| {
            let mut output = [0.0f32; 64];
            b.iter(|| kernel.transpose8x8(black_box(&input), black_box(&mut output)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transform, bench_dct_1d, bench_quantize, bench_transpose);
criterion_main!(benches);
