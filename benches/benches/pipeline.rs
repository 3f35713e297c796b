//! Whole-image coefficient computation
//!
//! Run with: cargo bench --bench pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jpegli::{
    compute_all_coefficients_parallel, compute_all_coefficients_with, generate_chroma_quant_table,
    generate_quant_table, quant_multipliers, CoefficientBuffers, ComponentInfo, ComponentParams,
    DctKernel, DctParams, ImagePlane, QuantField,
};

fn synthetic_plane(width: usize, height: usize) -> ImagePlane {
    let samples: Vec<f32> = (0..width * height)
        .map(|i| (((i % width) * 3 + (i / width) * 5 + (i * 7919) % 13) % 256) as f32)
        .collect();
    // Dimensions are non-zero and the buffer is exactly sized
    ImagePlane::from_samples(&samples, width, height).unwrap()
}

fn bench_yuv420(c: &mut Criterion) {
    let mut group = c.benchmark_group("yuv420");

    for &size in &[256usize, 512, 1024] {
        let luma = ComponentInfo::new(2, 2, 2, 2, size, size).unwrap();
        let chroma = ComponentInfo::new(1, 1, 2, 2, size, size).unwrap();
        let y = synthetic_plane(size, size);
        let cb = synthetic_plane(size / 2, size / 2);
        let cr = synthetic_plane(size / 2, size / 2);
        let luma_q = quant_multipliers(&generate_quant_table(90.0));
        let chroma_q = quant_multipliers(&generate_chroma_quant_table(90.0));
        let field = QuantField::for_components(&[luma, chroma], 0.5).unwrap();

        let params = DctParams::new(vec![
            ComponentParams::new(luma, y.as_plane_ref(), &luma_q, 0.4).unwrap(),
            ComponentParams::new(chroma, cb.as_plane_ref(), &chroma_q, 0.4).unwrap(),
            ComponentParams::new(chroma, cr.as_plane_ref(), &chroma_q, 0.4).unwrap(),
        ])
        .unwrap()
        .with_quant_field(field.as_plane_ref())
        .unwrap();

        group.throughput(Throughput::Elements((size * size) as u64));

        for kernel in DctKernel::supported() {
            let id = BenchmarkId::new(kernel.level().name(), format!("{}x{}", size, size));
            group.bench_with_input(id, &kernel, |b, kernel| {
                let mut store = CoefficientBuffers::new(&[luma, chroma, chroma]);
                b.iter(|| compute_all_coefficients_with(kernel, black_box(&params), &mut store));
            });
        }

        group.bench_function(BenchmarkId::new("parallel", format!("{}x{}", size, size)), |b| {
            b.iter(|| compute_all_coefficients_parallel(black_box(&params)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_yuv420);
criterion_main!(benches);
