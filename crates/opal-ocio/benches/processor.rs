//! Processor evaluation and LUT baking.
//!
//! Run with: `cargo bench -p opal-ocio`

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use opal_ocio::{
    Allocation, AllocationTransform, Baker, CdlStyle, CdlTransform, ColorSpace, Config,
    ConfigBuilder, EvalPath, GradingRgbCurveTransform, GradingStyle, RgbCurveChannel, Transform,
    TransformDirection,
};

fn config() -> Config {
    ConfigBuilder::new("bench")
        .add_colorspace(ColorSpace::builder("linear").build())
        .add_colorspace(
            ColorSpace::builder("log")
                .from_reference(
                    AllocationTransform {
                        allocation: Allocation::Lg2,
                        vars: vec![-8.0, 4.0],
                        direction: TransformDirection::Forward,
                    }
                    .into(),
                )
                .build(),
        )
        .add_colorspace(
            ColorSpace::builder("display")
                .from_reference(Transform::group(vec![
                    Transform::matrix([
                        1.45, -0.24, -0.21, 0.0, //
                        -0.08, 1.18, -0.1, 0.0, //
                        0.01, -0.01, 1.0, 0.0, //
                        0.0, 0.0, 0.0, 1.0,
                    ]),
                    Transform::exponent([1.0 / 2.4, 1.0 / 2.4, 1.0 / 2.4, 1.0]),
                ]))
                .build(),
        )
        .build()
        .expect("bench config")
}

fn pixels(n: usize) -> Vec<[f32; 4]> {
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            [t, t * 0.5, 1.0 - t, 1.0]
        })
        .collect()
}

/// Matrix plus gamma, every op with a vector kernel.
fn bench_display(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear_to_display");
    let proc = config().processor("linear", "display").expect("processor");

    for size in [1024usize, 65536] {
        group.throughput(Throughput::Elements(size as u64));
        for path in [EvalPath::Scalar, EvalPath::Simd] {
            let cpu = proc.cpu_processor(path);
            let input = pixels(size);
            group.bench_with_input(
                BenchmarkId::new(format!("{path:?}"), size),
                &input,
                |b, input| {
                    b.iter_batched_ref(
                        || input.clone(),
                        |buf| cpu.apply_rgba_buffer(black_box(buf)),
                        criterion::BatchSize::LargeInput,
                    )
                },
            );
        }
    }
    group.finish();
}

/// Log, CDL and curves: mostly scalar fallbacks.
fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("graded_log");
    let mut curves = GradingRgbCurveTransform::new(GradingStyle::Log);
    curves
        .set_curve_points(RgbCurveChannel::Master, &[0.0, 0.05, 0.5, 0.55, 1.0, 0.95])
        .expect("curve");
    let chain = Transform::group(vec![
        Transform::colorspace("linear", "log"),
        CdlTransform {
            slope: [1.1, 1.0, 0.95],
            style: CdlStyle::NoClamp,
            ..Default::default()
        }
        .into(),
        curves.into(),
    ]);
    let proc = config()
        .processor_from_transform(&chain, TransformDirection::Forward)
        .expect("processor");

    let size = 65536usize;
    let input = pixels(size);
    group.throughput(Throughput::Elements(size as u64));
    for path in [EvalPath::Scalar, EvalPath::Simd] {
        let cpu = proc.cpu_processor(path);
        group.bench_function(format!("{path:?}"), |b| {
            b.iter_batched_ref(
                || input.clone(),
                |buf| cpu.apply_rgba_buffer(black_box(buf)),
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_bake(c: &mut Criterion) {
    let config = config();
    let mut group = c.benchmark_group("bake");
    for size in [17usize, 33] {
        let mut baker = Baker::new();
        baker.set_config(&config);
        baker.set_format("resolve_cube");
        baker.set_type("3D");
        baker.set_input_space("log");
        baker.set_target_space("display");
        baker.set_cube_size(size);
        group.throughput(Throughput::Elements((size * size * size) as u64));
        group.bench_with_input(BenchmarkId::new("cube", size), &baker, |b, baker| {
            b.iter(|| baker.bake_lut().expect("bake"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_display, bench_grade, bench_bake);
criterion_main!(benches);
