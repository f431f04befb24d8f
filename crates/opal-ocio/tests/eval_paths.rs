//! Scalar and SIMD evaluation agree.

use approx::assert_abs_diff_eq;
use opal_ocio::{
    Allocation, AllocationTransform, CdlStyle, CdlTransform, Config, CpuProcessor, EvalPath,
    FixedFunctionStyle, FixedFunctionTransform, Matrix44, Processor, RangeStyle, RangeTransform,
    Transform, TransformDirection,
};

const EPSILON: f32 = 1e-4;

fn mixed_chain() -> Processor {
    let chain = Transform::group(vec![
        Transform::matrix_with_offset(
            [
                0.9, 0.05, 0.05, 0.0, //
                0.1, 0.8, 0.1, 0.0, //
                0.0, 0.1, 0.9, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
            [0.01, 0.0, 0.02, 0.0],
        ),
        Transform::exponent([2.2, 2.0, 1.8, 1.0]),
        CdlTransform {
            slope: [1.2, 1.0, 0.8],
            power: [0.9, 1.0, 1.1],
            saturation: 0.8,
            style: CdlStyle::AscCdl,
            ..Default::default()
        }
        .into(),
        AllocationTransform {
            allocation: Allocation::Lg2,
            vars: vec![-10.0, 6.0],
            direction: TransformDirection::Forward,
        }
        .into(),
        RangeTransform {
            min_in: Some(0.1),
            max_in: Some(0.9),
            min_out: Some(0.0),
            max_out: Some(1.0),
            style: RangeStyle::Clamp,
            direction: TransformDirection::Forward,
        }
        .into(),
        FixedFunctionTransform {
            style: FixedFunctionStyle::XyzToXyy,
            direction: TransformDirection::Forward,
        }
        .into(),
    ]);
    Config::new("paths")
        .processor_from_transform(&chain, TransformDirection::Forward)
        .unwrap()
}

/// Odd length so the SIMD path has a scalar tail.
fn ramp(len: usize) -> Vec<[f32; 4]> {
    (0..len)
        .map(|i| {
            let t = (i as f32 + 0.5) / len as f32;
            [t, 1.0 - t * 0.7, 0.05 + t * t, 0.25 + t * 0.5]
        })
        .collect()
}

fn run(cpu: &CpuProcessor, pixels: &[[f32; 4]]) -> Vec<[f32; 4]> {
    let mut out = pixels.to_vec();
    cpu.apply_rgba_buffer(&mut out);
    out
}

#[test]
fn scalar_and_simd_buffers_agree() {
    let proc = mixed_chain();
    assert_eq!(proc.num_ops(), 6);

    let input = ramp(37);
    let scalar = run(&proc.cpu_processor(EvalPath::Scalar), &input);
    let simd = run(&proc.cpu_processor(EvalPath::Simd), &input);
    for (i, (a, b)) in scalar.iter().zip(&simd).enumerate() {
        for c in 0..4 {
            assert_abs_diff_eq!(a[c], b[c], epsilon = EPSILON);
        }
        assert_eq!(a[3], input[i][3], "alpha changed at {i}");
    }
}

#[test]
fn buffer_matches_per_pixel() {
    let proc = mixed_chain();
    let cpu = proc.default_cpu_processor();
    let input = ramp(9);
    let out = run(&cpu, &input);
    for (px, got) in input.iter().zip(&out) {
        let single = cpu.apply_rgba(*px);
        for c in 0..4 {
            assert_abs_diff_eq!(single[c], got[c], epsilon = EPSILON);
        }
    }
}

#[test]
fn rgb_buffers_follow_the_same_path() {
    let proc = mixed_chain();
    let rgba = ramp(13);
    let mut rgb: Vec<[f32; 3]> = rgba.iter().map(|p| [p[0], p[1], p[2]]).collect();
    proc.cpu_processor(EvalPath::Simd).apply_rgb_buffer(&mut rgb);

    let want = run(&proc.cpu_processor(EvalPath::Scalar), &rgba);
    for (a, b) in rgb.iter().zip(&want) {
        for c in 0..3 {
            assert_abs_diff_eq!(a[c], b[c], epsilon = EPSILON);
        }
    }
}

/// Halves alpha, converts to HSV, then adds alpha into red.
fn alpha_feeds_red(with_last: bool) -> Processor {
    let mut ops = vec![
        Transform::matrix([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 0.5,
        ]),
        FixedFunctionTransform {
            style: FixedFunctionStyle::RgbToHsv,
            direction: TransformDirection::Forward,
        }
        .into(),
    ];
    if with_last {
        ops.push(Transform::matrix([
            1.0, 0.0, 0.0, 1.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]));
    }
    Config::new("paths")
        .processor_from_transform(&Transform::group(ops), TransformDirection::Forward)
        .unwrap()
}

#[test]
fn rgb_buffers_carry_alpha_between_ops() {
    let proc = alpha_feeds_red(true);
    let hsv = alpha_feeds_red(false).cpu_processor(EvalPath::Scalar);

    // long enough to span more than one scratch block, odd for a SIMD tail
    for len in [1usize, 7, 301] {
        let rgba: Vec<[f32; 4]> = ramp(len).iter().map(|p| [p[0], p[1], p[2], 1.0]).collect();
        for path in [EvalPath::Scalar, EvalPath::Simd] {
            let cpu = proc.cpu_processor(path);
            let want = run(&cpu, &rgba);
            let mut rgb: Vec<[f32; 3]> = rgba.iter().map(|p| [p[0], p[1], p[2]]).collect();
            cpu.apply_rgb_buffer(&mut rgb);

            for (i, (got, want)) in rgb.iter().zip(&want).enumerate() {
                assert_abs_diff_eq!(want[3], 0.5, epsilon = EPSILON);
                for c in 0..3 {
                    assert_abs_diff_eq!(got[c], want[c], epsilon = EPSILON);
                }
                let base = hsv.apply_rgba(rgba[i]);
                assert_abs_diff_eq!(got[0], base[0] + 0.5, epsilon = EPSILON);
            }

            let single = cpu.apply_rgb([rgba[0][0], rgba[0][1], rgba[0][2]]);
            assert_abs_diff_eq!(single[0], want[0][0], epsilon = EPSILON);
        }
    }
}

#[test]
fn short_buffers_and_noops() {
    let proc = mixed_chain();
    let cpu = proc.default_cpu_processor();
    let mut empty: [[f32; 4]; 0] = [];
    cpu.apply_rgba_buffer(&mut empty);

    let mut three = [[0.3, 0.4, 0.5, 1.0]; 3];
    cpu.apply_rgba_buffer(&mut three);
    assert_eq!(three[0], three[2]);

    let noop = Config::new("paths")
        .processor_from_transform(
            &Transform::matrix(Matrix44::IDENTITY.m),
            TransformDirection::Forward,
        )
        .unwrap()
        .default_cpu_processor();
    assert!(noop.is_noop());
    let mut px = ramp(5);
    let before = px.clone();
    noop.apply_rgba_buffer(&mut px);
    assert_eq!(px, before);
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_matches_serial() {
    let proc = mixed_chain();
    let cpu = proc.default_cpu_processor();
    let input = ramp(1031);

    let serial = run(&cpu, &input);
    let mut par = input.clone();
    cpu.par_apply_rgba_buffer(&mut par);
    for (a, b) in serial.iter().zip(&par) {
        for c in 0..4 {
            assert_abs_diff_eq!(a[c], b[c], epsilon = EPSILON);
        }
    }

    let mut rgb: Vec<[f32; 3]> = input.iter().map(|p| [p[0], p[1], p[2]]).collect();
    cpu.par_apply_rgb_buffer(&mut rgb);
    for (a, b) in rgb.iter().zip(&serial) {
        for c in 0..3 {
            assert_abs_diff_eq!(a[c], b[c], epsilon = EPSILON);
        }
    }
}
