//! Conversions through a small studio-style config.

use approx::assert_relative_eq;
use opal_ocio::{
    Allocation, AllocationTransform, CdlStyle, CdlTransform, ColorSpace, Config, ConfigBuilder,
    Encoding, ExposureContrastTransform, EvalPath, Look, LogTransform, OcioError,
    OptimizationLevel, ProcessorOp, Transform, TransformDirection, role_names,
};

const EPSILON: f32 = 1e-5;

#[rustfmt::skip]
const AP1_TO_AP0: [f64; 16] = [
    0.695_452_241_4, 0.140_678_696_5, 0.163_869_062_2, 0.0,
    0.044_794_563_4, 0.859_671_118_5, 0.095_534_318_2, 0.0,
    -0.005_525_882_6, 0.004_025_210_3, 1.001_500_672_3, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

fn studio() -> Config {
    ConfigBuilder::new("studio")
        .add_colorspace(
            ColorSpace::builder("ACES2065-1")
                .alias("aces")
                .encoding(Encoding::SceneLinear)
                .build(),
        )
        .add_colorspace(
            ColorSpace::builder("ACEScg")
                .encoding(Encoding::SceneLinear)
                .to_reference(Transform::matrix(AP1_TO_AP0))
                .build(),
        )
        .add_colorspace(
            ColorSpace::builder("log")
                .encoding(Encoding::Log)
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
                .encoding(Encoding::Sdr)
                .from_reference(Transform::group(vec![
                    Transform::colorspace("ACES2065-1", "ACEScg"),
                    Transform::exponent([1.0 / 2.4, 1.0 / 2.4, 1.0 / 2.4, 1.0]),
                ]))
                .build(),
        )
        .add_colorspace(ColorSpace::builder("raw").encoding(Encoding::Data).build())
        .add_look(
            Look::new("grade").process_space("log").transform(
                CdlTransform {
                    slope: [1.1, 1.0, 0.9],
                    offset: [0.01, 0.0, -0.01],
                    style: CdlStyle::NoClamp,
                    ..Default::default()
                }
                .into(),
            ),
        )
        .add_look(
            Look::new("punch").process_space(role_names::SCENE_LINEAR).transform(
                ExposureContrastTransform {
                    exposure: 0.5,
                    ..Default::default()
                }
                .into(),
            ),
        )
        .set_role(role_names::REFERENCE, "ACES2065-1")
        .set_role(role_names::SCENE_LINEAR, "ACEScg")
        .build()
        .unwrap()
}

fn assert_rgb_eq(got: [f32; 3], want: [f32; 3], eps: f32) {
    for c in 0..3 {
        assert!(
            (got[c] - want[c]).abs() <= eps * want[c].abs().max(1.0),
            "channel {c}: got {got:?}, want {want:?}"
        );
    }
}

#[test]
fn forward_then_inverse_round_trips() {
    let config = studio();
    let pixel = [0.18, 0.42, 0.07];
    for (src, dst) in [("ACEScg", "display"), ("log", "ACEScg"), ("aces", "log")] {
        let fwd = config.processor(src, dst).unwrap().default_cpu_processor();
        let inv = config
            .processor_with_direction(src, dst, "", TransformDirection::Inverse)
            .unwrap()
            .default_cpu_processor();
        assert_rgb_eq(inv.apply_rgb(fwd.apply_rgb(pixel)), pixel, 1e-4);
    }
}

#[test]
fn exponent_round_trip() {
    let gamma = Transform::exponent([2.2, 2.2, 2.2, 1.0]);
    let config = Config::new("bare");
    let fwd = config
        .processor_from_transform(&gamma, TransformDirection::Forward)
        .unwrap()
        .default_cpu_processor();
    let inv = config
        .processor_from_transform(&gamma, TransformDirection::Inverse)
        .unwrap()
        .default_cpu_processor();
    for v in [0.01f32, 0.18, 0.5, 0.9] {
        let out = inv.apply_rgb(fwd.apply_rgb([v; 3]));
        assert_relative_eq!(out[0], v, max_relative = EPSILON);
    }
}

#[test]
fn identity_conversions_are_noops() {
    let config = studio();
    assert!(config.processor("ACEScg", "scene_linear").unwrap().is_noop());
    assert!(config.processor("aces", "ACES2065-1").unwrap().is_noop());
    assert!(config.processor("raw", "display").unwrap().is_noop());
    assert!(
        config
            .processor_with_looks("display", "raw", "grade")
            .unwrap()
            .is_noop()
    );
}

#[test]
fn nested_reference_matches_direct_matrix() {
    let config = studio();
    let p = config.processor("aces", "display").unwrap();
    assert_eq!(p.num_ops(), 2, "inverse matrix then exponent");

    let cpu = p.default_cpu_processor();
    let out = cpu.apply_rgb([0.18, 0.18, 0.18]);
    // a neutral stays neutral through AP0 -> AP1
    assert_relative_eq!(out[0], 0.18f32.powf(1.0 / 2.4), max_relative = 1e-3);
}

#[test]
fn optimizer_folds_matrix_round_trip() {
    let config = studio();
    let there_and_back = Transform::group(vec![
        Transform::colorspace("ACEScg", "aces"),
        Transform::colorspace("aces", "ACEScg"),
    ]);
    let p = config
        .processor_from_transform(&there_and_back, TransformDirection::Forward)
        .unwrap();
    assert!(p.is_noop());

    let p = config
        .processor_from_transform_with_level(
            &there_and_back,
            TransformDirection::Forward,
            OptimizationLevel::None,
        )
        .unwrap();
    assert_eq!(p.num_ops(), 2);
}

#[test]
fn lg2_pairs_are_not_cancelled() {
    let config = studio();
    let p = config
        .processor_from_transform(
            &Transform::group(vec![
                Transform::colorspace("aces", "log"),
                Transform::colorspace("log", "aces"),
            ]),
            TransformDirection::Forward,
        )
        .unwrap();
    assert_eq!(p.num_ops(), 2, "log2 encode clamps, so the pair is kept");
    let out = p.default_cpu_processor().apply_rgb([0.18, 1.0, 4.0]);
    assert_rgb_eq(out, [0.18, 1.0, 4.0], 1e-4);
}

fn cineon_like() -> Config {
    let mut config = studio();
    config
        .add_colorspace(
            ColorSpace::builder("cineon")
                .encoding(Encoding::Log)
                .from_reference(
                    LogTransform {
                        base: 10.0,
                        log_slope: [0.293_255, 0.293_255, 0.293_255],
                        log_offset: [0.669_599, 0.669_599, 0.669_599],
                        lin_slope: [0.989_9, 0.989_9, 0.989_9],
                        lin_offset: [0.010_1, 0.010_1, 0.010_1],
                        direction: TransformDirection::Forward,
                    }
                    .into(),
                )
                .build(),
        )
        .unwrap();
    config
}

#[test]
fn log_space_encodes_and_decodes() {
    let config = cineon_like();
    let encode = config.processor("aces", "cineon").unwrap();
    assert!(matches!(encode.ops()[0], ProcessorOp::Log { forward: true, .. }));
    let decode = config.processor("cineon", "aces").unwrap();

    for path in [EvalPath::Scalar, EvalPath::Simd] {
        let enc = encode.cpu_processor(path);
        let dec = decode.cpu_processor(path);

        // lin 1.0 sits at log 0.669599
        let out = enc.apply_rgba([1.0, 1.0, 1.0, 0.3]);
        assert_relative_eq!(out[0], 0.669_599, max_relative = 1e-4);
        assert_eq!(out[3], 0.3, "alpha is left alone");

        for v in [0.0f32, 0.02, 0.18, 0.9, 12.0] {
            let back = dec.apply_rgb(enc.apply_rgb([v; 3]));
            assert_rgb_eq(back, [v; 3], 1e-4);
        }
    }
}

#[test]
fn log_node_inverse_matches_inverse_direction() {
    let log = Transform::log(2.0);
    let config = Config::new("bare");
    let a = config
        .processor_from_transform(&log.clone().inverse(), TransformDirection::Forward)
        .unwrap()
        .default_cpu_processor();
    let b = config
        .processor_from_transform(&log, TransformDirection::Inverse)
        .unwrap()
        .default_cpu_processor();
    for v in [-4.0f32, 0.0, 2.5] {
        assert_relative_eq!(a.apply_rgb([v; 3])[0], 2f32.powf(v), max_relative = EPSILON);
        assert_eq!(a.apply_rgb([v; 3]), b.apply_rgb([v; 3]));
    }

    // non-positive values clamp on the way in, so log then antilog is kept
    let there_and_back = Transform::group(vec![log.clone(), log.inverse()]);
    let p = config
        .processor_from_transform(&there_and_back, TransformDirection::Forward)
        .unwrap();
    assert_eq!(p.num_ops(), 2);
    let out = p.default_cpu_processor().apply_rgb([-1.0, 0.5, 3.0]);
    assert!(out[0] > 0.0 && out[0] < 1e-30, "got {out:?}");
    assert_rgb_eq([out[1], out[2], 0.0], [0.5, 3.0, 0.0], 1e-5);
}

#[test]
fn degenerate_log_is_rejected() {
    let config = Config::new("bare");
    for base in [1.0, 0.0, -10.0] {
        let err = config
            .processor_from_transform(&Transform::log(base), TransformDirection::Forward)
            .unwrap_err();
        assert!(matches!(err, OcioError::Validation(_)), "base {base}: {err:?}");
    }
}

#[test]
fn looks_apply_in_order_and_invert() {
    let config = studio();
    let pixel = [0.18, 0.3, 0.05];

    let graded = config
        .processor_with_looks("ACEScg", "display", "grade, +punch")
        .unwrap()
        .default_cpu_processor()
        .apply_rgb(pixel);
    let plain = config
        .processor("ACEScg", "display")
        .unwrap()
        .default_cpu_processor()
        .apply_rgb(pixel);
    assert!(graded[0] > plain[0], "{graded:?} vs {plain:?}");

    let back = config
        .processor_with_direction("ACEScg", "display", "grade, +punch", TransformDirection::Inverse)
        .unwrap()
        .default_cpu_processor()
        .apply_rgb(graded);
    assert_rgb_eq(back, pixel, 1e-4);

    // "-punch" undoes "+punch"
    let undone = config
        .processor_with_looks("ACEScg", "ACEScg", "punch, -punch")
        .unwrap()
        .default_cpu_processor()
        .apply_rgb(pixel);
    assert_rgb_eq(undone, pixel, EPSILON);
}

#[test]
fn uninvertible_nodes_fail_at_compile_time() {
    let mut config = studio();
    config
        .add_colorspace(
            ColorSpace::builder("flat")
                .to_reference(Transform::exponent([0.0, 1.0, 1.0, 1.0]))
                .build(),
        )
        .unwrap();
    config
        .add_colorspace(
            ColorSpace::builder("collapsed")
                .to_reference(Transform::matrix([0.0; 16]))
                .build(),
        )
        .unwrap();

    assert!(config.processor("flat", "aces").is_ok());
    let err = config.processor("aces", "flat").unwrap_err();
    assert!(
        matches!(err, OcioError::UnsupportedInversion { op: "exponent", .. }),
        "got {err:?}"
    );

    let err = config.processor("aces", "collapsed").unwrap_err();
    assert!(
        matches!(err, OcioError::UnsupportedInversion { op: "matrix", .. }),
        "got {err:?}"
    );
}

#[test]
fn bad_look_strings() {
    let config = studio();
    for looks in ["missing", "grade, -", "+"] {
        let err = config
            .processor_with_looks("ACEScg", "display", looks)
            .unwrap_err();
        assert!(matches!(err, OcioError::LookParsing { .. }), "{looks}: {err:?}");
    }
}

#[test]
fn colorspace_node_without_config_fails() {
    let err = opal_ocio::Processor::from_transform(
        &Transform::colorspace("a", "b"),
        TransformDirection::Forward,
    )
    .unwrap_err();
    assert!(matches!(err, OcioError::ProcessorCompilation { .. }), "got {err:?}");
}
