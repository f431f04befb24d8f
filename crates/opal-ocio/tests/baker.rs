//! Baker output against reference text.

use opal_ocio::{
    AllocationOp, Baker, ColorSpace, Config, OcioError, Transform, format_name_by_index,
    num_formats,
};

const REL_TOLERANCE: f64 = 1e-4;

const GOLDEN_CSP: &str = "CSPLUTV100
3D

BEGIN METADATA
this is some metadata!
END METADATA

4
0.000977 0.039373 1.587401 64.000000
0.000000 0.333333 0.666667 1.000000
4
0.000977 0.039373 1.587401 64.000000
0.000000 0.333333 0.666667 1.000000
4
0.000977 0.039373 1.587401 64.000000
0.000000 0.333333 0.666667 1.000000

2 2 2
0.042823 0.042823 0.042823
6.622026 0.042823 0.042823
0.042823 6.622026 0.042823
6.622026 6.622026 0.042823
0.042823 0.042823 6.622026
6.622026 0.042823 6.622026
0.042823 6.622026 6.622026
6.622026 6.622026 6.622026

";

fn golden_config() -> Config {
    let mut config = Config::new("bake");
    config
        .add_colorspace(
            ColorSpace::builder("lnh")
                .allocation(AllocationOp::lg2())
                .build(),
        )
        .unwrap();
    config
        .add_colorspace(
            ColorSpace::builder("test")
                .to_reference(Transform::exponent([2.2, 2.2, 2.2, 1.0]))
                .build(),
        )
        .unwrap();
    config
}

fn golden_baker(config: &Config) -> Baker<'_> {
    let mut baker = Baker::new();
    baker.set_config(config);
    baker.set_format("cinespace");
    baker.set_type("3D");
    baker.set_input_space("lnh");
    baker.set_target_space("test");
    baker.set_shaper_size(4);
    baker.set_cube_size(2);
    baker.set_metadata("this is some metadata!");
    baker
}

/// Compares line by line; numeric tokens within a relative tolerance, the
/// rest exactly.
fn assert_matches_golden(got: &str, want: &str) {
    let got_lines: Vec<&str> = got.split('\n').collect();
    let want_lines: Vec<&str> = want.split('\n').collect();
    assert_eq!(
        got_lines.len(),
        want_lines.len(),
        "line count differs:\n{got}"
    );
    for (n, (g, w)) in got_lines.iter().zip(&want_lines).enumerate() {
        let gt: Vec<&str> = g.split_whitespace().collect();
        let wt: Vec<&str> = w.split_whitespace().collect();
        assert_eq!(gt.len(), wt.len(), "line {n}: '{g}' vs '{w}'");
        for (a, b) in gt.iter().zip(&wt) {
            match (a.parse::<f64>(), b.parse::<f64>()) {
                (Ok(x), Ok(y)) if a.contains('.') || b.contains('.') => {
                    let tol = REL_TOLERANCE * y.abs().max(1e-3);
                    assert!((x - y).abs() <= tol, "line {n}: {x} vs {y}");
                }
                _ => assert_eq!(a, b, "line {n}"),
            }
        }
    }
}

#[test]
fn cinespace_golden() {
    let config = golden_config();
    let text = golden_baker(&config).bake().unwrap();
    assert_matches_golden(&text, GOLDEN_CSP);
}

#[test]
fn bake_does_not_change_the_baker() {
    let config = golden_config();
    let baker = golden_baker(&config);
    let first = baker.bake().unwrap();
    let second = baker.bake().unwrap();
    assert_eq!(first, second);
    assert_eq!(baker.shaper_size(), 4);
    assert_eq!(config.colorspaces().len(), 2);
}

#[test]
fn bake_to_path_writes_same_text() {
    let config = golden_config();
    let baker = golden_baker(&config);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("golden.csp");
    baker.bake_to_path(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, baker.bake().unwrap());
}

#[test]
fn every_format_bakes_what_it_supports() {
    let config = golden_config();
    for i in 0..num_formats() {
        let name = format_name_by_index(i).unwrap();
        for lut_type in ["1D", "3D"] {
            let mut baker = golden_baker(&config);
            baker.set_format(name);
            baker.set_type(lut_type);
            match baker.bake() {
                Ok(text) => assert!(!text.is_empty(), "{name} {lut_type}"),
                Err(err) => assert!(
                    matches!(err, OcioError::InvalidParameter { name: "type", .. }),
                    "{name} {lut_type}: {err}"
                ),
            }
        }
    }
}

#[test]
fn default_cube_sizes() {
    let config = golden_config();
    for (format, size) in [("flame", 17usize), ("lustre", 33), ("spi3d", 32)] {
        let mut b = Baker::new();
        b.set_config(&config);
        b.set_format(format);
        b.set_type("3D");
        b.set_input_space("lnh");
        b.set_target_space("test");
        let lut = b.bake_lut().unwrap();
        match lut.data {
            opal_lut::LutData::ThreeD(cube) => assert_eq!(cube.size, size, "{format}"),
            other => panic!("{format}: expected a cube, got {}", other.kind()),
        }
    }
}

#[test]
fn baking_through_a_look() {
    let mut config = golden_config();
    config
        .add_look(
            opal_ocio::Look::new("double")
                .process_space("lnh")
                .transform(Transform::matrix(opal_ocio::Matrix44::scale([2.0, 2.0, 2.0, 1.0]).m)),
        )
        .unwrap();
    let mut baker = golden_baker(&config);
    baker.set_looks("double");
    let text = baker.bake().unwrap();
    // corner (1,1,1) is 2 * 64 before the gamma
    let last = text.trim_end().lines().last().unwrap();
    let want = (128.0f64).powf(1.0 / 2.2);
    let got: f64 = last.split_whitespace().next().unwrap().parse().unwrap();
    assert!((got - want).abs() < want * REL_TOLERANCE, "{got} vs {want}");
}
