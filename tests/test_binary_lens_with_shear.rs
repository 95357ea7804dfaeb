
use mulens_model::{mass_fractions, BinaryLens, BinaryLensWithShear, MulensError, SolverConfig};
use num_complex::Complex64;

// ---------------------------------------------------------------------------
// Published values
// ---------------------------------------------------------------------------

#[test]
fn zero_shear_matches_finite_source_binary() {
    // Shear always uses a point source, so only two digits are expected here.
    let (m_1, m_2) = mass_fractions(0.1);
    let lens = BinaryLensWithShear::new(m_1, m_2, 0.8, 0.0, Complex64::new(0.0, 0.0)).unwrap();

    let result = lens.magnification(0.01, 0.01, 0.01).unwrap();
    assert!(
        (result / 18.2834436 - 1.0).abs() < 1.5e-2,
        "zero-shear magnification should be ~18.28, got {result}"
    );
}

#[test]
fn shear_matches_ray_tracing() {
    for case in synthetic::ray_tracing_cases() {
        let result = case
            .lens()
            .magnification(case.source_x, case.source_y, case.rho)
            .unwrap();
        assert!(
            (result - case.expected).abs() < 1.5e-7,
            "s={} q={}: expected {}, got {result}",
            case.separation,
            case.q,
            case.expected
        );
    }
}

// ---------------------------------------------------------------------------
// Consistency
// ---------------------------------------------------------------------------

#[test]
fn zero_perturbation_equals_binary_lens() {
    let (m_1, m_2) = mass_fractions(0.3);
    let plain = BinaryLens::new(m_1, m_2, 1.1).unwrap();
    let sheared = BinaryLensWithShear::new(m_1, m_2, 1.1, 0.0, Complex64::new(0.0, 0.0)).unwrap();

    for (x, y) in synthetic::random_sources(50, 1.0, 7) {
        let a = plain.point_source_magnification(x, y).unwrap();
        let b = sheared.point_source_magnification(x, y).unwrap();
        assert!(
            (a - b).abs() < 1e-12 * a,
            "({x}, {y}): binary {a} vs zero shear {b}"
        );
    }
}

#[test]
fn finite_source_radius_is_ignored() {
    let case = &synthetic::ray_tracing_cases()[0];
    let lens = case.lens();
    let point = lens
        .point_source_magnification(case.source_x, case.source_y)
        .unwrap();
    let wide = lens.magnification(case.source_x, case.source_y, 0.1).unwrap();
    assert_eq!(point, wide);
}

#[test]
fn image_parities_sum_to_minus_one() {
    for case in synthetic::ray_tracing_cases() {
        let lens = case.lens();
        for (x, y) in synthetic::random_sources(100, 1.5, 11) {
            let images = lens.images(x, y).unwrap();
            let parity: i32 = images.iter().map(|im| im.parity as i32).sum();
            assert_eq!(
                parity,
                -1,
                "({x}, {y}) with K={}: {} images, parity sum {parity}",
                case.convergence_k,
                images.len()
            );
        }
    }
}

#[test]
fn images_satisfy_the_lens_equation() {
    let case = &synthetic::ray_tracing_cases()[1];
    let lens = case.lens();
    let (z1, z2) = lens.lens_positions();
    let k = lens.convergence_k();
    let g = lens.shear_g();
    let zeta = Complex64::new(case.source_x, case.source_y);

    let images = lens.images(case.source_x, case.source_y).unwrap();
    assert_eq!(images.len(), 3);
    for image in images {
        let z = image.position;
        let mapped = z
            - lens.mass_1() / (z - z1).conj()
            - lens.mass_2() / (z - z2).conj()
            - k * (z - z2)
            - g * (z - z2).conj();
        assert!((mapped - zeta).norm() < 1e-10, "image {z} maps to {mapped}");
    }
}

#[test]
fn distant_source_sees_only_the_external_field() {
    let case = &synthetic::ray_tracing_cases()[0];
    let lens = case.lens();
    let a = 1.0 - case.convergence_k;
    let expected = 1.0 / (a * a - case.shear_g.norm_sqr());

    let images = lens.images(300.0, 200.0).unwrap();
    assert_eq!(images.len(), 3, "two faint images stay next to the lenses");
    let result: f64 = images.iter().map(|im| im.magnification).sum();
    assert!(
        (result - expected).abs() < 1e-5,
        "far-field magnification should be {expected}, got {result}"
    );
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn critical_shear_is_rejected() {
    let err = BinaryLensWithShear::new(0.5, 0.5, 1.0, 0.0, Complex64::new(0.6, 0.8)).unwrap_err();
    assert!(matches!(
        err,
        MulensError::InvalidParameter { name: "shear_G", .. }
    ));
}

#[test]
fn convergence_of_one_is_rejected() {
    let err = BinaryLensWithShear::new(0.5, 0.5, 1.0, 1.0, Complex64::new(0.0, 0.0)).unwrap_err();
    assert!(matches!(
        err,
        MulensError::InvalidParameter {
            name: "convergence_K",
            ..
        }
    ));
}

#[test]
fn negative_radius_is_rejected() {
    let lens = synthetic::ray_tracing_cases()[0].lens();
    assert!(matches!(
        lens.magnification(0.1, 0.0, -0.01),
        Err(MulensError::InvalidParameter { name: "rho", .. })
    ));
}

#[test]
fn non_finite_source_is_rejected() {
    let lens = synthetic::ray_tracing_cases()[0].lens();
    assert!(lens.point_source_magnification(f64::NAN, 0.0).is_err());
}

#[test]
fn negative_image_tolerance_is_rejected() {
    let lens = synthetic::ray_tracing_cases()[0]
        .lens()
        .with_solver(SolverConfig {
            image_tolerance: -1.0,
            ..SolverConfig::default()
        });
    assert!(matches!(
        lens.magnification(0.1, 0.0, 0.0),
        Err(MulensError::InvalidParameter {
            name: "image_tolerance",
            ..
        })
    ));
}
