
use mulens_model::{mass_fractions, BinaryLens, MulensError, PointLens, SolverConfig};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[test]
fn mass_fractions_sum_to_one() {
    let (m_1, m_2) = mass_fractions(0.25);
    assert!((m_1 + m_2 - 1.0).abs() < 1e-15);
    assert!((m_2 / m_1 - 0.25).abs() < 1e-15);
}

#[test]
fn lenses_sit_around_the_centre_of_mass() {
    let lens = synthetic::planetary_binary();
    let (z1, z2) = lens.lens_positions();
    assert!(z1 < 0.0 && z2 > 0.0, "primary left, secondary right");
    assert!((z2 - z1 - 0.8).abs() < 1e-15);
    assert!((lens.mass_1() * z1 + lens.mass_2() * z2).abs() < 1e-15);
}

// ---------------------------------------------------------------------------
// Point source
// ---------------------------------------------------------------------------

#[test]
fn point_source_inside_central_caustic() {
    let lens = synthetic::planetary_binary();
    let images = lens.images(0.01, 0.01).unwrap();
    assert_eq!(images.len(), 5, "source inside the caustic has five images");

    let result = lens.point_source_magnification(0.01, 0.01).unwrap();
    assert!(
        (result - 18.18544836).abs() < 1e-6,
        "expected 18.18544836, got {result}"
    );
}

#[test]
fn point_source_outside_caustic_has_three_images() {
    let lens = synthetic::planetary_binary();
    let images = lens.images(0.6, -0.4).unwrap();
    assert_eq!(images.len(), 3);
}

#[test]
fn parities_sum_to_minus_one() {
    let (m_1, m_2) = mass_fractions(0.3);
    let lens = BinaryLens::new(m_1, m_2, 1.2).unwrap();
    for (x, y) in synthetic::random_sources(200, 1.5, 3) {
        let images = lens.images(x, y).unwrap();
        let parity: i32 = images.iter().map(|im| im.parity as i32).sum();
        assert_eq!(parity, -1, "({x}, {y}): {} images", images.len());
    }
}

#[test]
fn distant_source_is_unmagnified() {
    let lens = synthetic::planetary_binary();
    let result = lens.point_source_magnification(50.0, 30.0).unwrap();
    assert!((result - 1.0).abs() < 1e-5, "got {result}");
}

#[test]
fn mirror_symmetry_about_the_binary_axis() {
    let (m_1, m_2) = mass_fractions(0.4);
    let lens = BinaryLens::new(m_1, m_2, 0.9).unwrap();
    for (x, y) in synthetic::random_sources(30, 1.0, 5) {
        let above = lens.point_source_magnification(x, y).unwrap();
        let below = lens.point_source_magnification(x, -y).unwrap();
        assert!(
            (above - below).abs() < 1e-9 * above,
            "({x}, {y}): {above} vs {below}"
        );
    }
}

#[test]
fn equal_masses_are_symmetric_left_right() {
    let lens = BinaryLens::new(0.5, 0.5, 1.3).unwrap();
    for (x, y) in synthetic::random_sources(30, 1.0, 9) {
        let right = lens.point_source_magnification(x, y).unwrap();
        let left = lens.point_source_magnification(-x, y).unwrap();
        assert!(
            (right - left).abs() < 1e-9 * right,
            "({x}, {y}): {right} vs {left}"
        );
    }
}

#[test]
fn tiny_companion_reduces_to_point_lens() {
    let (m_1, m_2) = mass_fractions(1e-6);
    let lens = BinaryLens::new(m_1, m_2, 2.0).unwrap();
    let binary = lens.point_source_magnification(0.3, 0.4).unwrap();
    let single = PointLens::new().point_source_magnification(0.3, 0.4).unwrap();
    assert!(
        (binary - single).abs() < 1e-4,
        "binary {binary} vs point lens {single}"
    );
}

// ---------------------------------------------------------------------------
// Finite source
// ---------------------------------------------------------------------------

#[test]
fn uniform_source_matches_published_finite_source_value() {
    let lens = synthetic::planetary_binary();
    let result = lens.magnification(0.01, 0.01, 0.01).unwrap();
    assert!(
        (result / 18.2834436 - 1.0).abs() < 1e-4,
        "expected 18.2834436, got {result}"
    );
}

#[test]
fn finer_quadrature_converges() {
    let coarse = synthetic::planetary_binary();
    let fine = coarse.with_solver(SolverConfig {
        disk_rings: 40,
        disk_angles: 128,
        ..SolverConfig::default()
    });
    let err_coarse = (coarse.magnification(0.01, 0.01, 0.01).unwrap() - 18.2834436).abs();
    let err_fine = (fine.magnification(0.01, 0.01, 0.01).unwrap() - 18.2834436).abs();
    assert!(
        err_fine < err_coarse,
        "finer grid should be closer: {err_fine} vs {err_coarse}"
    );
}

#[test]
fn zero_radius_is_point_source() {
    let lens = synthetic::planetary_binary();
    let point = lens.point_source_magnification(0.2, 0.1).unwrap();
    let zero = lens.magnification(0.2, 0.1, 0.0).unwrap();
    assert_eq!(point, zero);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn non_positive_parameters_are_rejected() {
    assert!(matches!(
        BinaryLens::new(-0.5, 0.5, 1.0),
        Err(MulensError::InvalidParameter { name: "mass_1", .. })
    ));
    assert!(matches!(
        BinaryLens::new(0.5, 0.0, 1.0),
        Err(MulensError::InvalidParameter { name: "mass_2", .. })
    ));
    assert!(matches!(
        BinaryLens::new(0.5, 0.5, 0.0),
        Err(MulensError::InvalidParameter {
            name: "separation",
            ..
        })
    ));
    assert!(matches!(
        BinaryLens::new(0.5, 0.5, f64::INFINITY),
        Err(MulensError::InvalidParameter {
            name: "separation",
            ..
        })
    ));
}

#[test]
fn negative_radius_is_rejected() {
    let lens = synthetic::planetary_binary();
    let err = lens.magnification(0.0, 0.0, -1.0).unwrap_err();
    assert!(err.to_string().contains("rho"), "message: {err}");
}

#[test]
fn invalid_solver_settings_are_rejected() {
    let lens = synthetic::planetary_binary();
    for image_tolerance in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
        let bad = lens.with_solver(SolverConfig {
            image_tolerance,
            ..SolverConfig::default()
        });
        assert!(
            matches!(
                bad.point_source_magnification(0.01, 0.01),
                Err(MulensError::InvalidParameter {
                    name: "image_tolerance",
                    ..
                })
            ),
            "image_tolerance = {image_tolerance} should be rejected"
        );
        assert!(bad.magnification(0.01, 0.01, 0.01).is_err());
    }

    let no_rings = lens.with_solver(SolverConfig {
        disk_rings: 0,
        ..SolverConfig::default()
    });
    assert!(matches!(
        no_rings.magnification(0.01, 0.01, 0.01),
        Err(MulensError::InvalidParameter {
            name: "disk_rings",
            ..
        })
    ));

    let no_iterations = SolverConfig {
        max_iterations: 0,
        ..SolverConfig::default()
    };
    assert!(matches!(
        no_iterations.validate(),
        Err(MulensError::InvalidParameter {
            name: "max_iterations",
            ..
        })
    ));
    assert!(SolverConfig::default().validate().is_ok());
}
