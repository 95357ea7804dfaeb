
use mulens_model::magnification_at;
use std::time::Instant;

#[test]
#[ignore] // Only run explicitly for benchmarking: cargo test throughput -- --ignored
fn throughput_benchmark() {
    let n_positions = 20_000;
    let positions = synthetic::random_sources(n_positions, 1.5, 42);

    let start = Instant::now();

    for case in synthetic::ray_tracing_cases() {
        let lens = case.lens();
        let values = magnification_at(&lens, &positions, 0.0).unwrap();
        assert_eq!(values.len(), n_positions);
        assert!(
            values.iter().all(|a| a.is_finite() && *a >= 0.0),
            "s={} q={}: non-finite magnification",
            case.separation,
            case.q
        );
        eprintln!("s={} q={} done", case.separation, case.q);
    }

    let disk = synthetic::planetary_binary();
    let values = magnification_at(&disk, &positions[..500], 0.01).unwrap();
    assert_eq!(values.len(), 500);

    let elapsed = start.elapsed().as_secs_f64();
    eprintln!("Total wall time: {elapsed:.2}s for {n_positions} positions per lens");

    std::fs::write("wall_time.txt", format!("{elapsed:.2}"))
        .expect("failed to write wall_time.txt");
}
