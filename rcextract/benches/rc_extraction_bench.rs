use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rcextract::geom::{Point2D, Rect2D};
use rcextract::{Geometry, GeometryConfig};

/// A comb of `rows` parallel wires on alternating nets, each `length` units
/// long and spaced 20 units apart — close enough for every adjacent pair on
/// different nets to couple.
fn build_comb(rows: u32, length: f64) -> Geometry {
    let mut geo = Geometry::new(GeometryConfig::default());
    for row in 0..rows {
        let y = row as f64 * 20.0;
        let net = if row % 2 == 0 { "A" } else { "B" };
        geo.add_segment(
            net,
            "M1",
            Rect2D::new(Point2D::new(0.0, y), Point2D::new(length, y + 10.0)).unwrap(),
            Point2D::new(0.0, y + 5.0),
            Point2D::new(length, y + 5.0),
            vec![],
            vec![],
        )
        .unwrap();
    }
    geo
}

fn bench_resistor_network(c: &mut Criterion) {
    c.bench_function("populate_resistor_network_200_rows", |b| {
        b.iter_batched(
            || build_comb(black_box(200), black_box(1000.0)),
            |mut geo| geo.generate_rc_network().unwrap(),
            criterion::BatchSize::LargeInput,
        );
    });
}

fn bench_capacitance_query(c: &mut Criterion) {
    c.bench_function("capacitance_neighbor_query_800_rows", |b| {
        b.iter_batched(
            || build_comb(black_box(800), black_box(1000.0)),
            |mut geo| geo.generate_rc_network().unwrap(),
            criterion::BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, bench_resistor_network, bench_capacitance_query);
criterion_main!(benches);
