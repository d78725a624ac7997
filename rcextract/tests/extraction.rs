//! End-to-end scenarios over `Geometry::generate_rc_network`, exercising
//! the resistor and capacitance builders together the way a driver
//! program would: add segments, run extraction once, inspect the
//! resulting network. See spec.md §8.

use petgraph::graphmap::UnGraphMap;

use rcextract::geom::{Point2D, Rect2D};
use rcextract::graph::Resistor;
use rcextract::{Geometry, GeometryConfig};

fn rect(llx: f64, lly: f64, urx: f64, ury: f64) -> Rect2D {
    Rect2D::new(Point2D::new(llx, lly), Point2D::new(urx, ury)).unwrap()
}

/// Builds an undirected graph over node ids from every resistor (planar or
/// via) in the network, for connectivity checks (property P4).
fn node_graph(geo: &Geometry) -> UnGraphMap<&str, ()> {
    let mut g = UnGraphMap::new();
    for r in geo.graph().iter() {
        g.add_edge(r.n1(), r.n2(), ());
    }
    g
}

#[test]
fn single_wire_yields_one_resistor_two_nodes() {
    let mut geo = Geometry::new(GeometryConfig::default());
    geo.add_segment(
        "CLK",
        "M1",
        rect(0.0, 0.0, 100.0, 10.0),
        Point2D::new(0.0, 5.0),
        Point2D::new(100.0, 5.0),
        vec![],
        vec![],
    )
    .unwrap();
    geo.generate_rc_network().unwrap();

    assert_eq!(geo.graph().len(), 1);
    assert!(geo.graph().capacitors().is_empty());
    match geo.graph().get(rcextract::graph::ResistorId(0)) {
        Resistor::Planar { n1, n2, length, width, .. } => {
            assert_eq!(n1, "CLK{0}");
            assert_eq!(n2, "CLK{1}");
            assert_eq!(*length, 100.0);
            assert_eq!(*width, 10.0);
        }
        _ => panic!("expected a planar resistor"),
    }
}

#[test]
fn escape_resistor_fuses_adjacent_segments_into_one_node() {
    let mut geo = Geometry::new(GeometryConfig::default());
    let a = geo
        .add_segment(
            "A",
            "M1",
            rect(0.0, 0.0, 50.0, 10.0),
            Point2D::new(0.0, 5.0),
            Point2D::new(50.0, 5.0),
            vec![],
            vec![],
        )
        .unwrap();
    geo.add_segment(
        "A",
        "M1",
        rect(50.0, 0.0, 100.0, 10.0),
        Point2D::new(50.0, 5.0),
        Point2D::new(100.0, 5.0),
        vec![a],
        vec![],
    )
    .unwrap();
    geo.generate_rc_network().unwrap();

    // Two intrinsic planar resistors plus one zero-length escape resistor.
    assert_eq!(geo.graph().len(), 3);

    let g = node_graph(&geo);
    assert_eq!(
        petgraph::algo::connected_components(&g),
        1,
        "the whole net must resolve to a single connected component"
    );

    // The escape resistor's own two ends collapse into the single node the
    // two intrinsic resistors share at x=50.
    let shared: Vec<&Resistor> = geo
        .graph()
        .iter()
        .filter(|r| matches!(r, Resistor::Planar { length, .. } if *length == 0.0))
        .collect();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].n1(), shared[0].n2());
}

#[test]
fn via_stack_binds_planar_wires_on_adjacent_layers() {
    let mut geo = Geometry::new(GeometryConfig::default());
    let lower = geo
        .add_segment(
            "A",
            "M1",
            rect(0.0, 0.0, 100.0, 10.0),
            Point2D::new(0.0, 5.0),
            Point2D::new(100.0, 5.0),
            vec![],
            vec![],
        )
        .unwrap();
    let via = geo
        .add_segment(
            "A",
            "V1",
            rect(45.0, 0.0, 55.0, 10.0),
            Point2D::new(50.0, 5.0),
            Point2D::new(50.0, 5.0),
            vec![],
            vec![lower],
        )
        .unwrap();
    geo.add_segment(
        "A",
        "M2",
        rect(0.0, 0.0, 100.0, 10.0),
        Point2D::new(0.0, 5.0),
        Point2D::new(100.0, 5.0),
        vec![],
        vec![via],
    )
    .unwrap();
    geo.generate_rc_network().unwrap();

    // One planar resistor per metal wire, plus one via resistor.
    assert_eq!(geo.graph().len(), 3);
    let via_count = geo.graph().iter().filter(|r| r.is_via()).count();
    assert_eq!(via_count, 1);

    let g = node_graph(&geo);
    assert_eq!(
        petgraph::algo::connected_components(&g),
        1,
        "the via must bridge both metal layers into one component"
    );
}

#[test]
fn cross_net_parallel_wires_couple() {
    let mut geo = Geometry::new(GeometryConfig::default());
    geo.add_segment(
        "A",
        "M1",
        rect(0.0, 0.0, 100.0, 10.0),
        Point2D::new(0.0, 5.0),
        Point2D::new(100.0, 5.0),
        vec![],
        vec![],
    )
    .unwrap();
    geo.add_segment(
        "B",
        "M1",
        rect(0.0, 15.0, 100.0, 25.0),
        Point2D::new(0.0, 20.0),
        Point2D::new(100.0, 20.0),
        vec![],
        vec![],
    )
    .unwrap();
    geo.generate_rc_network().unwrap();

    assert_eq!(geo.graph().capacitors().len(), 1);
}

#[test]
fn same_net_wires_never_couple_even_when_adjacent() {
    let mut geo = Geometry::new(GeometryConfig::default());
    geo.add_segment(
        "A",
        "M1",
        rect(0.0, 0.0, 100.0, 10.0),
        Point2D::new(0.0, 5.0),
        Point2D::new(100.0, 5.0),
        vec![],
        vec![],
    )
    .unwrap();
    geo.add_segment(
        "A",
        "M1",
        rect(0.0, 15.0, 100.0, 25.0),
        Point2D::new(0.0, 20.0),
        Point2D::new(100.0, 20.0),
        vec![],
        vec![],
    )
    .unwrap();
    geo.generate_rc_network().unwrap();

    assert!(geo.graph().capacitors().is_empty());
}

#[test]
fn extraction_is_deterministic_across_runs() {
    let build = || {
        let mut geo = Geometry::new(GeometryConfig::default());
        let a = geo
            .add_segment(
                "A",
                "M1",
                rect(0.0, 0.0, 50.0, 10.0),
                Point2D::new(0.0, 5.0),
                Point2D::new(50.0, 5.0),
                vec![],
                vec![],
            )
            .unwrap();
        geo.add_segment(
            "A",
            "M1",
            rect(50.0, 0.0, 100.0, 10.0),
            Point2D::new(50.0, 5.0),
            Point2D::new(100.0, 5.0),
            vec![a],
            vec![],
        )
        .unwrap();
        geo.add_segment(
            "B",
            "M1",
            rect(0.0, 15.0, 100.0, 25.0),
            Point2D::new(0.0, 20.0),
            Point2D::new(100.0, 20.0),
            vec![],
            vec![],
        )
        .unwrap();
        geo.generate_rc_network().unwrap();
        geo.render_to_string()
    };

    assert_eq!(build(), build());
}

#[test]
fn generate_rc_network_is_a_no_op_the_second_time() {
    let mut geo = Geometry::new(GeometryConfig::default());
    geo.add_segment(
        "A",
        "M1",
        rect(0.0, 0.0, 100.0, 10.0),
        Point2D::new(0.0, 5.0),
        Point2D::new(100.0, 5.0),
        vec![],
        vec![],
    )
    .unwrap();
    geo.generate_rc_network().unwrap();
    let first = geo.render_to_string();
    geo.generate_rc_network().unwrap();
    assert_eq!(geo.render_to_string(), first);
}
