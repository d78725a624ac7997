//! Serializes the resistor and capacitor arenas to a text stream. See
//! spec.md §4.7. All resistors first, then all capacitors, each element
//! terminated by a newline.

use std::io::{self, Write};

use crate::graph::{Resistor, ResistorGraph};
use crate::segment::SegmentStore;

/// Writes the full RC network to `w`: every resistor (planar or via) in
/// arena order, then every capacitor in arena order.
pub fn print_rc_network(
    graph: &ResistorGraph,
    segments: &SegmentStore,
    w: &mut impl Write,
) -> io::Result<()> {
    for resistor in graph.iter() {
        write_resistor(resistor, segments, w)?;
    }
    for cap in graph.capacitors() {
        writeln!(
            w,
            "Capacitor<node1='{}', node2='{}', overlap-length={}, distance={}>",
            cap.n1, cap.n2, cap.overlap_length, cap.distance
        )?;
    }
    Ok(())
}

fn write_resistor(
    resistor: &Resistor,
    segments: &SegmentStore,
    w: &mut impl Write,
) -> io::Result<()> {
    let owner = segments.get(resistor.owner());
    let segment_id = format!("{}:{}", owner.net_name, owner.segment_number);
    match resistor {
        Resistor::Planar {
            n1,
            n2,
            material,
            length,
            width,
            ..
        } => writeln!(
            w,
            "Resistor<node1='{n1}', node2='{n2}', length={length}, width={width}, layer={material}, segment-id='{segment_id}'>"
        ),
        Resistor::Via {
            n1, n2, material, area, ..
        } => writeln!(
            w,
            "VerticalResistor<lower-node='{n1}', upper-node='{n2}', cross-sectional-area={area}, layer={material}, segment-id='{segment_id}'>"
        ),
    }
}

/// Convenience wrapper used by tests and the CLI's in-memory paths.
pub fn render_to_string(graph: &ResistorGraph, segments: &SegmentStore) -> String {
    let mut buf = Vec::new();
    print_rc_network(graph, segments, &mut buf).expect("writing to a Vec<u8> cannot fail");
    String::from_utf8(buf).expect("emission only ever writes UTF-8 text")
}
