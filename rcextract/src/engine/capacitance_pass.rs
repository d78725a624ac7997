//! The capacitance-network builder (C6): cross-net, same-layer coupling
//! capacitance between planar wires whose rectangles lie within the spatial
//! index's query radius of one another. See spec.md §4.6.

use crate::error::PartitionError;
use crate::geom::{overlap_x, overlap_y, strictly_between, Axis, Point2D};
use crate::graph::Capacitor;
use crate::segment::SegmentId;

use super::Geometry;

impl Geometry {
    pub(super) fn populate_capacitance_network(&mut self) -> Result<(), PartitionError> {
        let nets: Vec<String> = self.segments.nets_sorted().map(|(n, _)| n.to_string()).collect();
        for net in nets {
            let seg_ids = self.segments.segments_of(&net).to_vec();
            for seg_id in seg_ids {
                let seg = self.segments.get(seg_id);
                if seg.is_via() || seg.resistors.is_empty() {
                    continue;
                }
                let (layer, rect) = (seg.layer_name.clone(), seg.rect);
                let partition = self
                    .partitions
                    .get(&layer)
                    .ok_or_else(|| PartitionError::UnknownLayer { layer: layer.clone() })?;
                let neighbors = partition.neighbors(&rect, self.config.num_bins_neighborhood);

                let here = (net.as_str(), seg.segment_number);
                for other_id in neighbors {
                    let other = self.segments.get(other_id);
                    if other.is_via() || other.net_name == net {
                        continue;
                    }
                    // Each unordered pair is only ever visited from its
                    // canonically-lower side — the partition query is
                    // symmetric and would otherwise find it twice.
                    let there = (other.net_name.as_str(), other.segment_number);
                    if there <= here {
                        continue;
                    }
                    self.try_couple(seg_id, other_id);
                }
            }
        }
        Ok(())
    }

    /// Tests a same-layer, cross-net pair for coupling capacitance and, if
    /// their rectangles overlap along the wires' shared run axis, emits a
    /// capacitor between the resistor nodes nearest the overlap's midpoint.
    /// Spec.md §4.6.
    fn try_couple(&mut self, seg1: SegmentId, seg2: SegmentId) {
        let (rect1, axis1) = {
            let s = self.segments.get(seg1);
            (s.rect, s.p1.axis_to(&s.p2))
        };
        let (rect2, axis2) = {
            let s = self.segments.get(seg2);
            (s.rect, s.p1.axis_to(&s.p2))
        };
        let (axis1, axis2) = match (axis1, axis2) {
            (Some(a), Some(b)) => (a, b),
            _ => return,
        };
        if axis1 != axis2 {
            return;
        }

        let (lo, hi, distance) = match axis1 {
            Axis::X => {
                let (lo, hi) = match overlap_x(&rect1, &rect2) {
                    Some(v) if v.1 > v.0 => v,
                    _ => return,
                };
                let distance = if rect1.ll.y >= rect2.ur.y {
                    rect1.ll.y - rect2.ur.y
                } else if rect2.ll.y >= rect1.ur.y {
                    rect2.ll.y - rect1.ur.y
                } else {
                    return; // rectangles overlap in y too — not a coplanar coupling pair
                };
                (lo, hi, distance)
            }
            Axis::Y => {
                let (lo, hi) = match overlap_y(&rect1, &rect2) {
                    Some(v) if v.1 > v.0 => v,
                    _ => return,
                };
                let distance = if rect1.ll.x >= rect2.ur.x {
                    rect1.ll.x - rect2.ur.x
                } else if rect2.ll.x >= rect1.ur.x {
                    rect2.ll.x - rect1.ur.x
                } else {
                    return;
                };
                (lo, hi, distance)
            }
        };

        let overlap_length = hi - lo;
        let center = (lo + hi) / 2.0;

        let (node1, node2) = match (
            self.coupling_node(seg1, axis1, lo, hi, center),
            self.coupling_node(seg2, axis1, lo, hi, center),
        ) {
            (Some(n1), Some(n2)) => (n1, n2),
            // Neither side has a resistor spanning the overlap — no node to
            // attach to. Spec.md §4.6 step 3: the coupling is dropped, not
            // synthesized.
            _ => return,
        };
        let material = self.segments.get(seg1).layer_name.clone();
        self.graph.push_capacitor(Capacitor {
            n1: node1,
            n2: node2,
            material,
            overlap_length,
            distance,
        });
    }

    /// The resistor node to attach a coupling capacitor to along `axis`:
    /// prefer the resistor whose centerline strictly contains `center`,
    /// splitting it there; otherwise fall back to a resistor that strictly
    /// contains either end of `[overlap_lo, overlap_hi]`, splitting at the
    /// midpoint of the clipped sub-range (the overlap range intersected
    /// with that resistor's own span). Returns `None` if no resistor spans
    /// the overlap on either preference — spec.md §4.6 step 3.
    fn coupling_node(
        &mut self,
        seg_id: SegmentId,
        axis: Axis,
        overlap_lo: f64,
        overlap_hi: f64,
        center: f64,
    ) -> Option<String> {
        let resistors = self.segments.get(seg_id).resistors.clone();
        let coord = |p: Point2D| match axis {
            Axis::X => p.x,
            Axis::Y => p.y,
        };

        for &r in &resistors {
            let res = self.graph.get(r);
            if res.is_via() {
                continue;
            }
            let (p1, p2) = (res.p1(), res.p2());
            if strictly_between(center, coord(p1), coord(p2)) {
                let split_point = match axis {
                    Axis::X => Point2D::new(center, p1.y),
                    Axis::Y => Point2D::new(p1.x, center),
                };
                if let Some((new_id, _)) =
                    self.graph.split_at(&mut self.segments, &mut self.node_ids, r, split_point)
                {
                    return Some(new_id);
                }
            }
        }

        for &r in &resistors {
            let res = self.graph.get(r);
            if res.is_via() {
                continue;
            }
            let (p1, p2) = (res.p1(), res.p2());
            let (res_lo, res_hi) = if coord(p1) <= coord(p2) {
                (coord(p1), coord(p2))
            } else {
                (coord(p2), coord(p1))
            };
            let contains_an_end = strictly_between(overlap_lo, res_lo, res_hi)
                || strictly_between(overlap_hi, res_lo, res_hi);
            if !contains_an_end {
                continue;
            }
            let mid = (overlap_lo.max(res_lo) + overlap_hi.min(res_hi)) / 2.0;
            if !strictly_between(mid, res_lo, res_hi) {
                continue;
            }
            let split_point = match axis {
                Axis::X => Point2D::new(mid, p1.y),
                Axis::Y => Point2D::new(p1.x, mid),
            };
            if let Some((new_id, _)) =
                self.graph.split_at(&mut self.segments, &mut self.node_ids, r, split_point)
            {
                return Some(new_id);
            }
        }

        tracing::debug!(?seg_id, "coupling pair has no resistor spanning the overlap range; dropped");
        None
    }
}
