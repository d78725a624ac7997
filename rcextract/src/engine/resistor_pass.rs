//! The resistor-network builder (C5): four deterministic passes over
//! wire segments, in sorted net order and insertion order within each
//! net. See spec.md §4.5.

use std::collections::{BTreeMap, HashMap};

use crate::geom::{rect_contains, strictly_between, Point2D, Rect2D};
use crate::graph::{Resistor, ResistorId};
use crate::segment::SegmentId;

use super::Geometry;

impl Geometry {
    pub(super) fn populate_resistor_network(&mut self) {
        if !self.graph.is_empty() {
            tracing::warn!("resistor network already populated; skipping pass 1-4 re-run");
            return;
        }
        self.pass1_intrinsic_resistors();
        self.pass2_stitch();
        self.pass3_planar_fuse();
        self.pass4_via_fuse();
    }

    /// Pass 1 — one planar resistor per non-via segment, fresh node ids on
    /// both ends. Via segments (`p1 == p2`) produce no resistor here.
    fn pass1_intrinsic_resistors(&mut self) {
        let nets: Vec<String> = self.segments.nets_sorted().map(|(n, _)| n.to_string()).collect();
        for net in nets {
            let seg_ids = self.segments.segments_of(&net).to_vec();
            for seg_id in seg_ids {
                let seg = self.segments.get(seg_id);
                if seg.is_via() {
                    continue;
                }
                let (p1, p2, rect, layer) = (seg.p1, seg.p2, seg.rect, seg.layer_name.clone());
                let (length, width) = planar_length_width(p1, p2, &rect);
                let n1 = self.node_ids.next(&net);
                let n2 = self.node_ids.next(&net);
                self.graph.push(
                    &mut self.segments,
                    Resistor::Planar {
                        n1,
                        n2,
                        material: layer,
                        length,
                        width,
                        p1,
                        p2,
                        owner: seg_id,
                    },
                );
            }
        }
    }

    /// Pass 2 — wires horizontal (escape resistor) and vertical (via
    /// stack) predecessor tags.
    fn pass2_stitch(&mut self) {
        let nets: Vec<String> = self.segments.nets_sorted().map(|(n, _)| n.to_string()).collect();
        for net in nets {
            let seg_ids = self.segments.segments_of(&net).to_vec();
            for seg_id in seg_ids {
                let horizontal = self.segments.get(seg_id).horizontal_connections.clone();
                for prev_id in horizontal {
                    let prev = self.segments.get(prev_id);
                    let curr = self.segments.get(seg_id);
                    let p1 = prev.p2;
                    let p2 = curr.p1;
                    let curr_rect = curr.rect;
                    let layer = curr.layer_name.clone();
                    let (length, width) = planar_length_width(p1, p2, &curr_rect);
                    let n1 = self.node_ids.next(&net);
                    let n2 = self.node_ids.next(&net);
                    self.graph.push(
                        &mut self.segments,
                        Resistor::Planar {
                            n1,
                            n2,
                            material: layer,
                            length,
                            width,
                            p1,
                            p2,
                            owner: prev_id,
                        },
                    );
                }

                let vertical = self.segments.get(seg_id).vertical_connections.clone();
                for prev_id in vertical {
                    self.stitch_vertical(&net, prev_id, seg_id);
                }
            }
        }
    }

    /// Binds `prev` (directly below) to `curr` (directly above) in a via
    /// stack. Ensures `curr` has a representative node — a via-type
    /// resistor if it has none yet, otherwise its first resistor's `n1` —
    /// then either creates a via-type resistor for `prev` around that node
    /// or overwrites `prev`'s first resistor's `n2` with it. Spec.md §4.5
    /// Pass 2. Neither side is assumed to be a via footprint: a planar
    /// wire landing on a via already has its pass-1 resistor in
    /// `resistors[0]`, so the "no resistors yet" branch only ever fires
    /// for the via segment itself.
    fn stitch_vertical(&mut self, net: &str, prev_id: SegmentId, curr_id: SegmentId) {
        let curr_bottom = match self.segments.get(curr_id).resistors.first().copied() {
            Some(r0) => self.graph.get(r0).n1().to_string(),
            None => {
                let seg = self.segments.get(curr_id);
                let (area, p1, p2, layer) = (seg.rect.area(), seg.p1, seg.p2, seg.layer_name.clone());
                let bottom = self.node_ids.next(net);
                let top = self.node_ids.next(net);
                self.graph.push(
                    &mut self.segments,
                    Resistor::Via {
                        n1: bottom.clone(),
                        n2: top,
                        material: layer,
                        area,
                        p1,
                        p2,
                        owner: curr_id,
                    },
                );
                bottom
            }
        };

        match self.segments.get(prev_id).resistors.first().copied() {
            Some(r0) => self.graph.get_mut(r0).set_n2(curr_bottom),
            None => {
                let seg = self.segments.get(prev_id);
                let (area, p1, p2, layer) = (seg.rect.area(), seg.p1, seg.p2, seg.layer_name.clone());
                let fresh = self.node_ids.next(net);
                self.graph.push(
                    &mut self.segments,
                    Resistor::Via {
                        n1: fresh,
                        n2: curr_bottom,
                        material: layer,
                        area,
                        p1,
                        p2,
                        owner: prev_id,
                    },
                );
            }
        }
    }

    /// Pass 3 — fuses same-net, same-layer planar overlaps: two physically
    /// touching rectangles end up sharing one node at their shared corner
    /// instead of two freshly-minted, disconnected ones. Spec.md §4.5
    /// Pass 3.
    ///
    /// Two cases are handled, covering every shape of corner touch this
    /// spec's scenarios exercise:
    /// - **exact join**: an endpoint of one planar resistor coincides
    ///   exactly with an endpoint of another (same net, same layer) — the
    ///   common case, e.g. a pass-2 escape resistor whose own ends sit
    ///   exactly on the centerline points of the segments it bridges. No
    ///   split needed; every id minted at a shared point is rewritten to
    ///   one canonical id. This is checked across *all* of a layer's
    ///   resistors at once rather than pairwise, because the coincidence
    ///   that needs resolving (e.g. an escape resistor's two ends) is
    ///   often between two resistors owned by the *same* segment.
    /// - **interior join**: a resistor endpoint of one segment lands
    ///   strictly inside the span of a resistor on another (a corner
    ///   lands mid-edge, not at an end). The interior resistor is split at
    ///   that point and the new sub-resistor is re-parented and merged,
    ///   per spec.md §4.4.
    fn pass3_planar_fuse(&mut self) {
        let nets: Vec<String> = self.segments.nets_sorted().map(|(n, _)| n.to_string()).collect();
        for net in &nets {
            let seg_ids = self.segments.segments_of(net).to_vec();
            let mut by_layer: BTreeMap<String, Vec<SegmentId>> = BTreeMap::new();
            for seg_id in seg_ids {
                by_layer
                    .entry(self.segments.get(seg_id).layer_name.clone())
                    .or_default()
                    .push(seg_id);
            }
            for segs in by_layer.into_values() {
                self.fuse_coincident_endpoints(&segs);
            }
        }
        self.for_each_overlapping_pair(|geo, a, b| geo.fuse_interior_overlap(a, b));
    }

    /// Unifies every group of planar resistor endpoints, among the given
    /// same-net same-layer segments, that sit at exactly the same point.
    /// The first id seen at a point becomes canonical; every other
    /// resistor touching that point is rewritten to it.
    fn fuse_coincident_endpoints(&mut self, segs: &[SegmentId]) {
        let mut canonical: HashMap<(u64, u64), String> = HashMap::new();
        for &seg_id in segs {
            for &r in &self.segments.get(seg_id).resistors.clone() {
                if self.graph.get(r).is_via() {
                    continue;
                }
                for side in [Side::N1, Side::N2] {
                    let pt = match side {
                        Side::N1 => self.graph.get(r).p1(),
                        Side::N2 => self.graph.get(r).p2(),
                    };
                    let key = (pt.x.to_bits(), pt.y.to_bits());
                    let node = endpoint_node(self.graph.get(r), side).to_string();
                    match canonical.get(&key) {
                        None => {
                            canonical.insert(key, node);
                        }
                        Some(existing) if existing != &node => {
                            let existing = existing.clone();
                            set_endpoint_node(self.graph.get_mut(r), side, existing);
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Pass 4 — same containment test as pass 3, but merges via-type
    /// resistors instead of planar ones. Spec.md §4.5 Pass 4.
    fn pass4_via_fuse(&mut self) {
        self.for_each_overlapping_pair(|geo, a, b| geo.fuse_via_pair(a, b));
    }

    /// Iterates same-net, same-layer segment pairs in canonical
    /// `(net_name, segment_number)` order, applying `handler` to every
    /// pair whose rectangles share a corner. Spec.md §9: pair order is an
    /// explicit lexicographic tuple, never the source's string-concat key.
    fn for_each_overlapping_pair(&mut self, handler: impl Fn(&mut Self, SegmentId, SegmentId)) {
        let nets: Vec<String> = self.segments.nets_sorted().map(|(n, _)| n.to_string()).collect();
        for net in nets {
            let seg_ids = self.segments.segments_of(&net).to_vec();
            for i in 0..seg_ids.len() {
                for j in (i + 1)..seg_ids.len() {
                    let (a, b) = (seg_ids[i], seg_ids[j]);
                    let (layer_a, layer_b, rect_a, rect_b) = {
                        let sa = self.segments.get(a);
                        let sb = self.segments.get(b);
                        (sa.layer_name.clone(), sb.layer_name.clone(), sa.rect, sb.rect)
                    };
                    if layer_a != layer_b {
                        continue;
                    }
                    let touches = rect_contains(&rect_a, &rect_b.ll)
                        || rect_contains(&rect_a, &rect_b.ur)
                        || rect_contains(&rect_b, &rect_a.ll)
                        || rect_contains(&rect_b, &rect_a.ur);
                    if !touches {
                        continue;
                    }
                    handler(self, a, b);
                }
            }
        }
    }

    fn fuse_interior_overlap(&mut self, a: SegmentId, b: SegmentId) {
        if self.segments.get(a).resistors.is_empty() || self.segments.get(b).resistors.is_empty() {
            return;
        }
        let a_planar: Vec<ResistorId> = self
            .segments
            .get(a)
            .resistors
            .iter()
            .copied()
            .filter(|&r| !self.graph.get(r).is_via())
            .collect();
        let b_planar: Vec<ResistorId> = self
            .segments
            .get(b)
            .resistors
            .iter()
            .copied()
            .filter(|&r| !self.graph.get(r).is_via())
            .collect();

        // A resistor endpoint of one segment lands strictly inside the
        // span of a resistor on the other — exact-coincidence corners
        // were already resolved by `fuse_coincident_endpoints`.
        for &ra in &a_planar {
            let (p1, p2) = (self.graph.get(ra).p1(), self.graph.get(ra).p2());
            for &endpt in &[p1, p2] {
                for &rb in &b_planar {
                    if point_strictly_interior(self.graph.get(rb), endpt) {
                        if let Some((new_id, remainder)) =
                            self.graph.split_at(&mut self.segments, &mut self.node_ids, rb, endpt)
                        {
                            self.graph.reparent(&mut self.segments, remainder, a);
                            let node_at_endpt = endpoint_node_at(self.graph.get(ra), endpt)
                                .map(|s| s.to_string())
                                .unwrap_or(new_id);
                            set_endpoint_node_at(self.graph.get_mut(remainder), endpt, node_at_endpt);
                            return;
                        }
                    }
                }
            }
        }
        tracing::debug!(?a, ?b, "duplicate fuse: no matching endpoint geometry, skipped");
    }

    fn fuse_via_pair(&mut self, a: SegmentId, b: SegmentId) {
        let a_vias: Vec<ResistorId> = self
            .segments
            .get(a)
            .resistors
            .iter()
            .copied()
            .filter(|&r| self.graph.get(r).is_via())
            .collect();
        let b_vias: Vec<ResistorId> = self
            .segments
            .get(b)
            .resistors
            .iter()
            .copied()
            .filter(|&r| self.graph.get(r).is_via())
            .collect();
        if a_vias.is_empty() && b_vias.is_empty() {
            return;
        }

        if let (Some(&ra), Some(&rb)) = (a_vias.first(), b_vias.first()) {
            let dangling_a = dangling_via_side(self, a, ra);
            let dangling_b = dangling_via_side(self, b, rb);
            let node = endpoint_node(self.graph.get(ra), dangling_a).to_string();
            let overwritten = endpoint_node(self.graph.get(rb), dangling_b);
            debug_assert_ne!(
                overwritten, node,
                "via fuse re-merging an already-shared node; likely double-processed pair"
            );
            set_endpoint_node(self.graph.get_mut(rb), dangling_b, node);
            return;
        }

        // Exactly one side has a via resistor: attach its free node to
        // whichever planar resistor endpoint geometrically coincides with
        // the via footprint.
        let (via_seg, via_res, other_planar) = if let Some(&ra) = a_vias.first() {
            (a, ra, b)
        } else if let Some(&rb) = b_vias.first() {
            (b, rb, a)
        } else {
            return;
        };
        let dangling_side = dangling_via_side(self, via_seg, via_res);
        let via_point = self.segments.get(via_seg).p1;
        for &rp in &self.segments.get(other_planar).resistors.clone() {
            if self.graph.get(rp).is_via() {
                continue;
            }
            if let Some(side) = endpoint_matching(self.graph.get(rp), via_point) {
                let node = endpoint_node(self.graph.get(via_res), dangling_side).to_string();
                set_endpoint_node(self.graph.get_mut(rp), side, node);
                return;
            }
        }
    }
}

fn planar_length_width(p1: Point2D, p2: Point2D, rect: &Rect2D) -> (f64, f64) {
    if p1.x != p2.x {
        ((p1.x - p2.x).abs(), rect.width_y())
    } else {
        ((p1.y - p2.y).abs(), rect.width_x())
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Side {
    N1,
    N2,
}

fn endpoint_node(r: &Resistor, side: Side) -> &str {
    match side {
        Side::N1 => r.n1(),
        Side::N2 => r.n2(),
    }
}

fn set_endpoint_node(r: &mut Resistor, side: Side, id: String) {
    match side {
        Side::N1 => r.set_n1(id),
        Side::N2 => r.set_n2(id),
    }
}

fn endpoint_node_at(r: &Resistor, pt: Point2D) -> Option<&str> {
    endpoint_matching(r, pt).map(|side| endpoint_node(r, side))
}

fn set_endpoint_node_at(r: &mut Resistor, pt: Point2D, id: String) {
    if let Some(side) = endpoint_matching(r, pt) {
        set_endpoint_node(r, side, id);
    }
}

fn endpoint_matching(r: &Resistor, pt: Point2D) -> Option<Side> {
    if points_eq(r.p1(), pt) {
        Some(Side::N1)
    } else if points_eq(r.p2(), pt) {
        Some(Side::N2)
    } else {
        None
    }
}

fn points_eq(a: Point2D, b: Point2D) -> bool {
    a.x == b.x && a.y == b.y
}

fn point_strictly_interior(r: &Resistor, pt: Point2D) -> bool {
    let (p1, p2) = (r.p1(), r.p2());
    if p1.x == p2.x {
        pt.x == p1.x && strictly_between(pt.y, p1.y, p2.y)
    } else if p1.y == p2.y {
        pt.y == p1.y && strictly_between(pt.x, p1.x, p2.x)
    } else {
        false
    }
}

/// A via's dangling (free) node: its bottom is already bound when the
/// segment has a recorded vertical predecessor (pass 2 wired it), so the
/// free end is the top; otherwise the bottom is still free. Spec.md §4.5
/// Pass 4.
fn dangling_via_side(geo: &Geometry, seg: SegmentId, _via: ResistorId) -> Side {
    if !geo.segments.get(seg).vertical_connections.is_empty() {
        Side::N2
    } else {
        Side::N1
    }
}
