//! The WireSegment store: an append-only arena of wire rectangles grouped
//! by net, in insertion order. See spec.md §3, §4.2.

use std::collections::BTreeMap;

use crate::error::GeomError;
use crate::geom::{Point2D, Rect2D};
use crate::graph::ResistorId;

/// Stable, arena-index identifier for a `WireSegment`. Never invalidated —
/// the store only ever appends. Spec.md §9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(pub u32);

/// One physical rectangle of routing: a planar metal segment or a via
/// footprint. Spec.md §3.
#[derive(Debug, Clone)]
pub struct WireSegment {
    pub id: SegmentId,
    pub net_name: String,
    pub layer_name: String,
    /// Unique within the net, assigned in insertion order.
    pub segment_number: u32,
    pub rect: Rect2D,
    /// Centerline endpoints. Equal for a via footprint.
    pub p1: Point2D,
    pub p2: Point2D,
    /// Earlier same-net segments this one continues planarly into.
    pub horizontal_connections: Vec<SegmentId>,
    /// Earlier same-net segments directly below this one in a via stack.
    pub vertical_connections: Vec<SegmentId>,
    /// Back-references into the resistor graph. Non-owning.
    pub resistors: Vec<ResistorId>,
}

impl WireSegment {
    /// A via footprint is a segment whose centerline has collapsed to a
    /// single point.
    pub fn is_via(&self) -> bool {
        self.p1.x == self.p2.x && self.p1.y == self.p2.y
    }
}

/// Per-net, insertion-ordered collection of `WireSegment`s, plus the arena
/// backing all segments regardless of net. Spec.md §4.2.
#[derive(Debug, Default)]
pub struct SegmentStore {
    arena: Vec<WireSegment>,
    /// `BTreeMap` so pass iteration over nets is in sorted key order, as
    /// spec.md §4.5 requires for determinism.
    nets: BTreeMap<String, Vec<SegmentId>>,
}

impl SegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new segment to `net`. The caller supplies
    /// `horizontal_predecessors`/`vertical_predecessors` directly — the
    /// store never infers them after the fact (spec.md §4.2).
    #[allow(clippy::too_many_arguments)]
    pub fn add_to_net(
        &mut self,
        net_name: &str,
        layer_name: &str,
        rect: Rect2D,
        p1: Point2D,
        p2: Point2D,
        horizontal_predecessors: Vec<SegmentId>,
        vertical_predecessors: Vec<SegmentId>,
    ) -> Result<SegmentId, GeomError> {
        let segment_number = self.nets.get(net_name).map_or(0, |v| v.len()) as u32;

        let is_via = p1.x == p2.x && p1.y == p2.y;
        if is_via {
            if rect.is_degenerate() {
                return Err(GeomError::DegenerateViaFootprint {
                    net: net_name.to_string(),
                    segment_number,
                });
            }
        } else if p1.axis_to(&p2).is_none() {
            return Err(GeomError::NonAxisAlignedCenterline {
                net: net_name.to_string(),
                segment_number,
                p1: (p1.x, p1.y),
                p2: (p2.x, p2.y),
            });
        }

        let id = SegmentId(self.arena.len() as u32);
        self.arena.push(WireSegment {
            id,
            net_name: net_name.to_string(),
            layer_name: layer_name.to_string(),
            segment_number,
            rect,
            p1,
            p2,
            horizontal_connections: horizontal_predecessors,
            vertical_connections: vertical_predecessors,
            resistors: Vec::new(),
        });
        self.nets.entry(net_name.to_string()).or_default().push(id);
        Ok(id)
    }

    pub fn get(&self, id: SegmentId) -> &WireSegment {
        &self.arena[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: SegmentId) -> &mut WireSegment {
        &mut self.arena[id.0 as usize]
    }

    /// Two segments at a time, for pairwise passes — avoids borrow-checker
    /// contortions from indexing the same `Vec` twice mutably.
    pub fn get_two_mut(&mut self, a: SegmentId, b: SegmentId) -> (&mut WireSegment, &mut WireSegment) {
        assert_ne!(a, b, "get_two_mut requires distinct segment ids");
        let (lo, hi) = if a.0 < b.0 { (a, b) } else { (b, a) };
        let (left, right) = self.arena.split_at_mut(hi.0 as usize);
        let lo_ref = &mut left[lo.0 as usize];
        let hi_ref = &mut right[0];
        if a.0 < b.0 {
            (lo_ref, hi_ref)
        } else {
            (hi_ref, lo_ref)
        }
    }

    /// Net names and their segment ids, in sorted net-name order and
    /// insertion order within each net — the iteration order spec.md §4.5
    /// requires for determinism.
    pub fn nets_sorted(&self) -> impl Iterator<Item = (&str, &[SegmentId])> {
        self.nets.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn segments_of(&self, net: &str) -> &[SegmentId] {
        self.nets.get(net).map_or(&[], |v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WireSegment> {
        self.arena.iter()
    }
}
