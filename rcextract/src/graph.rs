//! The resistor graph (C4): an append-only arena of planar and via
//! resistors with mutable node IDs and endpoints, plus mid-segment
//! splitting and re-parenting. See spec.md §3, §4.4.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::geom::Point2D;
use crate::segment::{SegmentId, SegmentStore};

/// Stable arena index for a `Resistor`. Splitting only ever appends; no
/// resistor is ever deleted. Spec.md §9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResistorId(pub u32);

/// One branch of the RC graph. Spec.md §3 describes this as a single type
/// with a `-1` area sentinel; here the sentinel is replaced by a Rust enum
/// so a via can't be read as having a length/width and vice versa — see
/// SPEC_FULL.md §3.
#[derive(Debug, Clone)]
pub enum Resistor {
    Planar {
        n1: String,
        n2: String,
        material: String,
        length: f64,
        width: f64,
        p1: Point2D,
        p2: Point2D,
        owner: SegmentId,
    },
    Via {
        n1: String,
        n2: String,
        material: String,
        area: f64,
        p1: Point2D,
        p2: Point2D,
        owner: SegmentId,
    },
}

impl Resistor {
    pub fn n1(&self) -> &str {
        match self {
            Resistor::Planar { n1, .. } | Resistor::Via { n1, .. } => n1,
        }
    }

    pub fn n2(&self) -> &str {
        match self {
            Resistor::Planar { n2, .. } | Resistor::Via { n2, .. } => n2,
        }
    }

    pub fn set_n1(&mut self, id: String) {
        match self {
            Resistor::Planar { n1, .. } | Resistor::Via { n1, .. } => *n1 = id,
        }
    }

    pub fn set_n2(&mut self, id: String) {
        match self {
            Resistor::Planar { n2, .. } | Resistor::Via { n2, .. } => *n2 = id,
        }
    }

    pub fn owner(&self) -> SegmentId {
        match self {
            Resistor::Planar { owner, .. } | Resistor::Via { owner, .. } => *owner,
        }
    }

    pub fn material(&self) -> &str {
        match self {
            Resistor::Planar { material, .. } | Resistor::Via { material, .. } => material,
        }
    }

    pub fn p1(&self) -> Point2D {
        match self {
            Resistor::Planar { p1, .. } | Resistor::Via { p1, .. } => *p1,
        }
    }

    pub fn p2(&self) -> Point2D {
        match self {
            Resistor::Planar { p2, .. } | Resistor::Via { p2, .. } => *p2,
        }
    }

    pub fn is_via(&self) -> bool {
        matches!(self, Resistor::Via { .. })
    }

    /// The net this resistor belongs to, derived from its owning segment.
    pub fn net_name(&self, segments: &SegmentStore) -> String {
        segments.get(self.owner()).net_name.clone()
    }
}

/// Coupling branch between two nodes of distinct nets. Immutable after
/// creation. Spec.md §3.
#[derive(Debug, Clone, Serialize)]
pub struct Capacitor {
    pub n1: String,
    pub n2: String,
    pub material: String,
    pub overlap_length: f64,
    pub distance: f64,
}

/// Per-net monotonic node-ID counter. Not persisted across runs; two runs
/// over the same input, iterated deterministically, produce identical IDs.
/// Spec.md §4.1.
#[derive(Debug, Default)]
pub struct NodeIdGen {
    counters: BTreeMap<String, u64>,
}

impl NodeIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch-and-increment the counter for `net`, formatted `"net{k}"`.
    pub fn next(&mut self, net: &str) -> String {
        let counter = self.counters.entry(net.to_string()).or_insert(0);
        let k = *counter;
        *counter += 1;
        format!("{net}{{{k}}}")
    }

    /// Sum of per-net counters — the number of distinct node IDs minted.
    /// Used by property check P2.
    pub fn total_nodes(&self) -> u64 {
        self.counters.values().sum()
    }
}

/// The owned arena of resistors and capacitors. Spec.md §3.
#[derive(Debug, Default)]
pub struct ResistorGraph {
    resistors: Vec<Resistor>,
    capacitors: Vec<Capacitor>,
}

impl ResistorGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a resistor and registers it in its owner segment's
    /// back-reference list.
    pub fn push(&mut self, segments: &mut SegmentStore, resistor: Resistor) -> ResistorId {
        let id = ResistorId(self.resistors.len() as u32);
        let owner = resistor.owner();
        self.resistors.push(resistor);
        segments.get_mut(owner).resistors.push(id);
        id
    }

    pub fn get(&self, id: ResistorId) -> &Resistor {
        &self.resistors[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: ResistorId) -> &mut Resistor {
        &mut self.resistors[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.resistors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resistors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resistor> {
        self.resistors.iter()
    }

    pub fn capacitors(&self) -> &[Capacitor] {
        &self.capacitors
    }

    pub fn push_capacitor(&mut self, cap: Capacitor) {
        self.capacitors.push(cap);
    }

    /// Re-parents a resistor to `new_owner`: removes it from the old
    /// owner's back-reference list (linear scan — 0..O(few) resistors per
    /// segment) and appends it to the new owner's. Spec.md §4.4.
    pub fn reparent(&mut self, segments: &mut SegmentStore, id: ResistorId, new_owner: SegmentId) {
        let old_owner = self.get(id).owner();
        if old_owner == new_owner {
            return;
        }
        let old_list = &mut segments.get_mut(old_owner).resistors;
        if let Some(pos) = old_list.iter().position(|&r| r == id) {
            old_list.remove(pos);
        }
        segments.get_mut(new_owner).resistors.push(id);
        match self.get_mut(id) {
            Resistor::Planar { owner, .. } | Resistor::Via { owner, .. } => *owner = new_owner,
        }
    }

    /// Splits a planar resistor at `q`, a point strictly interior to its
    /// endpoints on the same axis. `r` keeps `n1`, adopts a fresh node as
    /// `n2`, and shortens to `q`; the returned resistor picks up the
    /// remainder, owned by the same segment. Spec.md §4.4.
    ///
    /// Returns `None` (and logs a warning) if `r` is a via resistor or `q`
    /// is not strictly interior — an inconsistent-split soft warning,
    /// never a panic or corrupted graph.
    pub fn split_at(
        &mut self,
        segments: &mut SegmentStore,
        node_ids: &mut NodeIdGen,
        id: ResistorId,
        q: Point2D,
    ) -> Option<(String, ResistorId)> {
        let (net, material, old_length, old_n2, p1, p2, owner, width) = match self.get(id) {
            Resistor::Via { .. } => {
                tracing::warn!(?id, "inconsistent split: cannot split a via resistor");
                return None;
            }
            Resistor::Planar {
                n2,
                material,
                length,
                width,
                p1,
                p2,
                owner,
                ..
            } => (
                segments.get(*owner).net_name.clone(),
                material.clone(),
                *length,
                n2.clone(),
                *p1,
                *p2,
                *owner,
                *width,
            ),
        };

        let interior = if p1.x == p2.x {
            q.x == p1.x && crate::geom::strictly_between(q.y, p1.y, p2.y)
        } else {
            q.y == p1.y && crate::geom::strictly_between(q.x, p1.x, p2.x)
        };
        if !interior {
            tracing::warn!(?id, ?q, "inconsistent split: point is not strictly interior");
            return None;
        }

        let new_id = node_ids.next(&net);
        let new_length = if p1.x == p2.x {
            (q.y - p1.y).abs()
        } else {
            (q.x - p1.x).abs()
        };

        if let Resistor::Planar { n2, p2, length, .. } = self.get_mut(id) {
            *n2 = new_id.clone();
            *p2 = q;
            *length = new_length;
        }

        let remainder = Resistor::Planar {
            n1: new_id.clone(),
            n2: old_n2,
            material,
            length: old_length - new_length,
            width,
            p1: q,
            p2,
            owner,
        };
        let remainder_id = self.push(segments, remainder);
        Some((new_id, remainder_id))
    }
}
