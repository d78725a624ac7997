//! `Geometry`: the core, owning every WireSegment, Resistor, and Capacitor
//! (spec.md §3, §5). Segments are added incrementally as DEF paths are
//! parsed upstream; once all nets are ingested, `generate_rc_network` runs
//! once and `Geometry` becomes read-only in spirit (nothing enforces it at
//! the type level, but re-invocation is a no-op per spec.md §7).

mod capacitance_pass;
mod resistor_pass;

use std::collections::HashMap;
use std::io::{self, Write};

use crate::config::GeometryConfig;
use crate::emit;
use crate::error::{GeomError, PartitionError};
use crate::geom::{Point2D, Rect2D};
use crate::graph::{NodeIdGen, ResistorGraph};
use crate::ingest::{IngestError, IngestSegment};
use crate::partition::UniformPartition;
use crate::segment::{SegmentId, SegmentStore};

pub struct Geometry {
    pub(crate) segments: SegmentStore,
    pub(crate) partitions: HashMap<String, UniformPartition>,
    pub(crate) node_ids: NodeIdGen,
    pub(crate) graph: ResistorGraph,
    config: GeometryConfig,
    populated: bool,
}

impl Geometry {
    pub fn new(config: GeometryConfig) -> Self {
        Self {
            segments: SegmentStore::new(),
            partitions: HashMap::new(),
            node_ids: NodeIdGen::new(),
            graph: ResistorGraph::new(),
            config,
            populated: false,
        }
    }

    pub fn config(&self) -> GeometryConfig {
        self.config
    }

    /// Adds one wire rectangle to its net and to its layer's spatial
    /// index — `Geometry::addWireSegment` in the original source
    /// (spec.md §4.2, §4.3).
    #[allow(clippy::too_many_arguments)]
    pub fn add_segment(
        &mut self,
        net_name: &str,
        layer_name: &str,
        rect: Rect2D,
        p1: Point2D,
        p2: Point2D,
        horizontal_predecessors: Vec<SegmentId>,
        vertical_predecessors: Vec<SegmentId>,
    ) -> Result<SegmentId, GeomError> {
        let id = self.segments.add_to_net(
            net_name,
            layer_name,
            rect,
            p1,
            p2,
            horizontal_predecessors,
            vertical_predecessors,
        )?;
        self.partitions
            .entry(layer_name.to_string())
            .or_insert_with(|| UniformPartition::new(self.config.partition_size))
            .add(id, &rect);
        Ok(id)
    }

    /// Replays a stream of already-tagged rectangles from an external
    /// collaborator (spec.md §6). Predecessors are given as segment
    /// numbers within the same net; entries must arrive in net-local
    /// insertion order so each predecessor already exists.
    pub fn ingest(&mut self, entries: Vec<IngestSegment>) -> Result<(), IngestError> {
        for entry in entries {
            let expected = self.segments.segments_of(&entry.net_name).len() as u32;
            if entry.segment_number != expected {
                return Err(IngestError::SegmentNumberMismatch {
                    net: entry.net_name.clone(),
                    given: entry.segment_number,
                    expected,
                });
            }
            let net_segs = self.segments.segments_of(&entry.net_name).to_vec();
            let resolve = |nums: &[u32]| -> Result<Vec<SegmentId>, IngestError> {
                nums.iter()
                    .map(|&n| {
                        net_segs.get(n as usize).copied().ok_or_else(|| {
                            IngestError::UnknownPredecessor {
                                net: entry.net_name.clone(),
                                segment_number: entry.segment_number,
                                predecessor: n,
                            }
                        })
                    })
                    .collect()
            };
            let horizontal = resolve(&entry.horizontal_predecessors)?;
            let vertical = resolve(&entry.vertical_predecessors)?;
            self.add_segment(
                &entry.net_name,
                &entry.layer_name,
                entry.rect,
                entry.p1,
                entry.p2,
                horizontal,
                vertical,
            )?;
        }
        Ok(())
    }

    /// Runs the resistor-network builder (C5) followed by the
    /// capacitance-network builder (C6). One-shot: re-invoking on an
    /// already-populated `Geometry` is a soft warning and a no-op
    /// (spec.md §7).
    pub fn generate_rc_network(&mut self) -> Result<(), PartitionError> {
        if self.populated {
            tracing::warn!("generate_rc_network called on an already-populated Geometry; no-op");
            return Ok(());
        }
        self.populate_resistor_network();
        self.populate_capacitance_network()?;
        self.populated = true;
        Ok(())
    }

    pub fn print_rc_network(&self, w: &mut impl Write) -> io::Result<()> {
        emit::print_rc_network(&self.graph, &self.segments, w)
    }

    pub fn render_to_string(&self) -> String {
        emit::render_to_string(&self.graph, &self.segments)
    }

    pub fn segments(&self) -> &SegmentStore {
        &self.segments
    }

    pub fn graph(&self) -> &ResistorGraph {
        &self.graph
    }

    pub fn node_ids(&self) -> &NodeIdGen {
        &self.node_ids
    }
}
