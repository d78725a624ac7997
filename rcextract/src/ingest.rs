//! The ingestion contract: the tagged rectangle stream a physical database
//! (PhyDB) hands to the extraction core. See spec.md §6.
//!
//! This crate does not parse LEF/DEF — DEF PATH/VIA/RECT traversal and the
//! rules that turn them into tagged rectangles are the responsibility of
//! that external collaborator. `IngestSegment` is the wire format this
//! crate accepts in its place: one entry per rectangle, `serde`-deserializable
//! from the JSON a driver program reads off disk.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::GeomError;
use crate::geom::{Point2D, Rect2D};

/// One tagged wire rectangle, matching the per-net tuple spec.md §6
/// describes: `(net_name, segment_number, layer_name, rect, p1, p2,
/// horizontal_predecessors, vertical_predecessors)`.
///
/// `horizontal_predecessors`/`vertical_predecessors` are segment numbers
/// (not arena ids) of earlier entries in the *same net* — stable because
/// entries must be given in the order their net was populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSegment {
    pub net_name: String,
    pub segment_number: u32,
    pub layer_name: String,
    pub rect: Rect2D,
    pub p1: Point2D,
    pub p2: Point2D,
    #[serde(default)]
    pub horizontal_predecessors: Vec<u32>,
    #[serde(default)]
    pub vertical_predecessors: Vec<u32>,
}

#[derive(Debug, Error, PartialEq)]
pub enum IngestError {
    #[error(transparent)]
    Geom(#[from] GeomError),

    #[error(
        "segment {net}:{given} arrived out of order — expected segment_number {expected}"
    )]
    SegmentNumberMismatch {
        net: String,
        given: u32,
        expected: u32,
    },

    #[error("segment {net}:{segment_number} references unknown predecessor {predecessor}")]
    UnknownPredecessor {
        net: String,
        segment_number: u32,
        predecessor: u32,
    },
}
