//! Error types for the RC extraction engine.
//!
//! Fatal conditions (malformed input, a capacitance query against an
//! unpopulated layer) surface as `Result::Err`. Soft conditions (an
//! inconsistent split, a duplicate fuse with no matching geometry,
//! re-invoking an already-populated `Geometry`) are logged via `tracing`
//! and skip the offending operation instead — see spec.md §7.

use thiserror::Error;

/// Errors raised while ingesting wire geometry into a `Geometry`.
#[derive(Debug, Error, PartialEq)]
pub enum GeomError {
    #[error("rectangle is degenerate or inverted: ll={ll:?}, ur={ur:?}")]
    DegenerateRect { ll: (f64, f64), ur: (f64, f64) },

    #[error(
        "segment {net}:{segment_number} has non-axis-aligned centerline p1={p1:?} p2={p2:?}"
    )]
    NonAxisAlignedCenterline {
        net: String,
        segment_number: u32,
        p1: (f64, f64),
        p2: (f64, f64),
    },

    #[error("via segment {net}:{segment_number} has a degenerate footprint rectangle")]
    DegenerateViaFootprint { net: String, segment_number: u32 },
}

/// Errors raised while querying the spatial index.
#[derive(Debug, Error, PartialEq)]
pub enum PartitionError {
    #[error("capacitance query against unpopulated layer '{layer}'")]
    UnknownLayer { layer: String },
}
