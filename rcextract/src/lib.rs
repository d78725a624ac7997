//! rcextract - RC parasitic extraction over tagged wire geometry
//!
//! This library turns a stream of tagged wire rectangles (planar metal
//! segments and via footprints, as an external physical-database layer
//! would hand off after walking DEF PATH/VIA records) into a resistor-
//! capacitor network: one resistor per stretch of wire or via, stitched
//! together at planar and via connections, plus coupling capacitors
//! between same-layer wires on different nets that run close enough to
//! couple.
//!
//! # Quick Start
//!
//! ```no_run
//! use rcextract::{Geometry, GeometryConfig};
//! use rcextract::geom::{Point2D, Rect2D};
//!
//! let mut geo = Geometry::new(GeometryConfig::default());
//! geo.add_segment(
//!     "CLK",
//!     "M1",
//!     Rect2D::new(Point2D::new(0.0, 0.0), Point2D::new(100.0, 10.0)).unwrap(),
//!     Point2D::new(0.0, 5.0),
//!     Point2D::new(100.0, 5.0),
//!     vec![],
//!     vec![],
//! ).unwrap();
//! geo.generate_rc_network().unwrap();
//! print!("{}", geo.render_to_string());
//! ```
//!
//! # Modules
//!
//! - [`geom`]: points, rectangles, and the containment/overlap predicates
//!   everything else is built on
//! - [`segment`]: the wire-segment arena, grouped by net
//! - [`graph`]: the resistor/capacitor arena, node-id minting, splitting
//! - [`partition`]: the per-layer spatial index used for capacitance
//!   queries
//! - [`ingest`]: the serde contract an external driver feeds rectangles
//!   through
//! - [`config`]: spatial-index tuning knobs
//! - [`emit`]: text serialization of the finished network
//! - `engine`: [`Geometry`], the type that owns everything and runs the
//!   four-pass resistor builder and the capacitance builder

pub mod config;
pub mod emit;
mod engine;
pub mod error;
pub mod geom;
pub mod graph;
pub mod ingest;
pub mod partition;
pub mod segment;

pub use config::GeometryConfig;
pub use engine::Geometry;
pub use error::{GeomError, PartitionError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::GeometryConfig;
    pub use crate::error::{GeomError, PartitionError};
    pub use crate::geom::{Axis, Point2D, Rect2D};
    pub use crate::graph::{Capacitor, Resistor};
    pub use crate::ingest::{IngestError, IngestSegment};
    pub use crate::segment::WireSegment;
    pub use crate::Geometry;
}
