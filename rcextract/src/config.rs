//! Numeric knobs passed at `Geometry` construction. See spec.md §6.

use crate::partition::{DEFAULT_NUM_BINS_NEIGHBORHOOD, DEFAULT_PARTITION_SIZE};

/// Spatial-index tuning. `partition_size` is the bucket width in design
/// database units; `num_bins_neighborhood` is how many buckets out a
/// capacitance query scans around a segment's own bucket range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryConfig {
    pub partition_size: f64,
    pub num_bins_neighborhood: i32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            partition_size: DEFAULT_PARTITION_SIZE,
            num_bins_neighborhood: DEFAULT_NUM_BINS_NEIGHBORHOOD,
        }
    }
}
