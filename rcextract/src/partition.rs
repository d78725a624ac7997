//! A coarse fixed-grid bucket index per metal layer, used only for
//! cross-net capacitance queries (C3). See spec.md §4.3.

use std::collections::{HashMap, HashSet};

use crate::geom::Rect2D;
use crate::segment::SegmentId;

/// `BIN_WIDTH` from the original phyDB source: the default bucket size in
/// design database units.
pub const DEFAULT_PARTITION_SIZE: f64 = 750.0;
/// `NUM_BINS_NEIGHBORHOOD` from the original phyDB source.
pub const DEFAULT_NUM_BINS_NEIGHBORHOOD: i32 = 2;

/// Signed floor-division cell index, so negative coordinates partition
/// the same way positive ones do (`floor(coord / size)`, not truncation).
fn cell_index(coord: f64, size: f64) -> i32 {
    (coord / size).floor() as i32
}

/// A fixed-cell bucket grid over one metal layer. A rectangle is inserted
/// into every bucket its bounding box overlaps; duplicates are expected
/// (a segment spanning k cells appears k times in the raw bucket vectors).
#[derive(Debug)]
pub struct UniformPartition {
    partition_size: f64,
    buckets: HashMap<(i32, i32), Vec<SegmentId>>,
}

impl UniformPartition {
    pub fn new(partition_size: f64) -> Self {
        Self {
            partition_size,
            buckets: HashMap::new(),
        }
    }

    fn cell_range(&self, rect: &Rect2D) -> ((i32, i32), (i32, i32)) {
        let ll = (
            cell_index(rect.ll.x, self.partition_size),
            cell_index(rect.ll.y, self.partition_size),
        );
        let ur = (
            cell_index(rect.ur.x, self.partition_size),
            cell_index(rect.ur.y, self.partition_size),
        );
        (ll, ur)
    }

    /// Inserts `id` into every bucket `rect`'s bounding box overlaps.
    pub fn add(&mut self, id: SegmentId, rect: &Rect2D) {
        let ((x0, y0), (x1, y1)) = self.cell_range(rect);
        for x in x0..=x1 {
            for y in y0..=y1 {
                self.buckets.entry((x, y)).or_default().push(id);
            }
        }
    }

    /// Returns the deduplicated union of segment ids in every bucket
    /// within `num_bins_neighborhood` cells of `rect`'s own bucket range.
    /// Callers are responsible for filtering out same-net segments —
    /// the partition only knows geometry, not net identity.
    pub fn neighbors(&self, rect: &Rect2D, num_bins_neighborhood: i32) -> Vec<SegmentId> {
        let ((x0, y0), (x1, y1)) = self.cell_range(rect);
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for x in (x0 - num_bins_neighborhood)..=(x1 + num_bins_neighborhood) {
            for y in (y0 - num_bins_neighborhood)..=(y1 + num_bins_neighborhood) {
                if let Some(ids) = self.buckets.get(&(x, y)) {
                    for &id in ids {
                        if seen.insert(id) {
                            result.push(id);
                        }
                    }
                }
            }
        }
        result
    }
}
