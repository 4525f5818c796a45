// src/pool/partition.rs

use std::ops::Range;

/// Splits rows `[0, dimension)` into `workers` contiguous ranges.
///
/// Each range holds `dimension / workers` rows and the last one also absorbs
/// the remainder. The ranges are disjoint, ordered, and cover every row exactly
/// once. Returns an empty list when `workers == 0`.
///
/// ```
/// use qsquad::pool::partition_rows;
///
/// assert_eq!(partition_rows(10, 3), vec![0..3, 3..6, 6..10]);
/// ```
pub fn partition_rows(dimension: usize, workers: usize) -> Vec<Range<usize>> {
    if workers == 0 {
        return Vec::new();
    }
    let per_worker = dimension / workers;
    (0..workers)
        .map(|t| {
            let start = t * per_worker;
            let end = if t + 1 == workers { dimension } else { start + per_worker };
            start..end
        })
        .collect()
}
