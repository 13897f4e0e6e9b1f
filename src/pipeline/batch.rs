//! Batch planning
//!
//! Caps the prioritized file list and partitions it into fixed-size,
//! order-preserving chunks. One chunk becomes one generation request.

use super::collector::CollectedFile;

/// Caps `files` at `max_files` and partitions the rest into contiguous
/// chunks of at most `batch_size`.
///
/// The final chunk may be smaller; no chunk is empty. The concatenation of
/// all chunks equals the capped input exactly.
pub fn plan_batches(
    mut files: Vec<CollectedFile>,
    max_files: usize,
    batch_size: usize,
) -> Vec<Vec<CollectedFile>> {
    assert!(batch_size > 0, "batch_size must be positive");

    files.truncate(max_files);

    let mut batches = Vec::with_capacity(files.len().div_ceil(batch_size));
    let mut remaining = files;
    while !remaining.is_empty() {
        let tail = remaining.split_off(batch_size.min(remaining.len()));
        batches.push(remaining);
        remaining = tail;
    }
    batches
}
