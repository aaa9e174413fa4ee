//! Chunk partitioning of the candidate list
//!
//! The candidate list is cut into contiguous slices of `len / divisor`
//! elements; the last slice takes whatever is left. With a list shorter than
//! the divisor the whole list becomes one chunk.

/// Nominal chunk size for `len` candidates split by `divisor`
///
/// A zero divisor is treated as one.
pub fn chunk_size(len: usize, divisor: usize) -> usize {
    match len / divisor.max(1) {
        0 => len,
        size => size,
    }
}

/// Split `items` into contiguous, order-preserving chunks
///
/// An empty input yields no chunks.
pub fn partition<T>(items: &[T], divisor: usize) -> Vec<&[T]> {
    if items.is_empty() {
        return Vec::new();
    }
    items.chunks(chunk_size(items.len(), divisor)).collect()
}
