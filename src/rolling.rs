//! # Rolling Window
//! Clamped index windows over a day's message list.
//!
//! Every windowed stage (heat, participation, joke/banter context, stressor
//! context, banter blocks) asks for a range around an index. The window
//! never crosses the day slice, so all arithmetic saturates instead of
//! failing.

use std::ops::Range;

/// Half-open `[i - before, i + after)` clamped to `[0, len)`.
#[inline]
pub fn half_open(i: usize, before: usize, after: usize, len: usize) -> Range<usize> {
    let start = i.saturating_sub(before).min(len);
    let end = i.saturating_add(after).min(len);
    start..end.max(start)
}

/// Inclusive `[i - radius, i + radius]` clamped to `[0, len)`, as a half-open range.
#[inline]
pub fn inclusive(i: usize, radius: usize, len: usize) -> Range<usize> {
    half_open(i, radius, radius.saturating_add(1), len)
}

/// Mean of `values[range]`; `0.0` for an empty range.
pub fn mean_over(values: &[u8], range: Range<usize>) -> f32 {
    let slice = &values[range];
    if slice.is_empty() {
        return 0.0;
    }
    let sum: u32 = slice.iter().map(|&v| v as u32).sum();
    sum as f32 / slice.len() as f32
}
