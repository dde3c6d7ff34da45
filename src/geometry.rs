//! Equidistant sample geometry.
//!
//! Pivot selection draws a handful of samples from the range it is about to
//! partition. The positions come from [`sample_at`], which spreads `n`
//! samples over a range of `len` elements so that no element is far from its
//! nearest sample and the two unsampled tails stay balanced.

/// Returns `(first, step, last)` placing `n` equidistant samples at
/// `first, first + step, .., last` inside `[0, len)`.
///
/// Guarantees for `len >= 2 * n` and `n >= 2`:
///
/// - `first < last < len` and `step >= 2`,
/// - `last - first == (n - 1) * step`,
/// - the tails `[0, first)` and `[last + 1, len)` differ in length by at
///   most one, the larger tail sitting on the `first` side,
/// - `step` is `len / n` rounded to nearest, clamped so the span fits, which
///   keeps the tail-to-sample and sample-to-sample distances from
///   dominating each other.
pub fn sample_at(len: usize, n: usize) -> (usize, usize, usize) {
    debug_assert!(n >= 2 && len >= 2 * n);

    let mut step = (len + n / 2) / n;
    // The span (n - 1) * step must leave at least one index of slack so that
    // `last < len` holds after centering.
    let fit = (len - 1) / (n - 1);
    if step > fit {
        step = fit;
    }

    let span = (n - 1) * step;
    let first = (len - span) / 2;

    (first, step, first + span)
}
