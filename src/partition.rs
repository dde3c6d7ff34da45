//! Branch-light two-pointer partitioning.
//!
//! Both loops below keep the per-iteration comparison count at two for
//! already-placed elements: the hot path is the trailing advance of both
//! cursors, taken whenever neither side holds a stray. Runs of pivot-equal
//! elements take that path too, which keeps the split near the middle on
//! duplicate-heavy inputs.

use crate::order::Rel;

/// Partitions `v` around `pv`. Returns `k` such that `v[..k]` holds only
/// elements `<= pv` and `v[k..]` only elements `>= pv`. When the pivot is
/// derived from element values, `k` lands in `1..v.len()`.
pub(crate) fn partition<T, R: Rel<T>>(v: &mut [T], pv: &R::Pivot) -> usize {
    let mut l = 0;
    let mut h = v.len() - 1;

    while l < h {
        if R::lt_pivot(&v[h], pv) {
            // v[h] belongs low; scan up for a high-bound partner.
            loop {
                if !R::lt_pivot(&v[l], pv) {
                    v.swap(l, h);
                    break;
                }
                l += 1;
                if l >= h {
                    return l + 1;
                }
            }
        } else if R::pivot_lt(pv, &v[l]) {
            // v[l] belongs high; scan down for a low-bound partner.
            loop {
                h -= 1;
                if l >= h {
                    return l;
                }
                if !R::pivot_lt(pv, &v[h]) {
                    v.swap(l, h);
                    break;
                }
            }
        }
        l += 1;
        h -= 1;
    }

    if l == h && R::lt_pivot(&v[l], pv) {
        l += 1;
    }
    l
}

/// Outward partition of the two regions flanking a gap.
///
/// `low` and `high` are the outer pieces of one contiguous range whose
/// interior is being partitioned by another task. Cursors start at the gap
/// and move outward, swapping strays across it; the interior is never
/// touched. Returns `(l, h)`: either `l < 0` (the low piece is fully
/// classified, `high[h..]` is left unscanned) or `h == high.len()` (the high
/// piece is fully classified, `low[..=l]` is left unscanned).
pub(crate) fn gap_partition<T, R: Rel<T>>(
    low: &mut [T],
    high: &mut [T],
    pv: &R::Pivot,
) -> (isize, usize) {
    let mut l = low.len() as isize - 1;
    let mut h = 0usize;

    while l >= 0 && h < high.len() {
        if R::lt_pivot(&high[h], pv) {
            loop {
                if !R::lt_pivot(&low[l as usize], pv) {
                    core::mem::swap(&mut low[l as usize], &mut high[h]);
                    break;
                }
                l -= 1;
                if l < 0 {
                    return (l, h);
                }
            }
        } else if R::pivot_lt(pv, &low[l as usize]) {
            loop {
                h += 1;
                if h >= high.len() {
                    return (l, h);
                }
                if !R::pivot_lt(pv, &high[h]) {
                    core::mem::swap(&mut low[l as usize], &mut high[h]);
                    break;
                }
            }
        }
        l -= 1;
        h += 1;
    }

    (l, h)
}
