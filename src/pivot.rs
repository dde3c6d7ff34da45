//! Pivot selection from equidistant samples.

use crate::geometry::sample_at;
use crate::order::Rel;

/// Upper bound on the sample counts any relation uses.
pub(crate) const MAX_SAMPLES: usize = 9;

/// Takes `n` equidistant sample references from `v`, insertion sorts them,
/// and reduces the run to a pivot via the relation. The elements themselves
/// are not moved.
pub(crate) fn select_pivot<T, R: Rel<T>>(v: &[T], n: usize) -> R::Pivot {
    debug_assert!(2 <= n && n <= MAX_SAMPLES && v.len() >= 2 * n);

    let (first, step, _) = sample_at(v.len(), n);

    let mut sam: [&T; MAX_SAMPLES] = [&v[0]; MAX_SAMPLES];
    for (i, s) in sam[..n].iter_mut().enumerate() {
        *s = &v[first + i * step];
    }

    for h in 1..n {
        let mut k = h;
        while k > 0 && R::less(sam[k], sam[k - 1]) {
            sam.swap(k, k - 1);
            k -= 1;
        }
    }

    R::pivot_from(&sam[..n])
}
