//! Element adapters: the ordering relations the engine is instantiated for.
//!
//! The partition and driver code is generic over a [`Rel`], which bundles the
//! element-to-element comparison, the element-to-pivot comparisons, and how a
//! pivot is derived from a run of sorted samples. Keeping the pivot as an
//! associated type lets the by-length relation partition strings around a
//! plain integer and the lexicographic relation around a synthesised byte
//! string, while the primitive relations use the element type itself.

/// Ordering relation for element type `T`, plus the tuning constants tied to
/// its comparison cost.
pub(crate) trait Rel<T> {
    /// Value the partition loops compare elements against.
    type Pivot: Clone + Send + Sync;

    /// Insertion-sort threshold for this domain.
    const MAX_LEN_INS: usize;
    /// Sample counts for the short, long and concurrent paths.
    const NS_SHORT: usize;
    const NS_LONG: usize;
    const NS_CONC: usize;

    fn less(a: &T, b: &T) -> bool;

    /// `a <= b` under the relation. The default is the negation of `less`;
    /// the float relations override it with IEEE `<=` so that a NaN anywhere
    /// reports as out of order.
    fn le(a: &T, b: &T) -> bool {
        !Self::less(b, a)
    }

    fn lt_pivot(v: &T, pv: &Self::Pivot) -> bool;
    fn pivot_lt(pv: &Self::Pivot, v: &T) -> bool;

    /// Reduces the sorted sample run to a pivot: the middle sample for odd
    /// counts, the mean of the middle pair for even counts.
    fn pivot_from(sam: &[&T]) -> Self::Pivot;
}

/// First index `i` with `v[i - 1] > v[i]` under the relation, or 0 when the
/// slice is sorted.
pub(crate) fn check_sorted<T, R: Rel<T>>(v: &[T]) -> usize {
    for i in 1..v.len() {
        if !R::le(&v[i - 1], &v[i]) {
            return i;
        }
    }
    0
}

// --- Primitive relations ---

/// Standard `<` on primitives. Floats only reach the engine through this
/// relation after the NaN policy pass, except under `Propagate` where NaN
/// compares false both ways and behaves like an element equal to everything.
pub(crate) struct Natural;

macro_rules! natural_rel {
    ($($t:ident)*) => {
        $(
            impl Rel<$t> for Natural {
                type Pivot = $t;

                const MAX_LEN_INS: usize = crate::MAX_LEN_INS;
                const NS_SHORT: usize = 3;
                const NS_LONG: usize = 7;
                const NS_CONC: usize = 9;

                #[inline(always)]
                fn less(a: &$t, b: &$t) -> bool {
                    a < b
                }

                #[inline(always)]
                fn le(a: &$t, b: &$t) -> bool {
                    a <= b
                }

                #[inline(always)]
                fn lt_pivot(v: &$t, pv: &$t) -> bool {
                    v < pv
                }

                #[inline(always)]
                fn pivot_lt(pv: &$t, v: &$t) -> bool {
                    pv < v
                }

                #[inline]
                fn pivot_from(sam: &[&$t]) -> $t {
                    *sam[sam.len() / 2]
                }
            }
        )*
    };
}

natural_rel! { i32 i64 u32 u64 isize usize f32 f64 }

// --- Byte-content relation ---

/// Memcmp order over the byte content of strings and byte sequences.
pub(crate) struct Lexical;

impl<T: AsRef<[u8]>> Rel<T> for Lexical {
    type Pivot = Vec<u8>;

    const MAX_LEN_INS: usize = crate::MAX_LEN_INS_FC;
    const NS_SHORT: usize = 4;
    const NS_LONG: usize = 6;
    const NS_CONC: usize = 8;

    #[inline]
    fn less(a: &T, b: &T) -> bool {
        a.as_ref() < b.as_ref()
    }

    #[inline]
    fn lt_pivot(v: &T, pv: &Vec<u8>) -> bool {
        v.as_ref() < pv.as_slice()
    }

    #[inline]
    fn pivot_lt(pv: &Vec<u8>, v: &T) -> bool {
        pv.as_slice() < v.as_ref()
    }

    fn pivot_from(sam: &[&T]) -> Vec<u8> {
        debug_assert!(sam.len() % 2 == 0);
        let a = sam[sam.len() / 2 - 1].as_ref();
        let b = sam[sam.len() / 2].as_ref();
        byte_mean(a, b)
    }
}

/// Deterministic mean of two byte strings with `a <= b`: returns `m` with
/// `a <= m <= b`, a strictly-between synthesis whenever one exists at the
/// first differing byte, otherwise exactly `a`. The synthesis is a short
/// prefix, which keeps later pivot comparisons cheap.
fn byte_mean(a: &[u8], b: &[u8]) -> Vec<u8> {
    debug_assert!(a <= b);

    let n = a.len().min(b.len());
    for k in 0..n {
        if a[k] == b[k] {
            continue;
        }
        let mid = a[k] + (b[k] - a[k]) / 2;
        if mid > a[k] {
            let mut m = a[..k].to_vec();
            m.push(mid);
            return m;
        }
        // Adjacent bytes leave nothing strictly in between.
        return a.to_vec();
    }
    if a.len() < b.len() {
        // `a` is a proper prefix of `b`; anything extending `a` while staying
        // at or below `b`'s next byte sits between the two.
        let mut m = a.to_vec();
        m.push(b[n] / 2);
        return m;
    }
    a.to_vec()
}

// --- Length relation ---

/// Compares strings or byte sequences by content length only.
pub(crate) struct ByLen;

impl<T: AsRef<[u8]>> Rel<T> for ByLen {
    type Pivot = usize;

    const MAX_LEN_INS: usize = crate::MAX_LEN_INS_FC;
    const NS_SHORT: usize = 4;
    const NS_LONG: usize = 6;
    const NS_CONC: usize = 8;

    #[inline]
    fn less(a: &T, b: &T) -> bool {
        a.as_ref().len() < b.as_ref().len()
    }

    #[inline]
    fn lt_pivot(v: &T, pv: &usize) -> bool {
        v.as_ref().len() < *pv
    }

    #[inline]
    fn pivot_lt(pv: &usize, v: &T) -> bool {
        *pv < v.as_ref().len()
    }

    fn pivot_from(sam: &[&T]) -> usize {
        debug_assert!(sam.len() % 2 == 0);
        let la = sam[sam.len() / 2 - 1].as_ref().len();
        let lb = sam[sam.len() / 2].as_ref().len();
        // Overflow-free integer mean.
        la / 2 + lb / 2 + (la & lb & 1)
    }
}

// --- Float NaN policy pass ---

pub(crate) trait MaybeNan: Copy {
    fn is_nan_v(self) -> bool;
}

impl MaybeNan for f32 {
    fn is_nan_v(self) -> bool {
        self.is_nan()
    }
}

impl MaybeNan for f64 {
    fn is_nan_v(self) -> bool {
        self.is_nan()
    }
}

/// Moves every NaN to the back of `v`; returns the length of the NaN-free
/// prefix, which is what gets sorted.
pub(crate) fn sink_nans_end<T: MaybeNan>(v: &mut [T]) -> usize {
    let mut l = 0;
    let mut h = v.len();
    while l < h {
        if v[l].is_nan_v() {
            h -= 1;
            v.swap(l, h);
        } else {
            l += 1;
        }
    }
    h
}

/// Moves every NaN to the front of `v`; returns the start of the NaN-free
/// suffix.
pub(crate) fn sink_nans_start<T: MaybeNan>(v: &mut [T]) -> usize {
    let mut l = 0;
    let mut h = v.len();
    while l < h {
        if v[h - 1].is_nan_v() {
            v.swap(l, h - 1);
            l += 1;
        } else {
            h -= 1;
        }
    }
    l
}
