//! Sorting opaque collections through a less-and-conditionally-swap callback.
//!
//! The engine never sees element values, only indices. The callback
//! `lsw(i, k, r, s)` must implement: if element `i` orders strictly before
//! element `k` under a strict weak order, swap elements `r` and `s` (when
//! `r != s`) and return true, otherwise return false. Calls with `r == s`
//! are pure ordering queries. A swap is only ever requested together with a
//! comparison the engine already knows to hold, so the callback never swaps
//! spuriously.
//!
//! The concurrent path works because the pivot is a fixed slot: the worker
//! partitions the middle half with cursors that stop at the pivot slot and
//! never write it, while the caller partitions the outer quarters and only
//! reads the slot through queries. Residuals are reconciled sequentially
//! after both finish.

use std::sync::atomic::AtomicU32;

use crate::geometry::sample_at;
use crate::quicksort::Par;
use crate::{max_workers, MAX_LEN_INS_FC, MAX_LEN_REC};

const NS_SHORT: usize = 3;
const NS_LONG: usize = 7;
const NS_CONC: usize = 9;

/// First index `i` in `1..n` where element `i` orders strictly before
/// element `i - 1`, or 0 when the collection is sorted. The callback is only
/// invoked with `r == s`, so it never swaps.
pub fn is_sorted_lesswap<F>(n: usize, lsw: F) -> usize
where
    F: Fn(usize, usize, usize, usize) -> bool,
{
    for i in 1..n {
        if lsw(i, i - 1, i, i) {
            return i;
        }
    }
    0
}

/// Sorts `n` elements of an opaque collection ascending through `lsw`.
///
/// Large collections are sorted by concurrent tasks; `lsw` must therefore
/// tolerate concurrent calls on disjoint index ranges (plus concurrent
/// read-only queries against the current pivot index). Guarding the whole
/// collection with a mutex inside the callback is the simple way to comply.
pub fn sort_lesswap<F>(n: usize, lsw: F)
where
    F: Fn(usize, usize, usize, usize) -> bool + Sync,
{
    if n < 2 {
        return;
    }

    let mw = max_workers();
    if mw <= 1 || n < 2 * (MAX_LEN_REC + 1) {
        sort_task(None, &lsw, 0, n);
        return;
    }

    let live = AtomicU32::new(1);
    rayon::scope(|s| {
        let par = Par::new(&live, mw);
        let lsw = &lsw;
        let (mut lo, mut hi) = (0, n);
        loop {
            let p = dual_partition(lsw, lo, hi);

            // Element `p` is in its final position; split around it.
            let (short, long) = if p - lo <= hi - p - 1 {
                ((lo, p), (p + 1, hi))
            } else {
                ((p + 1, hi), (lo, p))
            };

            // Admission must go through the CAS; spawned tasks race for the
            // same budget.
            if !par.try_enter() {
                sort_task(Some((s, par)), lsw, short.0, short.1);
                lo = long.0;
                hi = long.1;
                break;
            }
            s.spawn(move |s| {
                sort_task(Some((s, par)), lsw, short.0, short.1);
                par.exit();
            });

            lo = long.0;
            hi = long.1;
            if hi - lo < 2 * (MAX_LEN_REC + 1) || par.saturated() {
                break;
            }
        }
        sort_task(Some((s, par)), lsw, lo, hi);
    });
}

fn sort_task<'a, F>(par: Option<(&rayon::Scope<'a>, Par<'a>)>, lsw: &'a F, lo: usize, hi: usize)
where
    F: Fn(usize, usize, usize, usize) -> bool + Sync,
{
    let len = hi - lo;
    if len <= MAX_LEN_INS_FC {
        insertion(lsw, lo, hi);
    } else if len <= MAX_LEN_REC {
        sort_short(lsw, lo, hi);
    } else {
        sort_long(par, lsw, lo, hi);
    }
}

/// Insertion sort on `[lo, hi)` via adjacent conditional swaps, with the
/// half-distance pairing pre-pass on ranges above half the threshold.
fn insertion<F>(lsw: &F, lo: usize, hi: usize)
where
    F: Fn(usize, usize, usize, usize) -> bool,
{
    let len = hi - lo;
    if len < 2 {
        return;
    }
    if len > MAX_LEN_INS_FC / 2 {
        let m = len / 2;
        for i in (lo..lo + m).rev() {
            lsw(i + m, i, i + m, i);
        }
    }
    for h in lo + 1..hi {
        let mut k = h;
        while k > lo && lsw(k, k - 1, k, k - 1) {
            k -= 1;
        }
    }
}

/// Insertion sorts `n` equidistant sample elements in place and returns the
/// middle sample's index, which becomes the pivot slot.
fn select_pivot<F>(lsw: &F, lo: usize, hi: usize, n: usize) -> usize
where
    F: Fn(usize, usize, usize, usize) -> bool,
{
    let (first, step, _) = sample_at(hi - lo, n);
    let pos = |i: usize| lo + first + i * step;

    for h in 1..n {
        let mut k = h;
        while k > 0 && lsw(pos(k), pos(k - 1), pos(k), pos(k - 1)) {
            k -= 1;
        }
    }
    pos(n / 2)
}

/// Two-pointer partition of `[lo, hi)` around the element at slot `pv`,
/// following the pivot through swaps that move it. Returns `k` in
/// `lo + 1..hi` with elements of `[lo, k)` at or below the pivot and
/// elements of `[k, hi)` at or above it.
fn partition_track<F>(lsw: &F, lo: usize, hi: usize, mut pv: usize) -> usize
where
    F: Fn(usize, usize, usize, usize) -> bool,
{
    let mut l = lo;
    let mut h = hi - 1;

    while l < h {
        if lsw(h, pv, h, h) {
            // Element h belongs low; scan up for one at or above the pivot.
            loop {
                if !lsw(l, pv, l, l) {
                    lsw(h, l, h, l);
                    if pv == l {
                        pv = h;
                    } else if pv == h {
                        pv = l;
                    }
                    break;
                }
                l += 1;
                if l >= h {
                    return l + 1;
                }
            }
        } else if lsw(pv, l, pv, pv) {
            // Element l belongs high; scan down for one at or below.
            loop {
                h -= 1;
                if l >= h {
                    return l;
                }
                if !lsw(pv, h, pv, pv) {
                    lsw(h, l, h, l);
                    if pv == l {
                        pv = h;
                    } else if pv == h {
                        pv = l;
                    }
                    break;
                }
            }
        }
        l += 1;
        h -= 1;
    }

    if l == h && lsw(l, pv, l, l) {
        l += 1;
    }
    l
}

fn sort_short<F>(lsw: &F, lo: usize, hi: usize)
where
    F: Fn(usize, usize, usize, usize) -> bool,
{
    let (mut lo, mut hi) = (lo, hi);
    while hi - lo > MAX_LEN_INS_FC {
        let pv = select_pivot(lsw, lo, hi, NS_SHORT);
        let k = partition_track(lsw, lo, hi, pv);

        let (short, long) = if k - lo <= hi - k {
            ((lo, k), (k, hi))
        } else {
            ((k, hi), (lo, k))
        };
        if short.1 - short.0 > MAX_LEN_INS_FC {
            sort_short(lsw, short.0, short.1);
        } else {
            insertion(lsw, short.0, short.1);
        }
        lo = long.0;
        hi = long.1;
    }
    insertion(lsw, lo, hi);
}

fn sort_long<'a, F>(par: Option<(&rayon::Scope<'a>, Par<'a>)>, lsw: &'a F, lo: usize, hi: usize)
where
    F: Fn(usize, usize, usize, usize) -> bool + Sync,
{
    let (mut lo, mut hi) = (lo, hi);
    loop {
        if hi - lo <= MAX_LEN_REC {
            sort_short(lsw, lo, hi);
            return;
        }

        let pv = select_pivot(lsw, lo, hi, NS_LONG);
        let k = partition_track(lsw, lo, hi, pv);

        let (short, long) = if k - lo <= hi - k {
            ((lo, k), (k, hi))
        } else {
            ((k, hi), (lo, k))
        };

        if short.1 - short.0 > MAX_LEN_REC {
            if let Some((s, p)) = par {
                if p.try_enter() {
                    s.spawn(move |s| {
                        sort_long(Some((s, p)), lsw, short.0, short.1);
                        p.exit();
                    });
                    lo = long.0;
                    hi = long.1;
                    continue;
                }
            }
            sort_long(par, lsw, short.0, short.1);
        } else {
            sort_short(lsw, short.0, short.1);
        }
        lo = long.0;
        hi = long.1;
    }
}

/// Barrier partition of `[lo, hi)` around the fixed pivot slot `pv` inside
/// it. Cursors approach the slot from both ends and stop there, so the slot
/// is never written and stays valid for concurrent queries. Returns the
/// cursor positions `(l, h)`; the unscanned residual is `(pv, h]` when
/// `l == pv`, or `[l, pv)` when `h == pv`.
fn partition_barrier<F>(lsw: &F, lo: usize, hi: usize, pv: usize) -> (usize, usize)
where
    F: Fn(usize, usize, usize, usize) -> bool,
{
    let mut l = lo;
    let mut h = hi - 1;

    while l < pv && pv < h {
        if lsw(h, pv, h, h) {
            loop {
                if !lsw(l, pv, l, l) {
                    lsw(h, l, h, l);
                    break;
                }
                l += 1;
                if l >= pv {
                    return (l, h);
                }
            }
        } else if lsw(pv, l, pv, pv) {
            loop {
                h -= 1;
                if h <= pv {
                    return (l, h);
                }
                if !lsw(pv, h, pv, pv) {
                    lsw(h, l, h, l);
                    break;
                }
            }
        }
        l += 1;
        h -= 1;
    }

    (l, h)
}

/// Outward partition of the outer quarters `[lo, a)` and `[b, hi)` across
/// the gap owned by the barrier worker. Only reads the pivot slot. Returns
/// `(l, h)`: either `l < lo` (low quarter consumed, `[h, hi)` unscanned) or
/// `h == hi` (high quarter consumed, `[lo, l]` unscanned).
fn gap_partition<F>(lsw: &F, lo: usize, a: usize, b: usize, hi: usize, pv: usize) -> (isize, usize)
where
    F: Fn(usize, usize, usize, usize) -> bool,
{
    let mut l = a as isize - 1;
    let mut h = b;

    while l >= lo as isize && h < hi {
        if lsw(h, pv, h, h) {
            loop {
                let lu = l as usize;
                if !lsw(lu, pv, lu, lu) {
                    lsw(h, lu, h, lu);
                    break;
                }
                l -= 1;
                if l < lo as isize {
                    return (l, h);
                }
            }
        } else if lsw(pv, l as usize, pv, pv) {
            loop {
                h += 1;
                if h >= hi {
                    return (l, h);
                }
                if !lsw(pv, h, pv, pv) {
                    lsw(h, l as usize, h, l as usize);
                    break;
                }
            }
        }
        l -= 1;
        h += 1;
    }

    (l, h)
}

/// After a forced swap moved the pivot element up to slot `j`, restore the
/// boundary: pull the pivot back to `p + 1`, or hand the pivot role to the
/// equal element already sitting there.
fn step_up<F>(lsw: &F, p: &mut usize, j: usize)
where
    F: Fn(usize, usize, usize, usize) -> bool,
{
    let q = *p + 1;
    lsw(j, q, j, q);
    *p = q;
}

/// Mirror of `step_up` for a pivot moved down to slot `j`.
fn step_down<F>(lsw: &F, p: &mut usize, j: usize)
where
    F: Fn(usize, usize, usize, usize) -> bool,
{
    let q = *p - 1;
    lsw(q, j, q, j);
    *p = q;
}

/// Concurrent partition of `[lo, hi)`: barrier partition of the middle half
/// on a worker, gap partition of the outer quarters on the caller, then a
/// sequential sweep of both residuals. Returns the pivot element's final
/// slot `p`: `[lo, p)` is at or below it, `(p, hi)` at or above.
fn dual_partition<F>(lsw: &F, lo: usize, hi: usize) -> usize
where
    F: Fn(usize, usize, usize, usize) -> bool + Sync,
{
    let len = hi - lo;
    let mut p = select_pivot(lsw, lo, hi, NS_CONC);

    let a = lo + len / 4;
    let b = lo + (len / 2 + len) / 2;
    debug_assert!(a < p && p < b);

    let ((bl, bh), (gl, gh)) = rayon::join(
        || partition_barrier(lsw, a, b, p),
        || gap_partition(lsw, lo, a, b, hi, p),
    );

    // Inner residual first: it is adjacent to the pivot slot.
    if bh > p {
        let mut j = p;
        while j < bh {
            j += 1;
            if lsw(j, p, j, p) {
                step_up(lsw, &mut p, j);
            }
        }
    } else if bl < p {
        let mut j = p;
        while j > bl {
            j -= 1;
            if lsw(p, j, p, j) {
                step_down(lsw, &mut p, j);
            }
        }
    }

    // Outer residual.
    if gl < lo as isize {
        let mut t = gh;
        while t < hi {
            if lsw(t, p, t, p) {
                step_up(lsw, &mut p, t);
            }
            t += 1;
        }
    } else {
        let mut t = gl as usize + 1;
        while t > lo {
            t -= 1;
            if lsw(p, t, p, t) {
                step_down(lsw, &mut p, t);
            }
        }
    }

    p
}
