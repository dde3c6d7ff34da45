//! Recursion drivers and the worker budget.
//!
//! Three tiers, by range length: insertion sort at the leaves, a sequential
//! quicksort with few samples below `MAX_LEN_REC`, and above it a quicksort
//! that hands longer sides to new tasks while the live-worker count stays
//! under the configured cap. One `rayon::scope` per top-level call is the
//! completion rendezvous: the call returns only after every spawned task has
//! finished.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::order::Rel;
use crate::partition::{gap_partition, partition};
use crate::pivot::select_pivot;
use crate::smallsort::small_sort;
use crate::{max_workers, MAX_LEN_REC};

/// Live-worker budget shared by every task of one sort call. All admission
/// goes through `try_enter`, which admits strictly under the cap, so the
/// live count never exceeds `max`.
#[derive(Clone, Copy)]
pub(crate) struct Par<'a> {
    live: &'a AtomicU32,
    max: u32,
}

impl<'a> Par<'a> {
    pub(crate) fn new(live: &'a AtomicU32, max: u32) -> Self {
        Par { live, max }
    }

    pub(crate) fn try_enter(&self) -> bool {
        let mut n = self.live.load(Ordering::Relaxed);
        loop {
            if n >= self.max {
                return false;
            }
            match self
                .live
                .compare_exchange_weak(n, n + 1, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => {
                    note_peak(n + 1);
                    return true;
                }
                Err(cur) => n = cur,
            }
        }
    }

    pub(crate) fn exit(&self) {
        self.live.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn saturated(&self) -> bool {
        self.live.load(Ordering::Relaxed) >= self.max
    }
}

static WORKER_PEAK: AtomicU32 = AtomicU32::new(0);

fn note_peak(n: u32) {
    WORKER_PEAK.fetch_max(n, Ordering::Relaxed);
}

/// Highest live-worker count observed since the last reset. Test
/// instrumentation only.
#[doc(hidden)]
pub fn worker_peak() -> u32 {
    WORKER_PEAK.load(Ordering::Relaxed)
}

#[doc(hidden)]
pub fn reset_worker_peak() {
    WORKER_PEAK.store(0, Ordering::Relaxed);
}

/// Length tier dispatch shared by the sequential and parallel paths.
fn sort_task<'a, T: Send, R: Rel<T>>(par: Option<(&rayon::Scope<'a>, Par<'a>)>, v: &'a mut [T]) {
    if v.len() <= R::MAX_LEN_INS {
        small_sort::<T, R>(v);
    } else if v.len() <= MAX_LEN_REC {
        sort_short::<T, R>(v);
    } else {
        sort_long::<T, R>(par, v);
    }
}

/// Sequential quicksort for mid-size ranges: recurse into the shorter side,
/// iterate on the longer one.
fn sort_short<T, R: Rel<T>>(v: &mut [T]) {
    let mut v = v;
    while v.len() > R::MAX_LEN_INS {
        let pv = select_pivot::<T, R>(v, R::NS_SHORT);
        let k = partition::<T, R>(&mut *v, &pv);

        let rest = v;
        let (x, y) = rest.split_at_mut(k);
        let (short_side, long_side) = if x.len() <= y.len() { (x, y) } else { (y, x) };

        if short_side.len() > R::MAX_LEN_INS {
            sort_short::<T, R>(short_side);
        } else {
            small_sort::<T, R>(short_side);
        }
        v = long_side;
    }
    small_sort::<T, R>(v);
}

/// Quicksort for long ranges. When a worker budget is available, longer
/// sides above `MAX_LEN_REC` go to new tasks; the current task keeps the
/// shorter side, bounding its recursion depth.
fn sort_long<'a, T: Send, R: Rel<T>>(par: Option<(&rayon::Scope<'a>, Par<'a>)>, v: &'a mut [T]) {
    let mut v = v;
    loop {
        if v.len() <= MAX_LEN_REC {
            sort_short::<T, R>(v);
            return;
        }

        let pv = select_pivot::<T, R>(v, R::NS_LONG);
        let k = partition::<T, R>(&mut *v, &pv);

        let rest = v;
        let (x, y) = rest.split_at_mut(k);
        let (short_side, long_side) = if x.len() <= y.len() { (x, y) } else { (y, x) };

        if short_side.len() > MAX_LEN_REC {
            if let Some((s, p)) = par {
                if p.try_enter() {
                    s.spawn(move |s| {
                        sort_long::<T, R>(Some((s, p)), long_side);
                        p.exit();
                    });
                    v = short_side;
                    continue;
                }
            }
            sort_long::<T, R>(par, short_side);
        } else {
            sort_short::<T, R>(short_side);
        }
        v = long_side;
    }
}

/// Concurrent partition: one worker splits the middle half around the pivot
/// while the caller partitions the outer quarters outward across the gap;
/// whichever residual remains is swept sequentially afterwards.
fn dual_partition<T: Send, R: Rel<T>>(v: &mut [T]) -> usize {
    let len = v.len();
    let pv = select_pivot::<T, R>(v, R::NS_CONC);

    let mid = len / 2;
    let (a, b) = (mid / 2, (mid + len) / 2);

    let (m_rel, gap) = {
        let (low, rest) = v.split_at_mut(a);
        let (inner, high) = rest.split_at_mut(b - a);
        rayon::join(
            || partition::<T, R>(inner, &pv),
            || gap_partition::<T, R>(low, high, &pv),
        )
    };

    let mut k = a + m_rel;
    match gap {
        (l, h) if l < 0 => {
            // Low side consumed; sweep the unscanned tail of the high side.
            for t in (b + h)..len {
                if R::lt_pivot(&v[t], &pv) {
                    v.swap(t, k);
                    k += 1;
                }
            }
        }
        (l, _) => {
            // High side consumed; sweep the unscanned head of the low side.
            for t in (0..=l as usize).rev() {
                if R::pivot_lt(&pv, &v[t]) {
                    k -= 1;
                    v.swap(t, k);
                }
            }
        }
    }
    k
}

/// Entry point behind every typed sort. Short or capped-to-one-worker calls
/// run sequentially; otherwise the orchestrator repeatedly dual-partitions
/// the longer side, spawning tasks for the shorter sides.
pub(crate) fn sort_impl<T: Send, R: Rel<T>>(v: &mut [T]) {
    if v.len() < 2 {
        return;
    }

    let mw = max_workers();
    if mw <= 1 || v.len() < 2 * (MAX_LEN_REC + 1) {
        sort_task::<T, R>(None, v);
        return;
    }

    // The orchestrator counts as one live worker.
    let live = AtomicU32::new(1);
    note_peak(1);

    rayon::scope(|s| {
        let par = Par::new(&live, mw);
        let mut cur: &mut [T] = v;
        loop {
            let k = dual_partition::<T, R>(&mut *cur);

            let rest = cur;
            let (x, y) = rest.split_at_mut(k);
            let (short_side, long_side) = if x.len() <= y.len() { (x, y) } else { (y, x) };

            // Spawned tasks race for the same budget; admission must go
            // through the CAS or the count can overshoot the cap.
            if !par.try_enter() {
                sort_task::<T, R>(Some((s, par)), short_side);
                cur = long_side;
                break;
            }
            s.spawn(move |s| {
                sort_task::<T, R>(Some((s, par)), short_side);
                par.exit();
            });

            cur = long_side;
            if cur.len() < 2 * (MAX_LEN_REC + 1) || par.saturated() {
                break;
            }
        }
        sort_task::<T, R>(Some((s, par)), cur);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{check_sorted, Natural};
    use rand::prelude::*;

    #[test]
    fn dual_partition_split() {
        let mut rng = StdRng::seed_from_u64(11);
        for len in [994usize, 1000, 4096, 10_000] {
            for modulus in [3u32, 100, u32::MAX] {
                let mut v: Vec<u32> = (0..len).map(|_| rng.gen::<u32>() % modulus).collect();
                let k = dual_partition::<u32, Natural>(&mut v);
                assert!(k >= 1 && k < len, "len {len} k {k}");
                let max_low = v[..k].iter().max().unwrap();
                let min_high = v[k..].iter().min().unwrap();
                assert!(max_low <= min_high, "len {len} k {k}");
            }
        }
    }

    #[test]
    fn worker_cap_is_strict() {
        let mut rng = StdRng::seed_from_u64(17);
        let original: Vec<u64> = (0..1 << 20).map(|_| rng.gen()).collect();
        let mut expected = original.clone();
        expected.sort_unstable();

        crate::set_max_workers(4);
        reset_worker_peak();
        let mut v = original.clone();
        sort_impl::<u64, Natural>(&mut v);
        assert_eq!(v, expected);
        let peak = worker_peak();
        assert!(peak >= 2, "no concurrency observed");
        assert!(peak <= 4, "worker cap exceeded: {peak}");

        // Repeated runs under a tight cap give the admission race, if any,
        // many chances to overshoot.
        crate::set_max_workers(3);
        for _ in 0..8 {
            reset_worker_peak();
            let mut v = original.clone();
            sort_impl::<u64, Natural>(&mut v);
            assert_eq!(v, expected);
            assert!(worker_peak() <= 3, "worker cap exceeded: {}", worker_peak());
        }

        crate::set_max_workers(1);
        reset_worker_peak();
        let mut v = original;
        sort_impl::<u64, Natural>(&mut v);
        assert_eq!(v, expected);
        assert_eq!(worker_peak(), 0);

        crate::set_max_workers(0);
    }

    #[test]
    fn sequential_tiers() {
        let mut rng = StdRng::seed_from_u64(3);
        for len in [0usize, 1, 2, 50, 100, 101, 496, 497, 993] {
            let mut v: Vec<i32> = (0..len).map(|_| rng.gen()).collect();
            let mut expected = v.clone();
            expected.sort_unstable();
            sort_task::<i32, Natural>(None, &mut v);
            assert_eq!(v, expected, "len {len}");
            assert_eq!(check_sorted::<i32, Natural>(&v), 0);
        }
    }
}
