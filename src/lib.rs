//! In-place, unstable, parallel sorting for slices, byte sequences and
//! opaque collections.
//!
//! The engine is a quicksort over three length tiers: insertion sort at the
//! leaves, a sequential quicksort with median-of-samples pivots in the
//! middle, and a task-spawning quicksort on top whose live-worker count is
//! capped by [`set_max_workers`]. Large top-level ranges are additionally
//! split by a two-task concurrent partition. All sorts are in place: no
//! allocation proportional to the input.
//!
//! Entry points come in three layers:
//!
//! - typed functions per element kind: [`sort_i32`], [`sort_u64`],
//!   [`sort_f64`], [`sort_lex`], [`sort_by_len`], [`sort_ptr`], with
//!   matching `is_sorted_*` checks returning the first out-of-order index
//!   (or 0 when sorted);
//! - untyped dispatchers over `dyn Any` vectors: [`sort_slice`] and
//!   [`sort_len`];
//! - the callback engine [`sort_lesswap`], which sorts any indexable
//!   collection through a user-supplied compare-and-swap closure.
//!
//! [`search`] rounds things out with a binary search over a monotonic
//! predicate, the natural lookup companion for a sorted collection.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use once_cell::sync::OnceCell;

mod dispatch;
mod geometry;
mod lesswap;
mod order;
mod partition;
pub mod patterns;
mod pivot;
mod quicksort;
mod search;
mod smallsort;

pub use dispatch::{is_sorted_len, is_sorted_slice, sort_len, sort_slice};
pub use lesswap::{is_sorted_lesswap, sort_lesswap};
pub use search::search;

#[doc(hidden)]
pub use quicksort::{reset_worker_peak, worker_peak};

/// Ranges at or below this length are insertion sorted.
pub const MAX_LEN_INS: usize = 100;

/// Insertion threshold for strings, byte sequences and callback
/// collections, whose comparisons are heavier.
pub const MAX_LEN_INS_FC: usize = 40;

/// Ranges at or below this length are sorted sequentially; longer ranges
/// may be handed to new workers.
pub const MAX_LEN_REC: usize = 496;

// --- Configuration ---

static MAX_WORKERS: AtomicU32 = AtomicU32::new(0);

fn default_workers() -> u32 {
    static DEFAULT: OnceCell<u32> = OnceCell::new();
    *DEFAULT.get_or_init(|| {
        std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(1)
    })
}

/// Caps the number of concurrently live workers per sort call. `0` restores
/// the default, the machine's available parallelism. `1` forces every call
/// sequential. Applies to calls started after the store; calls in flight
/// keep their cap.
pub fn set_max_workers(n: u32) {
    MAX_WORKERS.store(n, Ordering::Relaxed);
}

/// The current worker cap, always at least 1.
pub fn max_workers() -> u32 {
    match MAX_WORKERS.load(Ordering::Relaxed) {
        0 => default_workers().max(1),
        n => n,
    }
}

/// What [`sort_f32`] and [`sort_f64`] do with NaN elements, which have no
/// place in a total order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NanPolicy {
    /// Leave NaNs where they are; the elements around them end up ordered
    /// only within NaN-free stretches.
    Propagate = 0,
    /// Move all NaNs to the end of the slice, sort the rest.
    SinkEnd = 1,
    /// Move all NaNs to the front of the slice, sort the rest.
    SinkStart = 2,
}

static NAN_POLICY: AtomicU8 = AtomicU8::new(NanPolicy::SinkEnd as u8);

pub fn set_nan_policy(p: NanPolicy) {
    NAN_POLICY.store(p as u8, Ordering::Relaxed);
}

pub fn nan_policy() -> NanPolicy {
    match NAN_POLICY.load(Ordering::Relaxed) {
        0 => NanPolicy::Propagate,
        2 => NanPolicy::SinkStart,
        _ => NanPolicy::SinkEnd,
    }
}

// --- Typed entry points ---

macro_rules! integer_entries {
    ($($t:ident)*) => {
        paste::paste! { $(
            #[doc = concat!("Sorts a `", stringify!($t), "` slice ascending; in place, unstable, parallel on large inputs.")]
            pub fn [<sort_ $t>](v: &mut [$t]) {
                quicksort::sort_impl::<$t, order::Natural>(v);
            }

            #[doc = concat!("First index `i` with `v[i - 1] > v[i]`, or 0 when `v` is sorted.")]
            pub fn [<is_sorted_ $t>](v: &[$t]) -> usize {
                order::check_sorted::<$t, order::Natural>(v)
            }
        )* }
    };
}

integer_entries! { i32 i64 u32 u64 isize usize }

macro_rules! float_entries {
    ($($t:ident)*) => {
        paste::paste! { $(
            #[doc = concat!("Sorts an `", stringify!($t), "` slice ascending, handling NaNs per the current [`NanPolicy`].")]
            pub fn [<sort_ $t>](v: &mut [$t]) {
                match nan_policy() {
                    NanPolicy::Propagate => quicksort::sort_impl::<$t, order::Natural>(v),
                    NanPolicy::SinkEnd => {
                        let n = order::sink_nans_end(v);
                        quicksort::sort_impl::<$t, order::Natural>(&mut v[..n]);
                    }
                    NanPolicy::SinkStart => {
                        let k = order::sink_nans_start(v);
                        quicksort::sort_impl::<$t, order::Natural>(&mut v[k..]);
                    }
                }
            }

            #[doc = concat!("First index `i` where `v[i - 1] <= v[i]` fails under IEEE `<=`, or 0. A NaN anywhere reports as out of order.")]
            pub fn [<is_sorted_ $t>](v: &[$t]) -> usize {
                order::check_sorted::<$t, order::Natural>(v)
            }
        )* }
    };
}

float_entries! { f32 f64 }

/// Sorts a slice of raw pointers ascending by address.
pub fn sort_ptr<T>(v: &mut [*const T]) {
    // SAFETY: thin const pointers have usize's size, alignment and validity;
    // reordering them as addresses is exactly the intended order.
    let words = unsafe { &mut *(v as *mut [*const T] as *mut [usize]) };
    sort_usize(words);
}

/// First out-of-order index of a pointer slice ordered by address, or 0.
pub fn is_sorted_ptr<T>(v: &[*const T]) -> usize {
    // SAFETY: same layout argument as `sort_ptr`, read-only.
    let words = unsafe { &*(v as *const [*const T] as *const [usize]) };
    is_sorted_usize(words)
}

/// Sorts strings or byte sequences ascending in lexicographic (byte-wise)
/// order.
pub fn sort_lex<T>(v: &mut [T])
where
    T: AsRef<[u8]> + Send,
{
    quicksort::sort_impl::<T, order::Lexical>(v);
}

/// First lexicographically out-of-order index, or 0 when sorted.
pub fn is_sorted_lex<T: AsRef<[u8]>>(v: &[T]) -> usize {
    order::check_sorted::<T, order::Lexical>(v)
}

/// Sorts strings or byte sequences ascending by content length only.
pub fn sort_by_len<T>(v: &mut [T])
where
    T: AsRef<[u8]> + Send,
{
    quicksort::sort_impl::<T, order::ByLen>(v);
}

/// First index out of order by content length, or 0 when sorted.
pub fn is_sorted_by_len<T: AsRef<[u8]>>(v: &[T]) -> usize {
    order::check_sorted::<T, order::ByLen>(v)
}
