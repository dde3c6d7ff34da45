//! Binary search over a monotonic predicate.

/// Smallest index in `[0, n]` at which `pred` holds, assuming `pred` is
/// false on a prefix and true on the rest. Returns `n` when `pred` never
/// holds. `pred` is only called with arguments below `n`.
///
/// To locate `w` in a sorted slice: `search(v.len(), |i| w <= v[i])` returns
/// the first position at or above `w`.
pub fn search<P: FnMut(usize) -> bool>(n: usize, mut pred: P) -> usize {
    let mut l = 0;
    let mut h = n;
    while l < h {
        let m = l + (h - l) / 2;
        if pred(m) {
            h = m;
        } else {
            l = m + 1;
        }
    }
    l
}

#[cfg(test)]
mod tests {
    use super::search;

    #[test]
    fn boundaries() {
        assert_eq!(search(0, |_| true), 0);
        assert_eq!(search(10, |_| true), 0);
        assert_eq!(search(10, |_| false), 10);
    }

    #[test]
    fn locates_first_hit() {
        let v = [1, 3, 3, 5, 8, 13];
        for w in 0..15 {
            let i = search(v.len(), |i| w <= v[i]);
            assert!(v[..i].iter().all(|x| *x < w));
            assert!(v[i..].iter().all(|x| *x >= w));
        }
        // First occurrence among duplicates.
        assert_eq!(search(v.len(), |i| 3 <= v[i]), 1);
    }

    #[test]
    fn probes_stay_in_bounds() {
        for n in 0..50usize {
            for target in 0..=n {
                let i = search(n, |i| {
                    assert!(i < n);
                    i >= target
                });
                assert_eq!(i, target);
            }
        }
    }
}
