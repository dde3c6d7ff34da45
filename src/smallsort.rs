//! Insertion sort for the leaves of the recursion.

use crate::order::Rel;

/// Plain adjacent-swap insertion sort.
pub(crate) fn insertion_sort<T, R: Rel<T>>(v: &mut [T]) {
    for h in 1..v.len() {
        let mut k = h;
        while k > 0 && R::less(&v[k], &v[k - 1]) {
            v.swap(k, k - 1);
            k -= 1;
        }
    }
}

/// Insertion sort with a half-distance pairing pre-pass on ranges above half
/// the threshold. The single backward pass pre-orders elements `len / 2`
/// apart, which cuts the shift distances of the main loop on ranges near the
/// threshold.
pub(crate) fn small_sort<T, R: Rel<T>>(v: &mut [T]) {
    let len = v.len();
    if len < 2 {
        return;
    }
    if len > R::MAX_LEN_INS / 2 {
        let m = len / 2;
        for i in (0..m).rev() {
            if R::less(&v[i + m], &v[i]) {
                v.swap(i, i + m);
            }
        }
    }
    insertion_sort::<T, R>(v);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Natural;

    #[test]
    fn small_sizes() {
        for len in 0..=crate::MAX_LEN_INS {
            let mut v: Vec<i32> = (0..len as i32).rev().collect();
            small_sort::<i32, Natural>(&mut v);
            assert!(v.windows(2).all(|w| w[0] <= w[1]), "len {len}");
        }
    }

    #[test]
    fn duplicates_survive() {
        let mut v = vec![2, 1, 2, 0, 1, 0, 2, 1];
        small_sort::<i32, Natural>(&mut v);
        assert_eq!(v, [0, 0, 1, 1, 1, 2, 2, 2]);
    }
}
