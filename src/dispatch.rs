//! Untyped entry points dispatching on the collection's runtime type.

use std::any::Any;

macro_rules! dispatch_sort_prim {
    ($v:ident, $($t:ident)*) => {
        paste::paste! { $(
            if let Some(v) = $v.downcast_mut::<Vec<$t>>() {
                return crate::[<sort_ $t>](v);
            }
        )* }
    };
}

macro_rules! dispatch_check_prim {
    ($v:ident, $($t:ident)*) => {
        paste::paste! { $(
            if let Some(v) = $v.downcast_ref::<Vec<$t>>() {
                return crate::[<is_sorted_ $t>](v);
            }
        )* }
    };
}

/// Sorts a `Vec` of a supported element kind ascending: fixed-size and
/// machine-word integers, floats (honoring the NaN policy), or strings and
/// byte sequences in lexicographic order.
///
/// # Panics
///
/// Panics when `v` is not a `Vec` of a supported element kind.
pub fn sort_slice(v: &mut dyn Any) {
    dispatch_sort_prim!(v, i32 i64 u32 u64 isize usize f32 f64);
    if let Some(v) = v.downcast_mut::<Vec<String>>() {
        return crate::sort_lex(v);
    }
    if let Some(v) = v.downcast_mut::<Vec<&'static str>>() {
        return crate::sort_lex(v);
    }
    if let Some(v) = v.downcast_mut::<Vec<Vec<u8>>>() {
        return crate::sort_lex(v);
    }
    if let Some(v) = v.downcast_mut::<Vec<&'static [u8]>>() {
        return crate::sort_lex(v);
    }
    panic!("sort_slice: unsupported collection type");
}

/// `is_sorted` counterpart of [`sort_slice`]: first out-of-order index, or 0
/// when sorted.
///
/// # Panics
///
/// Panics when `v` is not a `Vec` of a supported element kind.
pub fn is_sorted_slice(v: &dyn Any) -> usize {
    dispatch_check_prim!(v, i32 i64 u32 u64 isize usize f32 f64);
    if let Some(v) = v.downcast_ref::<Vec<String>>() {
        return crate::is_sorted_lex(v);
    }
    if let Some(v) = v.downcast_ref::<Vec<&'static str>>() {
        return crate::is_sorted_lex(v);
    }
    if let Some(v) = v.downcast_ref::<Vec<Vec<u8>>>() {
        return crate::is_sorted_lex(v);
    }
    if let Some(v) = v.downcast_ref::<Vec<&'static [u8]>>() {
        return crate::is_sorted_lex(v);
    }
    panic!("is_sorted_slice: unsupported collection type");
}

/// Sorts a `Vec` of strings or byte sequences by content length only.
///
/// # Panics
///
/// Panics when `v` is not a `Vec` of a supported element kind.
pub fn sort_len(v: &mut dyn Any) {
    if let Some(v) = v.downcast_mut::<Vec<String>>() {
        return crate::sort_by_len(v);
    }
    if let Some(v) = v.downcast_mut::<Vec<&'static str>>() {
        return crate::sort_by_len(v);
    }
    if let Some(v) = v.downcast_mut::<Vec<Vec<u8>>>() {
        return crate::sort_by_len(v);
    }
    if let Some(v) = v.downcast_mut::<Vec<&'static [u8]>>() {
        return crate::sort_by_len(v);
    }
    panic!("sort_len: unsupported collection type");
}

/// `is_sorted` counterpart of [`sort_len`].
///
/// # Panics
///
/// Panics when `v` is not a `Vec` of a supported element kind.
pub fn is_sorted_len(v: &dyn Any) -> usize {
    if let Some(v) = v.downcast_ref::<Vec<String>>() {
        return crate::is_sorted_by_len(v);
    }
    if let Some(v) = v.downcast_ref::<Vec<&'static str>>() {
        return crate::is_sorted_by_len(v);
    }
    if let Some(v) = v.downcast_ref::<Vec<Vec<u8>>>() {
        return crate::is_sorted_by_len(v);
    }
    if let Some(v) = v.downcast_ref::<Vec<&'static [u8]>>() {
        return crate::is_sorted_by_len(v);
    }
    panic!("is_sorted_len: unsupported collection type");
}
