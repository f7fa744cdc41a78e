use std::cmp::Ordering;

/// Converts a caller supplied `k` into a length. Negative values mean zero;
/// values too large for `usize` saturate so they still mean "everything".
pub fn clamp_k(k: i64) -> usize {
    if k < 0 {
        0
    } else {
        usize::try_from(k).unwrap_or(usize::MAX)
    }
}

/// Returns the first `k` items under `cmp`, sorted.
///
/// Partitions with `select_nth_unstable_by` before sorting so only the kept
/// prefix is fully ordered. `cmp` must be a total order for the result to be
/// deterministic.
pub fn top_k<T, F>(mut items: Vec<T>, k: usize, mut cmp: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if k < items.len() {
        items.select_nth_unstable_by(k, &mut cmp);
        items.truncate(k);
    }
    items.sort_unstable_by(&mut cmp);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(a: &u32, b: &u32) -> Ordering {
        b.cmp(a)
    }

    #[test]
    fn test_clamp_k() {
        assert_eq!(clamp_k(-5), 0);
        assert_eq!(clamp_k(0), 0);
        assert_eq!(clamp_k(7), 7);
        assert_eq!(clamp_k(i64::MIN), 0);
    }

    #[test]
    fn test_clamp_k_large_values_keep_everything() {
        assert!(clamp_k(i64::MAX) as u64 >= u64::from(u32::MAX));
        assert!(clamp_k(5_000_000_000) as u64 >= u64::from(u32::MAX));
        assert_eq!(top_k(vec![1, 3, 2], clamp_k(i64::MAX), desc), vec![3, 2, 1]);
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn test_clamp_k_saturates_on_32_bit() {
        assert_eq!(clamp_k(i64::MAX), usize::MAX);
        assert_eq!(clamp_k(5_000_000_000), usize::MAX);
    }

    #[test]
    fn test_top_k_prefix() {
        let items = vec![4, 9, 1, 7, 3, 8];
        assert_eq!(top_k(items, 3, desc), vec![9, 8, 7]);
    }

    #[test]
    fn test_top_k_larger_than_input_sorts_everything() {
        let items = vec![2, 5, 1];
        assert_eq!(top_k(items, 10, desc), vec![5, 2, 1]);
    }

    #[test]
    fn test_top_k_zero_and_empty() {
        assert!(top_k(vec![1, 2, 3], 0, desc).is_empty());
        assert!(top_k(Vec::<u32>::new(), 4, desc).is_empty());
    }
}
