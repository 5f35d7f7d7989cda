//! Contiguous partitioning of the input rows.

/// Split `items` into `n` contiguous slices.
///
/// Every slice but the last holds `len / n` items; the last one also takes the
/// remainder. With fewer items than partitions the leading slices are empty.
/// `n == 0` is treated as a single partition.
pub fn partition<T>(items: &[T], n: usize) -> Vec<&[T]> {
    let n = n.max(1);
    let chunk_size = items.len() / n;

    (0..n)
        .map(|i| {
            let start = i * chunk_size;
            let end = if i == n - 1 {
                items.len()
            } else {
                (i + 1) * chunk_size
            };
            &items[start..end]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        let items: Vec<u32> = (0..12).collect();
        let parts = partition(&items, 4);
        assert_eq!(parts.len(), 4);
        assert!(parts.iter().all(|p| p.len() == 3));
        assert_eq!(parts[1], &[3, 4, 5]);
    }

    #[test]
    fn test_remainder_goes_to_last() {
        let items: Vec<u32> = (0..10).collect();
        let parts = partition(&items, 4);
        let sizes: Vec<usize> = parts.iter().map(|p| p.len()).collect();
        assert_eq!(sizes, vec![2, 2, 2, 4]);
        assert_eq!(parts[3], &[6, 7, 8, 9]);
    }

    #[test]
    fn test_fewer_items_than_partitions() {
        let items = [1, 2];
        let parts = partition(&items, 5);
        assert_eq!(parts.len(), 5);
        assert!(parts[..4].iter().all(|p| p.is_empty()));
        assert_eq!(parts[4], &[1, 2]);
    }

    #[test]
    fn test_zero_partitions_means_one() {
        let items = [1, 2, 3];
        let parts = partition(&items, 0);
        assert_eq!(parts, vec![&items[..]]);
    }

    #[test]
    fn test_order_is_preserved() {
        let items: Vec<u32> = (0..17).collect();
        let flattened: Vec<u32> = partition(&items, 3)
            .into_iter()
            .flat_map(|p| p.iter().copied())
            .collect();
        assert_eq!(flattened, items);
    }
}
