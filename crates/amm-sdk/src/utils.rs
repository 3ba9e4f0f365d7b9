//! Small numeric and collection helpers.

use crate::types::BigInt;
use num_traits::{One, Zero};
use std::cmp::Ordering;

/// Integer square root rounded down, matching the pair contract's Babylonian loop.
///
/// Negative input yields zero.
pub fn sqrt(value: &BigInt) -> BigInt {
    let three = BigInt::from(3);
    if *value > three {
        let mut z = value.clone();
        let mut x: BigInt = value / 2 + 1;
        while x < z {
            z = x.clone();
            x = (value / &x + &x) / 2;
        }
        z
    } else if value.is_zero() || *value < BigInt::zero() {
        BigInt::zero()
    } else {
        BigInt::one()
    }
}

/// A vector kept sorted by a comparator and capped at `max_size` items.
///
/// Insertion finds its slot by binary search; once full, an item that does
/// not beat the current last item is rejected and a better one evicts it.
#[derive(Debug, Clone)]
pub struct SortedBuffer<T> {
    items: Vec<T>,
    max_size: usize,
}

impl<T> SortedBuffer<T> {
    /// Panics if `max_size` is zero.
    pub fn new(max_size: usize) -> Self {
        assert!(max_size > 0, "sorted buffer needs room for one item");
        Self {
            items: Vec::with_capacity(max_size),
            max_size,
        }
    }

    /// Insert `item`, returning whatever fell off the end (possibly `item` itself).
    pub fn insert_by<F>(&mut self, item: T, mut compare: F) -> Option<T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let is_full = self.items.len() == self.max_size;
        if is_full {
            if let Some(last) = self.items.last() {
                if compare(last, &item) != Ordering::Greater {
                    return Some(item);
                }
            }
        }

        let index = self
            .items
            .partition_point(|existing| compare(existing, &item) != Ordering::Greater);
        self.items.insert(index, item);

        if is_full {
            self.items.pop()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_small_values() {
        let expected = [0, 1, 1, 1, 2, 2, 2, 2, 2, 3];
        for (value, root) in expected.iter().enumerate() {
            assert_eq!(sqrt(&BigInt::from(value)), BigInt::from(*root));
        }
    }

    #[test]
    fn test_sqrt_large_values() {
        assert_eq!(sqrt(&BigInt::from(1000)), BigInt::from(31));
        let big = BigInt::from(10u32).pow(36);
        assert_eq!(sqrt(&big), BigInt::from(10u64.pow(18)));
        assert_eq!(sqrt(&(big - 1)), BigInt::from(10u64.pow(18) - 1));
    }

    #[test]
    fn test_buffer_keeps_order() {
        let mut buffer = SortedBuffer::new(5);
        for value in [3, 1, 4, 1, 5] {
            assert_eq!(buffer.insert_by(value, |a, b| a.cmp(b)), None);
        }
        assert_eq!(buffer.as_slice(), &[1, 1, 3, 4, 5]);
    }

    #[test]
    fn test_buffer_evicts_worst() {
        let mut buffer = SortedBuffer::new(3);
        for value in [5, 2, 8] {
            buffer.insert_by(value, |a: &i32, b| a.cmp(b));
        }
        assert_eq!(buffer.insert_by(1, |a, b| a.cmp(b)), Some(8));
        assert_eq!(buffer.as_slice(), &[1, 2, 5]);

        // Equal to the last item is not an improvement.
        assert_eq!(buffer.insert_by(5, |a, b| a.cmp(b)), Some(5));
        assert_eq!(buffer.insert_by(9, |a, b| a.cmp(b)), Some(9));
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_buffer_equal_items_keep_insertion_order() {
        let mut buffer = SortedBuffer::new(3);
        buffer.insert_by((1, 'a'), |a: &(i32, char), b| a.0.cmp(&b.0));
        buffer.insert_by((1, 'b'), |a, b| a.0.cmp(&b.0));
        assert_eq!(buffer.as_slice(), &[(1, 'a'), (1, 'b')]);
    }

    #[test]
    #[should_panic(expected = "room for one item")]
    fn test_buffer_zero_size() {
        let _ = SortedBuffer::<u8>::new(0);
    }
}
