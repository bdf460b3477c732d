use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::collections::HashMap;

/// Memoized `C(n, k)` over arbitrary-precision integers. Owned by one
/// calculation and dropped with it.
#[derive(Debug, Default)]
pub struct BinomialCache {
    memo: HashMap<(u32, u32), BigUint>,
}

impl BinomialCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn choose(&mut self, n: u32, k: u32) -> BigUint {
        if k > n {
            return BigUint::zero();
        }
        let k = k.min(n - k);
        if k == 0 {
            return BigUint::one();
        }
        if let Some(value) = self.memo.get(&(n, k)) {
            return value.clone();
        }
        let mut value = BigUint::one();
        for step in 1..=k {
            value *= n - k + step;
            value /= step;
        }
        self.memo.insert((n, k), value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_values() {
        let mut cache = BinomialCache::new();
        assert_eq!(cache.choose(40, 5), BigUint::from(658_008u32));
        assert_eq!(cache.choose(37, 5), BigUint::from(435_897u32));
        assert_eq!(cache.choose(4, 2), BigUint::from(6u32));
        assert_eq!(cache.choose(3, 0), BigUint::one());
        assert_eq!(cache.choose(3, 3), BigUint::one());
        assert_eq!(cache.choose(2, 3), BigUint::zero());
    }

    #[test]
    fn folds_k_to_the_smaller_side() {
        let mut cache = BinomialCache::new();
        assert_eq!(cache.choose(10, 7), cache.choose(10, 3));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn exceeds_u64_without_overflow() {
        let mut cache = BinomialCache::new();
        let expected: BigUint = "100891344545564193334812497256".parse().expect("literal");
        assert_eq!(cache.choose(100, 50), expected);
    }
}
