//! Value comparison semantics attached to a mapping

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::types::DbValue;

/// Equality, hashing and snapshot rules for values of one mapping
pub trait ValueComparer: fmt::Debug + Send + Sync {
    fn equals(&self, left: Option<&DbValue>, right: Option<&DbValue>) -> bool;

    fn hash_value(&self, value: &DbValue) -> u64;

    /// Copy of the value that is safe to keep for later comparison
    fn snapshot(&self, value: &DbValue) -> DbValue {
        value.clone()
    }
}

/// Structural comparison; two absent values are equal
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValueComparer;

impl ValueComparer for DefaultValueComparer {
    fn equals(&self, left: Option<&DbValue>, right: Option<&DbValue>) -> bool {
        left == right
    }

    fn hash_value(&self, value: &DbValue) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_comparer_is_structural() {
        let comparer = DefaultValueComparer;
        let a = DbValue::Bytes(vec![1, 2, 3]);
        let b = DbValue::Bytes(vec![1, 2, 3]);
        assert!(comparer.equals(Some(&a), Some(&b)));
        assert!(comparer.equals(None, None));
        assert!(!comparer.equals(Some(&a), None));
        assert_eq!(comparer.hash_value(&a), comparer.hash_value(&b));
        assert_eq!(comparer.snapshot(&a), b);
    }

    #[test]
    fn test_equal_floats_hash_alike() {
        let comparer = DefaultValueComparer;
        let zero = DbValue::F64(0.0);
        let negative_zero = DbValue::F64(-0.0);
        assert!(comparer.equals(Some(&zero), Some(&negative_zero)));
        assert_eq!(comparer.hash_value(&zero), comparer.hash_value(&negative_zero));

        let zero = DbValue::F32(0.0);
        let negative_zero = DbValue::F32(-0.0);
        assert!(comparer.equals(Some(&zero), Some(&negative_zero)));
        assert_eq!(comparer.hash_value(&zero), comparer.hash_value(&negative_zero));

        let quiet = DbValue::F64(f64::NAN);
        let other_nan = DbValue::F64(f64::from_bits(f64::NAN.to_bits() | 1));
        assert_eq!(comparer.hash_value(&quiet), comparer.hash_value(&other_nan));
        assert_ne!(comparer.hash_value(&DbValue::F64(1.0)), comparer.hash_value(&DbValue::F64(-1.0)));
    }
}
