//! Stable, version-independent hashing for model objects.
//!
//! [`std::hash::Hash`] output depends on the hasher and may change between
//! releases. Models additionally expose an `i32` hash that is fixed by the field
//! declaration order: `h = 1; h = 31 * h + field` for each field, with unset
//! fields contributing [`UNSET`]. Leaf values hash the same way the JVM SDKs do,
//! so values match across language bindings.

use std::sync::Arc;

/// Multiplier applied before folding in each field.
pub const PRIME: i32 = 31;

/// Contribution of an unset field.
pub const UNSET: i32 = 0;

const TRUE_HASH: i32 = 1231;
const FALSE_HASH: i32 = 1237;

pub trait StableHash {
    fn stable_hash(&self) -> i32;
}

impl StableHash for str {
    /// Polynomial hash over UTF-16 code units.
    fn stable_hash(&self) -> i32 {
        self.encode_utf16()
            .fold(0_i32, |hash, unit| hash.wrapping_mul(PRIME).wrapping_add(i32::from(unit)))
    }
}

impl StableHash for String {
    fn stable_hash(&self) -> i32 {
        self.as_str().stable_hash()
    }
}

impl StableHash for bool {
    fn stable_hash(&self) -> i32 {
        if *self { TRUE_HASH } else { FALSE_HASH }
    }
}

impl StableHash for i32 {
    fn stable_hash(&self) -> i32 {
        *self
    }
}

macro_rules! widen_hash {
    ($($ty:ty),*) => {
        $(
            impl StableHash for $ty {
                fn stable_hash(&self) -> i32 {
                    i32::from(*self)
                }
            }
        )*
    };
}

widen_hash!(i8, i16, u8, u16);

impl StableHash for u32 {
    fn stable_hash(&self) -> i32 {
        i32::from_ne_bytes(self.to_ne_bytes())
    }
}

impl StableHash for i64 {
    #[allow(clippy::cast_possible_truncation)]
    fn stable_hash(&self) -> i32 {
        let bits = self.cast_unsigned();
        (bits ^ (bits >> 32)) as i32
    }
}

impl StableHash for u64 {
    #[allow(clippy::cast_possible_truncation)]
    fn stable_hash(&self) -> i32 {
        (self ^ (self >> 32)) as i32
    }
}

impl<T: StableHash> StableHash for Option<T> {
    fn stable_hash(&self) -> i32 {
        self.as_ref().map_or(UNSET, StableHash::stable_hash)
    }
}

impl<T: StableHash> StableHash for [T] {
    /// Ordered combination starting from `1`, like a list hash.
    fn stable_hash(&self) -> i32 {
        self.iter()
            .fold(1_i32, |hash, item| hash.wrapping_mul(PRIME).wrapping_add(item.stable_hash()))
    }
}

impl<T: StableHash> StableHash for Vec<T> {
    fn stable_hash(&self) -> i32 {
        self.as_slice().stable_hash()
    }
}

impl<T: StableHash + ?Sized> StableHash for &T {
    fn stable_hash(&self) -> i32 {
        (**self).stable_hash()
    }
}

impl<T: StableHash + ?Sized> StableHash for Box<T> {
    fn stable_hash(&self) -> i32 {
        (**self).stable_hash()
    }
}

impl<T: StableHash + ?Sized> StableHash for Arc<T> {
    fn stable_hash(&self) -> i32 {
        (**self).stable_hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_matches_jvm_string_hash() {
        assert_eq!("".stable_hash(), 0);
        assert_eq!("a".stable_hash(), 97);
        assert_eq!("abc".stable_hash(), 96_354);
        assert_eq!("Client".stable_hash(), 2_021_122_027);
    }

    #[test]
    fn booleans_use_fixed_constants() {
        assert_eq!(true.stable_hash(), 1231);
        assert_eq!(false.stable_hash(), 1237);
    }

    #[test]
    fn unset_contributes_zero() {
        assert_eq!(None::<String>.stable_hash(), UNSET);
        assert_eq!(Some(3306).stable_hash(), 3306);
    }

    #[test]
    fn sequences_are_order_sensitive() {
        let ab = vec!["a".to_owned(), "b".to_owned()];
        let ba = vec!["b".to_owned(), "a".to_owned()];
        assert_eq!(ab.stable_hash(), (31 + 97) * 31 + 98);
        assert_ne!(ab.stable_hash(), ba.stable_hash());
        assert_eq!(Vec::<String>::new().stable_hash(), 1);
    }

    #[test]
    fn shared_storage_hashes_like_its_contents() {
        let items = Arc::new(vec![1_i32, 2, 3]);
        assert_eq!(items.stable_hash(), vec![1_i32, 2, 3].stable_hash());
    }
}
