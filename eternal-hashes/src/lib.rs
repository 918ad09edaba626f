//! Hashes used to index game resources
//!
//! Resource paths are hashed with [farmhash::fingerprint64()], after normalization, see
//! [resource].
//!
//! Hash values are wrapped in types created with [crate::define_hash_type!()], which implements
//! [HashDef] and conversions.

pub mod farmhash;
pub mod resource;


/// Trait for hash values types
///
/// This trait is implemented by types created with [crate::define_hash_type!()].
pub trait HashDef: Sized {
    /// Type of hash values (integer type)
    type Hash: Sized;
    /// Hashing method
    const HASHER: fn(&str) -> Self::Hash;

    /// Create a new hash value from an integer
    fn new(hash: Self::Hash) -> Self;

    /// Convert a string into a hash by hashing it
    #[inline]
    fn hashed(s: &str) -> Self {
        Self::new(Self::HASHER(s))
    }

    /// Return true if hash is the null hash (0)
    fn is_null(&self) -> bool;
}


/// Define a hash type wrapping an integer hash value
///
/// The created type provides
/// - a `hash` field, with the hash numeric value
/// - [HashDef] implementation
/// - implicit conversion from/to hash integer type (`From<T>`)
/// - [std::fmt::Debug] implementation
/// - [std::fmt::LowerHex] implementation, zero-padded
#[macro_export]
macro_rules! define_hash_type {
    (
        $(#[$meta:meta])*
        $name:ident($T:ty) => $hasher:expr
    ) => {
        $(#[$meta])*
        #[derive(Default, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone)]
        pub struct $name {
            /// Hash value
            pub hash: $T,
        }

        impl $crate::HashDef for $name {
            type Hash = $T;
            const HASHER: fn(&str) -> Self::Hash = $hasher;

            #[inline]
            fn new(hash: Self::Hash) -> Self {
                Self { hash }
            }

            #[inline]
            fn is_null(&self) -> bool {
                self.hash == 0
            }
        }

        impl From<$T> for $name {
            fn from(v: $T) -> Self {
                Self { hash: v }
            }
        }

        impl From<$name> for $T {
            fn from(v: $name) -> Self {
                v.hash
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, concat!(stringify!($name), "({:x})"), self)
            }
        }

        impl std::fmt::LowerHex for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{:0w$x}", self.hash, w = std::mem::size_of::<$T>() * 2)
            }
        }
    }
}
