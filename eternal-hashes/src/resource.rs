//! Hashes of resource paths
//!
//! Resource paths are hashed with [FarmHash64](crate::farmhash) after normalization:
//! declaration files (`.decl`) are indexed under the `rs_streamfile/` directory.
//!
//! ```
//! use eternal_hashes::resource::{compute_resource_hash, ResourceHash};
//! use eternal_hashes::HashDef;
//!
//! assert_eq!(compute_resource_hash("foo.decl"), 0x369afee688b5662c);
//! assert_eq!(compute_resource_hash("rs_streamfile/foo.decl"), 0x369afee688b5662c);
//! assert_eq!(ResourceHash::hashed("nonexistent/path"), ResourceHash::from(0x95fd24a215c9402eu64));
//! ```
use std::borrow::Cow;
use crate::define_hash_type;
use crate::farmhash::fingerprint64;

/// Suffix of declaration resource paths
pub const DECL_SUFFIX: &str = ".decl";
/// Directory under which declaration resources are indexed
pub const DECL_PREFIX: &str = "rs_streamfile/";

/// Byte used in place of non-ASCII characters
const ASCII_REPLACEMENT: u8 = b'?';


/// Return the path under which a resource is indexed
///
/// Paths ending with `.decl` are prefixed with `rs_streamfile/`, unless they already are.
/// ```
/// use eternal_hashes::resource::normalize_resource_path;
/// assert_eq!(normalize_resource_path("generated/decls/weapon/shotgun.decl"),
///            "rs_streamfile/generated/decls/weapon/shotgun.decl");
/// assert_eq!(normalize_resource_path("rs_streamfile/foo.decl"), "rs_streamfile/foo.decl");
/// assert_eq!(normalize_resource_path("maps/game/e1m1_intro.entities"), "maps/game/e1m1_intro.entities");
/// ```
pub fn normalize_resource_path(path: &str) -> Cow<'_, str> {
    if path.ends_with(DECL_SUFFIX) && !path.starts_with(DECL_PREFIX) {
        Cow::Owned(format!("{DECL_PREFIX}{path}"))
    } else {
        Cow::Borrowed(path)
    }
}

/// Encode a path to ASCII bytes, as hashed
///
/// Each non-ASCII character is replaced by a single `?`.
pub fn resource_path_bytes(path: &str) -> Cow<'_, [u8]> {
    if path.is_ascii() {
        Cow::Borrowed(path.as_bytes())
    } else {
        Cow::Owned(path.chars()
            .map(|c| if c.is_ascii() { c as u8 } else { ASCII_REPLACEMENT })
            .collect())
    }
}

/// Hash a path, without normalization
pub fn compute_raw_path_hash(path: &str) -> u64 {
    fingerprint64(&resource_path_bytes(path))
}

/// Compute the hash of a resource path, as stored in archive mappings
pub fn compute_resource_hash(path: &str) -> u64 {
    compute_raw_path_hash(&normalize_resource_path(path))
}


define_hash_type! {
    /// Hash of a normalized resource path
    ResourceHash(u64) => compute_resource_hash
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::HashDef;

    #[test]
    fn decl_paths_are_prefixed() {
        assert_eq!(compute_resource_hash("generated/decls/weapon/shotgun.decl"), 0x0bfff292149bd975);
        assert_eq!(compute_raw_path_hash("generated/decls/weapon/shotgun.decl"), 0xa13192ce36a0278c);
        assert_eq!(compute_resource_hash("foo.decl"), compute_raw_path_hash("rs_streamfile/foo.decl"));
    }

    #[test]
    fn other_paths_are_unchanged() {
        let path = "maps/game/e1m1_intro/e1m1_intro.entities";
        assert_eq!(compute_resource_hash(path), 0xbf493023a65adba2);
        assert!(matches!(normalize_resource_path(path), Cow::Borrowed(_)));
        // Only the exact suffix counts
        assert_eq!(normalize_resource_path("foo.decl.bak"), "foo.decl.bak");
        assert_eq!(normalize_resource_path("foo.DECL"), "foo.DECL");
    }

    #[test]
    fn non_ascii_characters_are_replaced() {
        assert_eq!(&*resource_path_bytes("café.tga"), b"caf?.tga");
        assert_eq!(&*resource_path_bytes("\u{1f600}"), b"?");
        assert_eq!(compute_raw_path_hash("café.tga"), 0x2a386186f7448282);
    }

    #[test]
    fn hash_type() {
        let hash = ResourceHash::hashed("foo.decl");
        assert_eq!(hash.hash, 0x369afee688b5662c);
        assert_eq!(format!("{hash:x}"), "369afee688b5662c");
        assert_eq!(format!("{hash:?}"), "ResourceHash(369afee688b5662c)");
        assert!(!hash.is_null());
        assert!(ResourceHash::default().is_null());
    }
}
