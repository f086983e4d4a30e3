//! Hashing helpers for generated artifact names and change detection.
//!
//! - [`doc_hash`]: filesystem-safe, deterministic name derived from a string
//! - [`compute`]: fast 64-bit hash for in-process change detection

use std::hash::Hasher;

use rustc_hash::FxHasher;

/// Length of the hex hash suffix appended by [`doc_hash`].
const SHORT_HASH_LEN: usize = 8;

/// Longest slug part kept before the hash suffix.
const MAX_SLUG_LEN: usize = 200;

/// Compute 64-bit hash from byte data.
///
/// Not stable across releases; only compare values produced by the same
/// process.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}

/// Short blake3 hex digest of `value`, stable across runs and platforms.
#[inline]
pub fn short_hash(value: &str) -> String {
    let digest = blake3::hash(value.as_bytes());
    hex::encode(&digest.as_bytes()[..SHORT_HASH_LEN / 2])
}

/// Turn an arbitrary string into a filesystem-safe artifact name.
///
/// The name is a kebab-case slug of `value` followed by a short hash of the
/// original string, so values that slugify identically stay distinct.
///
/// # Examples
///
/// ```text
/// "/"                    -> "index"
/// "@site/docs/intro.md"  -> "site-docs-intro-md-<8 hex>"
/// ```
pub fn doc_hash(value: &str) -> String {
    if value == "/" {
        return "index".to_string();
    }

    let mut slug = kebab_case(value);
    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    let hash = short_hash(value);
    if slug.is_empty() {
        hash
    } else {
        format!("{slug}-{hash}")
    }
}

/// ASCII kebab-case: transliterate, lowercase, collapse separators.
pub fn kebab_case(value: &str) -> String {
    let ascii = deunicode::deunicode(value);
    let mut out = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    out
}
