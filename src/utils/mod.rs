//! Shared helpers.

pub mod hash;
pub mod path;

/// Format `count` with `noun`, adding an `s` unless the count is one.
///
/// `plural_count(1, "doc")` -> `"1 doc"`, `plural_count(3, "doc")` -> `"3 docs"`
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
