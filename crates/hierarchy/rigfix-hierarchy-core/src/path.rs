//! Helpers for slash-separated hierarchy paths.
//!
//! Grammar:
//!   name/name/.../name
//! - '/' separates node names, the empty path addresses the root itself
//! - names are compared ordinally (case-sensitive, no normalization)
//!   Examples:
//!   "Armature/Hips/Spine" -> ["Armature", "Hips", "Spine"]
//!   "" -> []

/// Path separator used by animation bindings.
pub const SEPARATOR: char = '/';

/// Split a path into its node names. The empty path yields no segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(move |_| !path.is_empty())
}

/// Join name segments into a path.
pub fn join<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for (i, name) in names.into_iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(name);
    }
    out
}

/// Ordinal prefix test. A prefix longer than the path never matches.
pub fn has_prefix(path: &str, prefix: &str) -> bool {
    prefix.len() <= path.len() && path.as_bytes()[..prefix.len()] == *prefix.as_bytes()
}

/// Replace `from` at the start of `path` with `to`. Returns `None` when `from` is not a prefix.
pub fn replace_prefix(path: &str, from: &str, to: &str) -> Option<String> {
    let rest = path.strip_prefix(from)?;
    let mut out = String::with_capacity(to.len() + rest.len());
    out.push_str(to);
    out.push_str(rest);
    Some(out)
}

/// Prefix `path` with `base`, inserting a separator when `base` lacks one, then drop a
/// single trailing separator.
///
/// `rebase("Outfit/", "Hat")` and `rebase("Outfit", "Hat")` both give `"Outfit/Hat"`;
/// the empty path maps to the base itself (`rebase("Outfit/", "")` gives `"Outfit"`).
pub fn rebase(base: &str, path: &str) -> String {
    let mut out = String::with_capacity(base.len() + path.len() + 1);
    out.push_str(base);
    if !path.is_empty() {
        if !base.is_empty() && !base.ends_with(SEPARATOR) {
            out.push(SEPARATOR);
        }
        out.push_str(path);
    }
    if out.ends_with(SEPARATOR) {
        out.pop();
    }
    out
}
