// Output formatting: terminal display of verdicts and notices.

pub mod terminal;

/// Shorten a hex digest for display, keeping both ends: `abcd1234…9f0e`.
///
/// Digests are ASCII, but this still works on characters rather than bytes
/// so an unexpected non-ASCII value cannot cause a slicing panic.
pub fn abbreviate_hash(hash: &str, keep: usize) -> String {
    let chars: Vec<char> = hash.chars().collect();
    if chars.len() <= keep * 2 {
        return hash.to_string();
    }
    let head: String = chars[..keep].iter().collect();
    let tail: String = chars[chars.len() - keep..].iter().collect();
    format!("{head}…{tail}")
}
