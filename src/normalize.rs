/// Canonical matching key for an identifier or name from any source.
///
/// Trims surrounding whitespace and lowercases, so `"MIT"`, `" mit "` and
/// `"Mit"` all collapse to `"mit"`.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}
