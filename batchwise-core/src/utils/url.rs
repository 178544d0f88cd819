//! URL helpers

/// Join a base URL and a relative path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{base}/{path}")
}

/// Percent-encode a single path segment (e.g. a provider-issued id).
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
