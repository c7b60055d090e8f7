use http::HeaderName;

/// Marks a request as an internal health probe
///
/// Any of `true` or `1` (case-insensitive) counts as set.
pub const INTERNAL_PROBE: HeaderName = HeaderName::from_static("x-internal-probe");

/// Returns true when the header value flags an internal probe
pub fn is_truthy(value: &http::HeaderValue) -> bool {
    value
        .to_str()
        .map(|v| {
            let v = v.trim();
            v == "1" || v.eq_ignore_ascii_case("true")
        })
        .unwrap_or(false)
}
