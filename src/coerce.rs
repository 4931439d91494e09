//! Lenient attribute coercion.
//!
//! LightBurn tolerates partially-corrupt files: one unparseable number must
//! never discard an otherwise-valid element. Every numeric or boolean field
//! read from text goes through these helpers with an explicit per-call-site
//! default.

/// Parse a numeric attribute, substituting `default` on failure.
pub fn num_or(value: Option<&str>, default: f64) -> f64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Parse a numeric attribute, yielding `None` when absent or malformed.
pub fn opt_num(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Parse an integer attribute, yielding `None` when absent or malformed.
pub fn opt_int(value: Option<&str>) -> Option<i32> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Parse a boolean attribute, yielding `None` when absent or unrecognized.
/// Accepts "true"/"false" (any case) and "1"/"0".
pub fn opt_bool(value: Option<&str>) -> Option<bool> {
    match value?.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
