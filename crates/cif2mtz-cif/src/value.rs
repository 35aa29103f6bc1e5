//! Interpretation of raw CIF value tokens.

/// True for the unquoted null markers `?` (unknown) and `.` (not applicable).
pub fn is_null(raw: &str) -> bool {
    raw == "?" || raw == "."
}

/// Raw token with quotes or text-field delimiters removed.
pub fn as_string(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'\'' || first == b'"') && first == last {
            return &raw[1..raw.len() - 1];
        }
        if first == b';' && last == b';' {
            let inner = &raw[1..raw.len() - 1];
            return inner.strip_suffix('\n').unwrap_or(inner);
        }
    }
    raw
}

/// Numeric value of a token, ignoring a trailing standard uncertainty
/// such as `1.234(5)`. Null markers and non-numbers yield `None`.
pub fn as_number(raw: &str) -> Option<f64> {
    if is_null(raw) {
        return None;
    }
    let s = as_string(raw).trim();
    let s = match s.find('(') {
        Some(pos) if s.ends_with(')') => &s[..pos],
        _ => s,
    };
    if s.is_empty() {
        return None;
    }
    let value: f64 = s.parse().ok()?;
    // "inf" and "nan" are not CIF numbers.
    value.is_finite().then_some(value)
}

/// Integer value of a token. Accepts a leading `+`.
pub fn as_int(raw: &str) -> Option<i32> {
    if is_null(raw) {
        return None;
    }
    let s = as_string(raw).trim();
    s.strip_prefix('+').unwrap_or(s).parse().ok()
}
