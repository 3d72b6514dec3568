//! # Link Predicates
//!
//! The string formats behind the `url`, `image` and minimal-media `link`
//! rules. Absolute URLs are parsed with the `url` crate (WHATWG parsing).

use url::Url;

/// Syntactically valid absolute URL of any scheme.
pub fn is_absolute_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Absolute URL with an `http` or `https` scheme.
pub fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// A link an editor may put behind a button or menu entry.
///
/// After trimming, accepts the first form that applies:
///
/// 1. in-page anchor: `#contacto`
/// 2. explicit relative path: `/blog`, `./a`, `../b`
/// 3. absolute URL, which must be `http`/`https`
/// 4. bare relative path: `about`, `blog/post-1`
///
/// A value that parses as an absolute URL with another scheme
/// (`javascript:`, `mailto:`) is rejected without trying form 4.
pub fn is_link(value: &str) -> bool {
    let v = value.trim();
    if v.is_empty() {
        return false;
    }
    if v.starts_with('#') {
        return true;
    }
    if v.starts_with('/') || v.starts_with("./") || v.starts_with("../") {
        return true;
    }
    if is_http_url(v) {
        return true;
    }
    !is_absolute_url(v) && is_bare_relative_path(v)
}

/// Check for `^[a-zA-Z0-9][a-zA-Z0-9\-._~/]*$`.
fn is_bare_relative_path(v: &str) -> bool {
    let mut bytes = v.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~' | b'/'))
}
