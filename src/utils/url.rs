// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Whether a path is a web URL, a protocol-relative URL or inline `data:`.
///
/// # Examples
/// ```
/// use postfeed::utils::url::is_absolute;
///
/// assert!(is_absolute("https://cdn.example.com/a.png"));
/// assert!(is_absolute("//cdn.example.com/a.png"));
/// assert!(!is_absolute("posts/a/cover.png"));
/// assert!(!is_absolute("a:b/cover.png"));
/// ```
pub fn is_absolute(value: &str) -> bool {
    if value.starts_with("//") {
        return true;
    }
    Url::parse(value)
        .map(|url| match url.scheme() {
            "http" | "https" => url.has_host(),
            "data" => true,
            _ => false,
        })
        .unwrap_or(false)
}

/// Make a relative asset path absolute against a base URL.
///
/// Absolute values, empty values and empty bases are returned unchanged.
/// Leading `./` and `/` are relative to the base, not to the host root,
/// because mirror bases point at a repository root inside the host.
///
/// # Examples
/// ```
/// use postfeed::utils::url::absolutize;
///
/// assert_eq!(
///     absolutize("https://cdn.example.com/gh/me/blog@main/", "./posts/a.md"),
///     "https://cdn.example.com/gh/me/blog@main/posts/a.md"
/// );
/// ```
pub fn absolutize(base_url: &str, value: &str) -> String {
    let base_url = base_url.trim();
    if value.is_empty() || base_url.is_empty() || is_absolute(value) {
        return value.to_string();
    }

    let relative = value.trim_start_matches("./").trim_start_matches('/');
    format!("{}/{}", base_url.trim_end_matches('/'), relative)
}
