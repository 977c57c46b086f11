//! Base URL handling for the agent backend.
//!
//! Base URLs are stored without trailing slashes and endpoints are joined
//! with exactly one slash, whatever the user typed.

/// Strip trailing slashes.
///
/// ```
/// use lumina::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:3001/"), "http://localhost:3001");
/// assert_eq!(normalize_base_url("https://agent.example.com/api//"), "https://agent.example.com/api");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join `endpoint` onto `base_url` with a single slash.
///
/// ```
/// use lumina::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:3001/", "/generate"),
///     "http://localhost:3001/generate"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalize_base_url(base_url), endpoint)
}

/// Normalized form of `input` if it is an absolute http(s) URL with a host.
pub fn parse_http_base_url(input: &str) -> Option<String> {
    let url = reqwest::Url::parse(input.trim()).ok()?;
    let has_host = url.host_str().is_some_and(|host| !host.is_empty());
    (matches!(url.scheme(), "http" | "https") && has_host)
        .then(|| normalize_base_url(input.trim()))
}
