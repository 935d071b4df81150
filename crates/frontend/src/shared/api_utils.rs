//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs.

/// Get the base URL for API requests
///
/// A non-empty configured base wins. Otherwise the base is derived from the
/// current window location, using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "https://maubin-routing.onrender.com" or "http://localhost:3000"
/// - Empty string if nothing is configured and window is not available
pub fn api_base(configured: &str) -> String {
    let configured = configured.trim();
    if !configured.is_empty() {
        return configured.trim_end_matches('/').to_string();
    }

    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Join a base URL and a path with exactly one slash between them
///
/// # Example
/// ```rust
/// use frontend::shared::api_utils::join_url;
///
/// let url = join_url("https://api.test/", "/user/posts");
/// assert_eq!(url, "https://api.test/user/posts");
/// ```
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base, path)
}

/// Encode one path segment (ids coming from the router are not trusted)
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_prefers_configured_value() {
        assert_eq!(
            api_base("https://maubin-routing.onrender.com/"),
            "https://maubin-routing.onrender.com"
        );
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://api.test", "user/posts"), "https://api.test/user/posts");
        assert_eq!(join_url("https://api.test/", "/user/posts"), "https://api.test/user/posts");
        assert_eq!(join_url("https://api.test/", ""), "https://api.test");
    }

    #[test]
    fn test_path_segment_escapes() {
        assert_eq!(path_segment("a b/c"), "a%20b%2Fc");
        assert_eq!(path_segment("65f1c0"), "65f1c0");
    }
}
