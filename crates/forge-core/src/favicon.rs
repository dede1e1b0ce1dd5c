//! Favicon-by-domain URLs for source cards.

/// Public favicon endpoint, parameterized by domain.
const FAVICON_ENDPOINT: &str = "https://www.google.com/s2/favicons?sz=64&domain=";

/// Icon used when a domain's favicon cannot be loaded.
pub const FALLBACK_FAVICON_URL: &str = "https://www.google.com/s2/favicons?sz=64&domain=google.com";

/// Favicon URL for a source domain.
pub fn favicon_url(domain: &str) -> String {
    format!("{}{}", FAVICON_ENDPOINT, domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favicon_url() {
        assert_eq!(
            favicon_url("example.com"),
            "https://www.google.com/s2/favicons?sz=64&domain=example.com"
        );
    }

    #[test]
    fn test_fallback_is_google() {
        assert_eq!(FALLBACK_FAVICON_URL, favicon_url("google.com"));
    }
}
