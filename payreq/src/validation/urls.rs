//! Redirect URL and route fragment validation.

use crate::config::SiteConfig;
use crate::errors::{codes, InvalidRequestParameterError};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

#[allow(clippy::expect_used)]
static ROUTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_\-]*(/[A-Za-z0-9][A-Za-z0-9_\-]*)*$")
        .expect("route pattern is valid")
});

/// Validates that `value` is an absolute http(s) URL on the site's origin.
///
/// Returns the parsed URL on success.
pub fn validate_redirect_url(
    value: &str,
    field: &str,
    site: &SiteConfig,
) -> Result<Url, InvalidRequestParameterError> {
    let invalid = |reason: &str| {
        InvalidRequestParameterError::new(
            codes::REDIRECT_URL,
            format!("Invalid {field} URL {value}: {reason}"),
        )
        .with_field(field)
        .with_value(value)
    };

    let url = Url::parse(value).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("only http and https URLs are accepted"));
    }

    let home = Url::parse(&site.home_url).map_err(|e| invalid(&format!("site URL is invalid ({e})")))?;
    if url.origin() != home.origin() {
        return Err(invalid("URL must point to this site"));
    }

    Ok(url)
}

/// Validates a caller-supplied route fragment used to build an endpoint path.
///
/// Segments are alphanumeric plus `_` and `-`, separated by single slashes.
/// Leading slashes, empty segments, dot segments and query characters are
/// rejected.
pub fn validate_route(value: &str, field: &str) -> Result<(), InvalidRequestParameterError> {
    if ROUTE_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(InvalidRequestParameterError::new(
            codes::ROUTE,
            format!("{value} is not a valid route for {field}"),
        )
        .with_field(field)
        .with_value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig::new("https://shop.example.com")
    }

    #[test]
    fn test_same_origin_accepted() {
        let url = validate_redirect_url("https://shop.example.com/checkout?order=1", "return_url", &site())
            .unwrap();
        assert_eq!(url.path(), "/checkout");
    }

    #[test]
    fn test_external_origin_rejected() {
        let err = validate_redirect_url("https://evil.example.org/", "return_url", &site()).unwrap_err();
        assert_eq!(err.code, codes::REDIRECT_URL);
        assert_eq!(err.field.as_deref(), Some("return_url"));
    }

    #[test]
    fn test_scheme_and_port_matter() {
        assert!(validate_redirect_url("http://shop.example.com/", "return_url", &site()).is_err());
        assert!(validate_redirect_url("https://shop.example.com:8443/", "return_url", &site()).is_err());
        assert!(validate_redirect_url("javascript:alert(1)", "return_url", &site()).is_err());
    }

    #[test]
    fn test_relative_rejected() {
        assert!(validate_redirect_url("/checkout", "return_url", &site()).is_err());
    }

    #[test]
    fn test_route_fragments() {
        assert!(validate_route("accounts/login_links", "route").is_ok());
        assert!(validate_route("payments-settings", "route").is_ok());

        for bad in ["", "/accounts", "accounts/", "../secret", "a//b", "a?b=1", "a b"] {
            assert!(validate_route(bad, "route").is_err(), "expected {bad:?} to be rejected");
        }
    }
}
