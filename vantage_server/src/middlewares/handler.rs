use axum::http::HeaderMap;

/// Client key for the admission guard: first `x-forwarded-for` entry, then
/// `x-real-ip`, then the shared `unknown` bucket. The headers are
/// client-supplied, so this is abuse-dampening, not access control; whether
/// they can be trusted depends on the reverse proxy in front of this service.
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded_for) = headers.get("x-forwarded-for").and_then(|h| h.to_str().ok()) {
        if let Some(first) = forwarded_for.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_first_forwarded_for_entry_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));

        assert_eq!(client_ip(&headers), "1.2.3.4");
    }

    #[test]
    fn test_real_ip_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));

        assert_eq!(client_ip(&headers), "9.9.9.9");
    }

    #[test]
    fn test_absent_headers_collapse_into_unknown() {
        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }
}
