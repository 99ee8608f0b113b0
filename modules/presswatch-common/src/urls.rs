//! URL normalization shared by dedup and persistence. Tracking parameters
//! are stripped before any dedup comparison so the same article found via
//! different campaigns still collapses to one row.

/// Extract the bare domain from a URL: lowercased, `www.` stripped.
pub fn extract_domain(url: &str) -> String {
    let host = url
        .split("://")
        .nth(1)
        .unwrap_or(url)
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("")
        .to_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

/// Strip tracking parameters that vary per campaign and break dedup.
pub fn sanitize_url(url: &str) -> String {
    const TRACKING_PARAMS: &[&str] = &[
        "fbclid", "gclid", "utm_source", "utm_medium", "utm_campaign",
        "utm_term", "utm_content", "ref", "mc_cid", "mc_eid", "smid",
    ];

    let Ok(mut parsed) = url::Url::parse(url) else {
        return url.to_string();
    };

    if parsed.query().is_none() {
        return url.to_string();
    }

    let clean_pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if clean_pairs.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(clean_pairs);
    }

    parsed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_domain_strips_scheme_path_and_www() {
        assert_eq!(extract_domain("https://www.Example.com/a/b?c=d"), "example.com");
        assert_eq!(extract_domain("http://news.example.org"), "news.example.org");
        assert_eq!(extract_domain("example.net/path"), "example.net");
    }

    #[test]
    fn extract_domain_empty_input() {
        assert_eq!(extract_domain(""), "");
    }

    #[test]
    fn sanitize_strips_tracking_params() {
        assert_eq!(
            sanitize_url("https://example.com/story?utm_source=tw&id=7"),
            "https://example.com/story?id=7"
        );
    }

    #[test]
    fn sanitize_drops_query_when_only_tracking() {
        assert_eq!(
            sanitize_url("https://example.com/story?fbclid=abc"),
            "https://example.com/story"
        );
    }

    #[test]
    fn sanitize_leaves_clean_urls_alone() {
        assert_eq!(
            sanitize_url("https://example.com/story"),
            "https://example.com/story"
        );
    }

    #[test]
    fn sanitize_passes_through_unparseable() {
        assert_eq!(sanitize_url("not a url"), "not a url");
    }
}
