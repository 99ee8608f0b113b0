//! Outlet classification — is a domain a legitimate news source?
//!
//! Deny-list only: government, legislative trackers, social platforms, legal
//! publishers, academic hosts, raw document/CDN hosts, and generic non-news
//! platforms are rejected; everything else is permitted. Runs in the hot
//! per-candidate loop, so it is pure and never fails.

/// Rejected by suffix match (TLD-style patterns).
const DENY_SUFFIXES: &[&str] = &[".gov", ".mil", ".edu"];

/// Rejected when the fragment appears anywhere in the domain. Used for
/// legislature hosts that live under many TLDs.
const DENY_FRAGMENTS: &[&str] = &["legislature.", "legis.", "capitol.", "assembly.", "statehouse"];

/// Rejected as the exact domain or any subdomain of it. Matching must stay
/// anchored to label boundaries: "x.com" may not reject "vox.com".
const DENY_DOMAINS: &[&str] = &[
    // Legislative-tracking tools
    "legiscan.com",
    "billtrack50.com",
    "fastdemocracy.com",
    "openstates.org",
    "govtrack.us",
    "trackbill.com",
    "statescape.com",
    // Social platforms
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "linkedin.com",
    "reddit.com",
    "youtube.com",
    "tiktok.com",
    "pinterest.com",
    "threads.net",
    "bsky.app",
    // Law firms and legal publishers
    "jdsupra.com",
    "lexology.com",
    "natlawreview.com",
    "law.com",
    "martindale.com",
    "justia.com",
    "findlaw.com",
    "lawyers.com",
    "americanbar.org",
    // Raw document and CDN hosts
    "cloudfront.net",
    "amazonaws.com",
    "googleusercontent.com",
    "azureedge.net",
    "scribd.com",
    "documentcloud.org",
    // Generic non-news platforms
    "wikipedia.org",
    "wikimedia.org",
    "medium.com",
    "substack.com",
    "eventbrite.com",
    "meetup.com",
    "indeed.com",
    "glassdoor.com",
    "yelp.com",
    "amazon.com",
    "craigslist.org",
    "gofundme.com",
    "surveymonkey.com",
    "google.com",
];

/// Normalize a domain for classification: lowercase, strip leading `www.`.
fn normalize(domain: &str) -> String {
    let d = domain.trim().to_lowercase();
    d.strip_prefix("www.").unwrap_or(&d).to_string()
}

/// Whether a domain is an acceptable news source. Default is permit; only
/// deny-list matches are rejected.
pub fn is_news_outlet(domain: &str) -> bool {
    let domain = normalize(domain);
    if domain.is_empty() {
        return false;
    }

    if DENY_SUFFIXES.iter().any(|s| domain.ends_with(s)) {
        return false;
    }
    if DENY_FRAGMENTS.iter().any(|p| domain.contains(p)) {
        return false;
    }

    !DENY_DOMAINS
        .iter()
        .any(|d| domain == *d || domain.ends_with(&format!(".{d}")))
}
