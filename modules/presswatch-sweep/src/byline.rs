//! Byline extraction — author name and contact details from article pages.
//!
//! Pure and deterministic over (html, text, outlet domain, structured
//! metadata); no network. Name resolution walks structured metadata, JSON-LD
//! person markup, meta tags, then "By <Name>" text patterns, and every
//! candidate passes the same validator. Contact extraction never fabricates:
//! a LinkedIn URL is only accepted if it appears literally in the page.

use regex::Regex;

use presswatch_common::Byline;

/// Generic byline placeholders that are not a person.
const NAME_PLACEHOLDERS: &[&str] = &[
    "staff writer",
    "staff writers",
    "staff report",
    "staff reports",
    "news staff",
    "newsroom staff",
    "news desk",
    "web desk",
    "associated press",
    "the associated press",
    "guest contributor",
    "guest columnist",
    "contributing writer",
    "special correspondent",
    "editorial board",
    "the editorial board",
    "press release",
    "wire reports",
];

/// Role-account email prefixes deprioritized in favor of personal addresses.
const ROLE_EMAIL_PREFIXES: &[&str] = &[
    "info", "tips", "news", "newsroom", "editor", "editors", "contact",
    "support", "admin", "press", "hello", "feedback", "advertising", "ads",
    "sales", "subscriptions", "subscribe", "letters", "webmaster", "office",
];

/// Twitter handles that are site chrome, not people.
const CHROME_HANDLES: &[&str] = &[
    "share", "intent", "login", "signup", "home", "search", "hashtag",
    "explore", "settings", "messages", "notifications", "i", "widgets",
    "privacy", "tos", "about", "download",
];

/// Extract an author byline from an article page. Returns None when no
/// candidate name survives validation — contact details without a name are
/// not a byline.
pub fn extract_byline(
    html: &str,
    text: &str,
    outlet_domain: &str,
    structured_author: Option<&str>,
) -> Option<Byline> {
    let name = resolve_name(html, text, structured_author)?;

    Some(Byline {
        email: extract_email(html, text, outlet_domain),
        phone: extract_phone(html, text),
        twitter: extract_twitter(html, text, &name),
        linkedin: extract_linkedin(html, text),
        name,
    })
}

fn resolve_name(html: &str, text: &str, structured_author: Option<&str>) -> Option<String> {
    if let Some(author) = structured_author {
        let cleaned = clean_name_candidate(author);
        if is_valid_name(&cleaned) {
            return Some(cleaned);
        }
    }

    for candidate in json_ld_authors(html) {
        let cleaned = clean_name_candidate(&candidate);
        if is_valid_name(&cleaned) {
            return Some(cleaned);
        }
    }

    for candidate in meta_tag_authors(html) {
        let cleaned = clean_name_candidate(&candidate);
        if is_valid_name(&cleaned) {
            return Some(cleaned);
        }
    }

    for candidate in by_pattern_authors(text) {
        let cleaned = clean_name_candidate(&candidate);
        if is_valid_name(&cleaned) {
            return Some(cleaned);
        }
    }

    None
}

/// Strip a leading "By " and trailing punctuation from a raw candidate.
fn clean_name_candidate(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("By ")
        .or_else(|| trimmed.strip_prefix("by "))
        .unwrap_or(trimmed);
    trimmed.trim_end_matches([',', '.', '|', '-']).trim().to_string()
}

/// Name validator: 2-60 chars, at least two words, starts uppercase, no
/// digits or symbols, not a generic placeholder.
pub fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    if name.len() < 2 || name.len() > 60 {
        return false;
    }
    if name.split_whitespace().count() < 2 {
        return false;
    }
    if !name.chars().next().is_some_and(|c| c.is_uppercase()) {
        return false;
    }
    if !name
        .chars()
        .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '.' | '\'' | '-'))
    {
        return false;
    }

    let lower = name.to_lowercase();
    !NAME_PLACEHOLDERS.contains(&lower.as_str())
}

fn json_ld_authors(html: &str) -> Vec<String> {
    let mut found = Vec::new();

    // "author": {"@type": "Person", "name": "..."} — optionally inside an array.
    let object_re = Regex::new(r#""author"\s*:\s*\[?\s*\{[^{}]*?"name"\s*:\s*"([^"]+)""#)
        .expect("valid regex");
    for cap in object_re.captures_iter(html) {
        found.push(cap[1].to_string());
    }

    // "author": "..."
    let string_re = Regex::new(r#""author"\s*:\s*"([^"]+)""#).expect("valid regex");
    for cap in string_re.captures_iter(html) {
        found.push(cap[1].to_string());
    }

    found
}

fn meta_tag_authors(html: &str) -> Vec<String> {
    let mut found = Vec::new();

    for meta_name in ["author", "parsely-author", "sailthru.author"] {
        let re = Regex::new(&format!(
            r#"(?i)<meta[^>]*name\s*=\s*["']{}["'][^>]*content\s*=\s*["']([^"']+)["']"#,
            regex::escape(meta_name)
        ))
        .expect("valid regex");
        for cap in re.captures_iter(html) {
            found.push(cap[1].to_string());
        }

        // content= may come before name=
        let re = Regex::new(&format!(
            r#"(?i)<meta[^>]*content\s*=\s*["']([^"']+)["'][^>]*name\s*=\s*["']{}["']"#,
            regex::escape(meta_name)
        ))
        .expect("valid regex");
        for cap in re.captures_iter(html) {
            found.push(cap[1].to_string());
        }
    }

    // article:author carries a profile URL on some sites; only keep names.
    let re = Regex::new(
        r#"(?i)<meta[^>]*property\s*=\s*["']article:author["'][^>]*content\s*=\s*["']([^"']+)["']"#,
    )
    .expect("valid regex");
    for cap in re.captures_iter(html) {
        let value = cap[1].to_string();
        if !value.starts_with("http") {
            found.push(value);
        }
    }

    found
}

fn by_pattern_authors(text: &str) -> Vec<String> {
    let mut found = Vec::new();

    // Byline on its own line: "By Jane Doe" / "by: Jane Doe". Word separators
    // must stay within the line or the capture bleeds into the dateline.
    let line_re = Regex::new(
        r"(?m)^\s*[Bb]y[: \t]+([A-Z][A-Za-z.'\-]+(?:[ \t]+[A-Z][A-Za-z.'\-]+){1,3})",
    )
    .expect("valid regex");
    for cap in line_re.captures_iter(text) {
        found.push(cap[1].to_string());
    }

    // Inline "By Jane Doe" anywhere in the text.
    let inline_re =
        Regex::new(r"\b[Bb]y[ \t]+([A-Z][A-Za-z.'\-]+[ \t]+[A-Z][A-Za-z.'\-]+)").expect("valid regex");
    for cap in inline_re.captures_iter(text) {
        found.push(cap[1].to_string());
    }

    found
}

fn extract_email(html: &str, text: &str, outlet_domain: &str) -> Option<String> {
    let re = Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("valid regex");

    let mut seen = std::collections::HashSet::new();
    let mut emails: Vec<String> = Vec::new();
    for source in [html, text] {
        for m in re.find_iter(source) {
            let email = m.as_str().to_lowercase();
            // Regex over raw HTML catches image filenames like user@2x.png.
            if email.ends_with(".png") || email.ends_with(".jpg") || email.ends_with(".gif") {
                continue;
            }
            if seen.insert(email.clone()) {
                emails.push(email);
            }
        }
    }

    let is_role = |email: &str| {
        email
            .split('@')
            .next()
            .is_some_and(|local| ROLE_EMAIL_PREFIXES.contains(&local))
    };

    // Personal address at the outlet's own domain beats everything, then any
    // personal address, then whatever was found.
    let outlet = outlet_domain.to_lowercase();
    if !outlet.is_empty() {
        if let Some(email) = emails
            .iter()
            .find(|e| !is_role(e) && e.ends_with(&format!("@{outlet}")))
        {
            return Some(email.clone());
        }
    }
    if let Some(email) = emails.iter().find(|e| !is_role(e)) {
        return Some(email.clone());
    }
    emails.into_iter().next()
}

fn extract_phone(html: &str, text: &str) -> Option<String> {
    let re = Regex::new(r"(?:\(\d{3}\)\s?|\b\d{3}[-.\s])\d{3}[-.\s]\d{4}\b").expect("valid regex");
    for source in [text, html] {
        if let Some(m) = re.find(source) {
            return Some(m.as_str().trim().to_string());
        }
    }
    None
}

fn extract_twitter(html: &str, text: &str, name: &str) -> Option<String> {
    let re = Regex::new(r"(?:twitter\.com|x\.com)/@?([A-Za-z0-9_]{2,15})").expect("valid regex");

    let mut seen = std::collections::HashSet::new();
    let mut handles: Vec<String> = Vec::new();
    for source in [html, text] {
        for cap in re.captures_iter(source) {
            let handle = cap[1].to_string();
            if CHROME_HANDLES.contains(&handle.to_lowercase().as_str()) {
                continue;
            }
            if seen.insert(handle.to_lowercase()) {
                handles.push(handle);
            }
        }
    }

    // Prefer a handle whose text overlaps a name token.
    let tokens: Vec<String> = name
        .to_lowercase()
        .split_whitespace()
        .filter(|t| t.len() > 2)
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .collect();

    if let Some(handle) = handles.iter().find(|h| {
        let h_lower = h.to_lowercase();
        tokens.iter().any(|t| h_lower.contains(t.as_str()))
    }) {
        return Some(handle.clone());
    }

    handles.into_iter().next()
}

fn extract_linkedin(html: &str, text: &str) -> Option<String> {
    let re = Regex::new(r"https?://(?:www\.)?linkedin\.com/in/[A-Za-z0-9\-_%.]+")
        .expect("valid regex");
    for source in [html, text] {
        if let Some(m) = re.find(source) {
            return Some(m.as_str().trim_end_matches(['.', '/']).to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- name validation ---

    #[test]
    fn valid_names_accepted() {
        assert!(is_valid_name("Jane Doe"));
        assert!(is_valid_name("Mary-Anne O'Brien"));
        assert!(is_valid_name("J. R. Martinez"));
    }

    #[test]
    fn single_word_rejected() {
        assert!(!is_valid_name("Jane"));
    }

    #[test]
    fn digits_and_symbols_rejected() {
        assert!(!is_valid_name("Jane Doe2"));
        assert!(!is_valid_name("Jane @Doe"));
        assert!(!is_valid_name("Jane Doe <jane@example.com>"));
    }

    #[test]
    fn lowercase_start_rejected() {
        assert!(!is_valid_name("jane Doe"));
    }

    #[test]
    fn placeholders_rejected_even_if_pattern_matched() {
        assert!(!is_valid_name("Staff Writer"));
        assert!(!is_valid_name("Associated Press"));
        assert!(!is_valid_name("News Desk"));
        assert!(!is_valid_name("The Editorial Board"));
    }

    #[test]
    fn length_bounds_enforced() {
        assert!(!is_valid_name("A"));
        let long = "Aa ".repeat(25);
        assert!(!is_valid_name(&long));
    }

    // --- name resolution order ---

    #[test]
    fn structured_author_wins() {
        let byline = extract_byline(
            r#"<meta name="author" content="Other Person">"#,
            "By Third Person",
            "example.com",
            Some("Jane Doe"),
        )
        .unwrap();
        assert_eq!(byline.name, "Jane Doe");
    }

    #[test]
    fn invalid_structured_author_falls_through() {
        let byline = extract_byline(
            r#"<meta name="author" content="Jane Doe">"#,
            "",
            "example.com",
            Some("Staff Writer"),
        )
        .unwrap();
        assert_eq!(byline.name, "Jane Doe");
    }

    #[test]
    fn json_ld_person_extracted() {
        let html = r#"<script type="application/ld+json">
            {"@type":"NewsArticle","author":{"@type":"Person","name":"Carlos Rivera"}}
        </script>"#;
        let byline = extract_byline(html, "", "example.com", None).unwrap();
        assert_eq!(byline.name, "Carlos Rivera");
    }

    #[test]
    fn json_ld_author_array_extracted() {
        let html = r#"{"author":[{"@type":"Person","name":"Dana Whitfield"}]}"#;
        let byline = extract_byline(html, "", "example.com", None).unwrap();
        assert_eq!(byline.name, "Dana Whitfield");
    }

    #[test]
    fn meta_tag_author_extracted() {
        let html = r#"<meta name="author" content="Priya Natarajan">"#;
        let byline = extract_byline(html, "", "example.com", None).unwrap();
        assert_eq!(byline.name, "Priya Natarajan");
    }

    #[test]
    fn article_author_url_is_skipped() {
        let html = r#"<meta property="article:author" content="https://facebook.com/janedoe">"#;
        assert!(extract_byline(html, "", "example.com", None).is_none());
    }

    #[test]
    fn by_line_pattern_extracted() {
        let text = "California passes solar checkoff bill\nBy Maria Gonzalez\nSACRAMENTO —";
        let byline = extract_byline("", text, "example.com", None).unwrap();
        assert_eq!(byline.name, "Maria Gonzalez");
    }

    #[test]
    fn by_prefix_stripped_from_meta_content() {
        let html = r#"<meta name="author" content="By Jane Doe">"#;
        let byline = extract_byline(html, "", "example.com", None).unwrap();
        assert_eq!(byline.name, "Jane Doe");
    }

    #[test]
    fn no_valid_name_yields_none() {
        let text = "The committee met Tuesday. Contact tips@example.com.";
        assert!(extract_byline("", text, "example.com", None).is_none());
    }

    // --- contact extraction ---

    #[test]
    fn personal_email_preferred_over_role_account() {
        let text = "By Jane Doe. Send tips to tips@herald.com or reach jdoe@herald.com.";
        let byline = extract_byline("", text, "herald.com", None).unwrap();
        assert_eq!(byline.email.as_deref(), Some("jdoe@herald.com"));
    }

    #[test]
    fn role_email_used_only_as_last_resort() {
        let text = "By Jane Doe. Contact info@herald.com.";
        let byline = extract_byline("", text, "herald.com", None).unwrap();
        assert_eq!(byline.email.as_deref(), Some("info@herald.com"));
    }

    #[test]
    fn outlet_domain_email_beats_other_domains() {
        let text = "By Jane Doe. jane@gmail.com jdoe@herald.com";
        let byline = extract_byline("", text, "herald.com", None).unwrap();
        assert_eq!(byline.email.as_deref(), Some("jdoe@herald.com"));
    }

    #[test]
    fn twitter_handle_overlapping_name_preferred() {
        let html = r#"<a href="https://twitter.com/HeraldNews"></a>
                      <a href="https://twitter.com/jdoe_reports"></a>"#;
        let byline = extract_byline(html, "By Jane Doe", "herald.com", None).unwrap();
        assert_eq!(byline.twitter.as_deref(), Some("jdoe_reports"));
    }

    #[test]
    fn chrome_handles_excluded() {
        let html = r#"<a href="https://twitter.com/share"></a>
                      <a href="https://twitter.com/intent"></a>"#;
        let byline = extract_byline(html, "By Jane Doe", "herald.com", None).unwrap();
        assert_eq!(byline.twitter, None);
    }

    #[test]
    fn first_plausible_handle_is_fallback() {
        let html = r#"<a href="https://x.com/HeraldCapitol"></a>"#;
        let byline = extract_byline(html, "By Jane Doe", "herald.com", None).unwrap();
        assert_eq!(byline.twitter.as_deref(), Some("HeraldCapitol"));
    }

    #[test]
    fn linkedin_only_when_literally_present() {
        let html = r#"<a href="https://www.linkedin.com/in/jane-doe-123">LinkedIn</a>"#;
        let byline = extract_byline(html, "By Jane Doe", "herald.com", None).unwrap();
        assert_eq!(
            byline.linkedin.as_deref(),
            Some("https://www.linkedin.com/in/jane-doe-123")
        );

        let without = extract_byline("", "By Jane Doe", "herald.com", None).unwrap();
        assert_eq!(without.linkedin, None);
    }

    #[test]
    fn phone_extracted_from_text() {
        let text = "By Jane Doe. Reach the reporter at (916) 555-0142.";
        let byline = extract_byline("", text, "herald.com", None).unwrap();
        assert_eq!(byline.phone.as_deref(), Some("(916) 555-0142"));
    }

    #[test]
    fn extraction_is_deterministic() {
        let html = r#"<meta name="author" content="Jane Doe">
                      <a href="https://twitter.com/jdoe"></a>"#;
        let text = "By Jane Doe. jdoe@herald.com";
        let a = extract_byline(html, text, "herald.com", None);
        let b = extract_byline(html, text, "herald.com", None);
        assert_eq!(a, b);
    }
}
