//! Query construction for the discovery providers.
//!
//! Recall over precision: bill identifiers are expanded into every surface
//! form they appear as in free text, and a recognized jurisdiction name is
//! appended as a broadening term. Precision is enforced downstream by the
//! relevance gate, not here.

use presswatch_common::Topic;

/// Build the web-search query for a topic. Multi-word keywords are quoted,
/// bill identifiers expanded into their surface forms, and the state name
/// (when the code is recognized) appended as an extra disjunct.
/// Returns None when the topic has nothing searchable.
pub fn web_query(topic: &Topic) -> Option<String> {
    let mut terms: Vec<String> = Vec::new();

    for keyword in &topic.keywords {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            continue;
        }
        if keyword.contains(char::is_whitespace) {
            terms.push(format!("\"{keyword}\""));
        } else {
            terms.push(keyword.to_string());
        }
    }

    for bill in &topic.bill_numbers {
        let forms = expand_bill_number(bill);
        if forms.is_empty() {
            continue;
        }
        let quoted: Vec<String> = forms.iter().map(|f| format!("\"{f}\"")).collect();
        let expr = if quoted.len() == 1 {
            quoted.join("")
        } else {
            format!("({})", quoted.join(" OR "))
        };
        terms.push(expr);
    }

    if terms.is_empty() {
        return None;
    }

    if let Some(name) = topic.state.as_deref().and_then(state_name) {
        terms.push(format!("\"{name}\""));
    }

    Some(terms.join(" OR "))
}

/// Build the structured-provider query: a plain disjunction of keywords and
/// bill identifiers. No surface-form expansion — that provider stems its own
/// input. Returns None when the topic has nothing searchable.
pub fn structured_query(topic: &Topic) -> Option<String> {
    let mut terms: Vec<String> = topic
        .keywords
        .iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    terms.extend(
        topic
            .bill_numbers
            .iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty()),
    );

    if terms.is_empty() {
        return None;
    }

    if let Some(name) = topic.state.as_deref().and_then(state_name) {
        terms.push(name.to_string());
    }

    Some(terms.join(" OR "))
}

/// Expand a bill identifier into the surface forms it appears as in article
/// text: "SB-253" also shows up as "SB 253" and "SB253".
pub fn expand_bill_number(bill: &str) -> Vec<String> {
    let bill = bill.trim();
    if bill.is_empty() {
        return Vec::new();
    }

    let mut split = None;
    for (i, c) in bill.char_indices() {
        if c.is_ascii_digit() {
            split = Some(i);
            break;
        }
    }

    let Some(digit_start) = split else {
        return vec![bill.to_string()];
    };

    let prefix = bill[..digit_start].trim_end_matches(['-', ' ']).to_string();
    let number = &bill[digit_start..];

    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        return vec![bill.to_string()];
    }
    if !number.chars().all(|c| c.is_ascii_digit()) {
        return vec![bill.to_string()];
    }

    vec![
        format!("{prefix}-{number}"),
        format!("{prefix} {number}"),
        format!("{prefix}{number}"),
    ]
}

/// Full state name for a two-letter jurisdiction code.
pub fn state_name(code: &str) -> Option<&'static str> {
    let name = match code.to_uppercase().as_str() {
        "AL" => "Alabama",
        "AK" => "Alaska",
        "AZ" => "Arizona",
        "AR" => "Arkansas",
        "CA" => "California",
        "CO" => "Colorado",
        "CT" => "Connecticut",
        "DE" => "Delaware",
        "DC" => "District of Columbia",
        "FL" => "Florida",
        "GA" => "Georgia",
        "HI" => "Hawaii",
        "ID" => "Idaho",
        "IL" => "Illinois",
        "IN" => "Indiana",
        "IA" => "Iowa",
        "KS" => "Kansas",
        "KY" => "Kentucky",
        "LA" => "Louisiana",
        "ME" => "Maine",
        "MD" => "Maryland",
        "MA" => "Massachusetts",
        "MI" => "Michigan",
        "MN" => "Minnesota",
        "MS" => "Mississippi",
        "MO" => "Missouri",
        "MT" => "Montana",
        "NE" => "Nebraska",
        "NV" => "Nevada",
        "NH" => "New Hampshire",
        "NJ" => "New Jersey",
        "NM" => "New Mexico",
        "NY" => "New York",
        "NC" => "North Carolina",
        "ND" => "North Dakota",
        "OH" => "Ohio",
        "OK" => "Oklahoma",
        "OR" => "Oregon",
        "PA" => "Pennsylvania",
        "RI" => "Rhode Island",
        "SC" => "South Carolina",
        "SD" => "South Dakota",
        "TN" => "Tennessee",
        "TX" => "Texas",
        "UT" => "Utah",
        "VT" => "Vermont",
        "VA" => "Virginia",
        "WA" => "Washington",
        "WV" => "West Virginia",
        "WI" => "Wisconsin",
        "WY" => "Wyoming",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn topic(keywords: &[&str], bills: &[&str], state: Option<&str>) -> Topic {
        Topic {
            id: Uuid::new_v4(),
            name: "Test Topic".to_string(),
            state: state.map(String::from),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            bill_numbers: bills.iter().map(|s| s.to_string()).collect(),
            active: true,
        }
    }

    #[test]
    fn multi_word_keywords_are_quoted() {
        let q = web_query(&topic(&["solar checkoff"], &[], None)).unwrap();
        assert_eq!(q, "\"solar checkoff\"");
    }

    #[test]
    fn single_word_keywords_are_not_quoted() {
        let q = web_query(&topic(&["solar"], &[], None)).unwrap();
        assert_eq!(q, "solar");
    }

    #[test]
    fn bill_numbers_expand_to_surface_forms() {
        assert_eq!(
            expand_bill_number("SB-253"),
            vec!["SB-253", "SB 253", "SB253"]
        );
        assert_eq!(
            expand_bill_number("AB 1305"),
            vec!["AB-1305", "AB 1305", "AB1305"]
        );
        assert_eq!(expand_bill_number("HB72"), vec!["HB-72", "HB 72", "HB72"]);
    }

    #[test]
    fn unrecognized_bill_shape_passes_through() {
        assert_eq!(expand_bill_number("Prop 13A"), vec!["Prop 13A"]);
        assert_eq!(expand_bill_number("Measure"), vec!["Measure"]);
    }

    #[test]
    fn bill_forms_joined_as_disjunction() {
        let q = web_query(&topic(&[], &["SB-253"], None)).unwrap();
        assert_eq!(q, "(\"SB-253\" OR \"SB 253\" OR \"SB253\")");
    }

    #[test]
    fn known_state_appended_as_broadening_term() {
        let q = web_query(&topic(&["solar checkoff"], &[], Some("CA"))).unwrap();
        assert_eq!(q, "\"solar checkoff\" OR \"California\"");
    }

    #[test]
    fn unknown_state_not_appended() {
        let q = web_query(&topic(&["solar checkoff"], &[], Some("ZZ"))).unwrap();
        assert_eq!(q, "\"solar checkoff\"");
    }

    #[test]
    fn unsearchable_topic_builds_nothing() {
        assert!(web_query(&topic(&[], &[], Some("CA"))).is_none());
        assert!(structured_query(&topic(&[], &[], Some("CA"))).is_none());
    }

    #[test]
    fn structured_query_skips_expansion() {
        let q = structured_query(&topic(&["solar checkoff"], &["SB-253"], Some("CA"))).unwrap();
        assert_eq!(q, "solar checkoff OR SB-253 OR California");
    }

    #[test]
    fn state_table_round_trips_common_codes() {
        assert_eq!(state_name("CA"), Some("California"));
        assert_eq!(state_name("mn"), Some("Minnesota"));
        assert_eq!(state_name("DC"), Some("District of Columbia"));
        assert_eq!(state_name("XX"), None);
    }
}
