//! Machine-readable markers embedded in rendered reports
//!
//! Renderers embed the identifying fields as `name="value"` attributes so the
//! quality check can compare them with the source record without parsing the
//! whole document. Values are escaped the same way HTML attribute values are.

/// Attribute carrying the company name
pub const COMPANY_NAME_ATTR: &str = "data-company-name";

/// Attribute carrying the diagnosis identifier
pub const DIAGNOSIS_ID_ATTR: &str = "data-diagnosis-id";

/// Attribute carrying the total score
pub const TOTAL_SCORE_ATTR: &str = "data-total-score";

/// Escape a value for use inside a double-quoted attribute
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse [`escape`]
pub fn unescape(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Render `name="value"` with the value escaped
///
/// # Examples
///
/// ```
/// use bizscore_gatekeeper::markers::{attribute, extract, COMPANY_NAME_ATTR};
///
/// let html = format!("<div {}>", attribute(COMPANY_NAME_ATTR, "Smith & \"Sons\""));
/// assert_eq!(extract(&html, COMPANY_NAME_ATTR).as_deref(), Some("Smith & \"Sons\""));
/// ```
pub fn attribute(name: &str, value: &str) -> String {
    format!("{}=\"{}\"", name, escape(value))
}

/// Extract the first value of attribute `name`, unescaped
pub fn extract(content: &str, name: &str) -> Option<String> {
    let needle = format!("{}=\"", name);
    let start = content.find(&needle)? + needle.len();
    let rest = &content[start..];
    let end = rest.find('"')?;
    Some(unescape(&rest[..end]))
}

/// True when `content` contains `value` either verbatim or escaped
pub fn contains_text(content: &str, value: &str) -> bool {
    content.contains(value) || content.contains(&escape(value))
}

/// Count non-overlapping occurrences of `marker`
pub fn count_occurrences(content: &str, marker: &str) -> usize {
    if marker.is_empty() {
        return 0;
    }
    content.matches(marker).count()
}

/// `content` with every verbatim or escaped occurrence of `values` removed
///
/// # Examples
///
/// ```
/// use bizscore_gatekeeper::markers::mask;
///
/// assert_eq!(mask("<h1>Todo &amp; Co</h1>", &["Todo & Co"]), "<h1></h1>");
/// ```
pub fn mask(content: &str, values: &[&str]) -> String {
    let mut masked = content.to_string();
    for value in values.iter().filter(|v| !v.is_empty()) {
        masked = masked.replace(&escape(value), "").replace(*value, "");
    }
    masked
}

/// First placeholder marker found in `content`, compared case-insensitively
pub fn find_placeholder<'a>(content: &str, markers: &'a [String]) -> Option<&'a str> {
    let lowered = content.to_lowercase();
    markers
        .iter()
        .find(|m| lowered.contains(&m.to_lowercase()))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_missing_attribute() {
        assert_eq!(extract("<div>", COMPANY_NAME_ATTR), None);
        assert_eq!(extract("data-company-name=\"unterminated", COMPANY_NAME_ATTR), None);
    }

    #[test]
    fn test_extract_first_occurrence() {
        let html = format!(
            "<a {}><b {}>",
            attribute(TOTAL_SCORE_ATTR, "135"),
            attribute(TOTAL_SCORE_ATTR, "99")
        );
        assert_eq!(extract(&html, TOTAL_SCORE_ATTR).as_deref(), Some("135"));
    }

    #[test]
    fn test_escape_ampersand_first() {
        assert_eq!(escape("<&>"), "&lt;&amp;&gt;");
        assert_eq!(unescape("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_contains_text_accepts_escaped() {
        let html = "<h1>Smith &amp; Sons</h1>";
        assert!(contains_text(html, "Smith & Sons"));
        assert!(!contains_text(html, "Jones"));
    }

    #[test]
    fn test_find_placeholder_case_insensitive() {
        let markers = vec!["lorem ipsum".to_string(), "{{".to_string()];
        assert_eq!(find_placeholder("Lorem Ipsum dolor", &markers), Some("lorem ipsum"));
        assert_eq!(find_placeholder("Hello {{name}}", &markers), Some("{{"));
        assert_eq!(find_placeholder("clean", &markers), None);
    }

    #[test]
    fn test_mask_skips_empty_values() {
        assert_eq!(mask("Placeholder Media", &["", "Media"]), "Placeholder ");
    }

    #[test]
    fn test_count_occurrences() {
        assert_eq!(count_occurrences("<section><section>", "<section"), 2);
        assert_eq!(count_occurrences("abc", ""), 0);
    }
}
