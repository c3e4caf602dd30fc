/// Drops everything from the first `?` on, mirroring how embed URLs are
/// compared and re-emitted.
pub fn strip_query(raw: &str) -> &str {
    raw.split('?').next().unwrap_or(raw)
}

/// Escapes text for use inside HTML content or a double-quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut result = String::with_capacity(input.len());

    for c in input.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }

    result
}

/// Treats `None` and blank strings alike, the way markup attributes read.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("https://a.b/c?d=1"), "https://a.b/c");
        assert_eq!(strip_query("https://a.b/c"), "https://a.b/c");
        assert_eq!(strip_query("?x"), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(Some(" a ")), Some("a"));
    }
}
