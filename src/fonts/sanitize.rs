//! Plain-text sanitization for submitted metadata values.

/// Reduce a submitted value to a single line of plain text.
///
/// Markup is stripped (script and style elements with their content), a `<`
/// that does not open a tag becomes `&lt;`, control characters are dropped,
/// whitespace runs collapse to one space and the result is trimmed.
pub fn sanitize_text_field(input: &str) -> String {
    let text = strip_tags(input);

    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if ch.is_control() {
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if !opens_tag(tail) {
            out.push_str("&lt;");
            rest = &tail[1..];
            continue;
        }

        // Elements whose content is never text
        if let Some(name) = ["script", "style"].into_iter().find(|n| starts_with_tag(tail, n)) {
            let close = format!("</{}", name);
            rest = match find_ascii_ci(tail, &close) {
                Some(end) => match tail[end..].find('>') {
                    Some(gt) => &tail[end + gt + 1..],
                    None => "",
                },
                None => "",
            };
            continue;
        }

        // Unterminated tags swallow the remainder
        rest = match tail.find('>') {
            Some(gt) => &tail[gt + 1..],
            None => "",
        };
    }
    out.push_str(rest);
    out
}

fn opens_tag(tail: &str) -> bool {
    matches!(
        tail[1..].chars().next(),
        Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!' || c == '?'
    )
}

fn starts_with_tag(tail: &str, name: &str) -> bool {
    let after = &tail[1..];
    after.len() >= name.len()
        && after.as_bytes()[..name.len()].eq_ignore_ascii_case(name.as_bytes())
        && !after[name.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric())
}

fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.len() > hay.len() {
        return None;
    }
    (0..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values_pass_through() {
        assert_eq!(sanitize_text_field("700"), "700");
        assert_eq!(
            sanitize_text_field("http://example.com/media/3/Inter.woff2"),
            "http://example.com/media/3/Inter.woff2"
        );
        assert_eq!(sanitize_text_field(""), "");
    }

    #[test]
    fn test_whitespace_and_controls() {
        assert_eq!(sanitize_text_field("  italic \n"), "italic");
        assert_eq!(sanitize_text_field("a\t\tb\r\nc"), "a b c");
        assert_eq!(sanitize_text_field("bo\u{0}ld"), "bold");
        assert_eq!(sanitize_text_field(" \n\t "), "");
    }

    #[test]
    fn test_markup_is_stripped() {
        assert_eq!(sanitize_text_field("<b>bold</b>"), "bold");
        assert_eq!(
            sanitize_text_field("x<script>alert('x')</script>y"),
            "xy"
        );
        assert_eq!(sanitize_text_field("a<STYLE>p{}</Style>b"), "ab");
        assert_eq!(sanitize_text_field("url<img src=x onerror=alert(1)"), "url");
    }

    #[test]
    fn test_lone_less_than_is_escaped() {
        assert_eq!(sanitize_text_field("a < b"), "a &lt; b");
        assert_eq!(sanitize_text_field("<3"), "&lt;3");
    }
}
