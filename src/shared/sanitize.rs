//! Allow-list HTML sanitizer for user-submitted comment bodies.
//!
//! Comment bodies arrive as HTML from the client rich-text editor and are
//! stored sanitized. Tags outside the allow list are stripped while their
//! inner text is kept; attributes are dropped except `href` on anchors,
//! which must carry a safe scheme.

use lazy_static::lazy_static;
use regex::Regex;

/// Tags the rich-text editor is allowed to produce.
const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "strong", "b", "em", "i", "u", "s", "a", "ul", "ol", "li", "blockquote", "code",
    "pre", "h1", "h2", "h3", "span",
];

lazy_static! {
    // Containers whose content must go too, not just the tags.
    static ref SCRIPT_BLOCK_RE: Regex =
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap();
    static ref STYLE_BLOCK_RE: Regex =
        Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap();
    static ref IFRAME_BLOCK_RE: Regex =
        Regex::new(r"(?is)<iframe\b[^>]*>.*?</iframe\s*>").unwrap();
    static ref COMMENT_RE: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();

    // Quoted attribute values may contain '>', so the attribute part
    // consumes whole quoted strings before falling back to single chars.
    static ref TAG_RE: Regex =
        Regex::new(r#"(?is)<\s*(/?)\s*([a-z][a-z0-9]*)((?:"[^"]*"|'[^']*'|[^>])*?)>"#).unwrap();
    static ref HREF_RE: Regex =
        Regex::new(r#"(?i)href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap();
}

/// Sanitize raw HTML into the stored representation.
pub fn sanitize_html(raw: &str) -> String {
    let text = SCRIPT_BLOCK_RE.replace_all(raw, "");
    let text = STYLE_BLOCK_RE.replace_all(&text, "");
    let text = IFRAME_BLOCK_RE.replace_all(&text, "");
    let text = COMMENT_RE.replace_all(&text, "");

    TAG_RE
        .replace_all(&text, |caps: &regex::Captures| {
            let closing = !caps[1].is_empty();
            let tag = caps[2].to_lowercase();
            let attrs = &caps[3];

            if !ALLOWED_TAGS.contains(&tag.as_str()) {
                return String::new();
            }

            if closing {
                if tag == "br" {
                    return String::new();
                }
                return format!("</{}>", tag);
            }

            if tag == "a" {
                if let Some(href) = extract_safe_href(attrs) {
                    return format!("<a href=\"{}\">", href);
                }
                return "<a>".to_string();
            }

            format!("<{}>", tag)
        })
        .into_owned()
}

/// Pull the href out of an anchor's attribute string, rejecting executable
/// URL schemes.
fn extract_safe_href(attrs: &str) -> Option<String> {
    let caps = HREF_RE.captures(attrs)?;
    let href = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))?
        .as_str()
        .trim();

    let lowered = href.to_lowercase();
    let scheme_blocked = ["javascript:", "data:", "vbscript:"]
        .iter()
        .any(|s| lowered.starts_with(s));

    if href.is_empty() || scheme_blocked || href.contains('"') {
        return None;
    }

    Some(href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(sanitize_html("just a thought"), "just a thought");
    }

    #[test]
    fn test_allowed_formatting_is_kept() {
        assert_eq!(
            sanitize_html("<p>I <strong>agree</strong> with this</p>"),
            "<p>I <strong>agree</strong> with this</p>"
        );
    }

    #[test]
    fn test_script_block_removed_with_content() {
        assert_eq!(
            sanitize_html("hello<script>alert('x')</script> world"),
            "hello world"
        );
    }

    #[test]
    fn test_style_and_comments_removed() {
        assert_eq!(
            sanitize_html("<style>p{color:red}</style><!-- hidden -->ok"),
            "ok"
        );
    }

    #[test]
    fn test_unknown_tags_stripped_keeping_text() {
        assert_eq!(
            sanitize_html("<div><video>clip</video>text</div>"),
            "cliptext"
        );
    }

    #[test]
    fn test_event_handlers_dropped() {
        assert_eq!(
            sanitize_html(r#"<p onclick="steal()">hi</p>"#),
            "<p>hi</p>"
        );
    }

    #[test]
    fn test_javascript_href_dropped() {
        assert_eq!(
            sanitize_html(r#"<a href="javascript:alert(1)">link</a>"#),
            "<a>link</a>"
        );
    }

    #[test]
    fn test_http_href_kept() {
        assert_eq!(
            sanitize_html(r#"<a href="https://example.com" onclick="x()">link</a>"#),
            r#"<a href="https://example.com">link</a>"#
        );
    }

    #[test]
    fn test_gt_inside_quoted_attribute_does_not_split_tag() {
        assert_eq!(
            sanitize_html(r#"<a href="https://example.com/a>b">link</a>"#),
            r#"<a href="https://example.com/a>b">link</a>"#
        );
    }

    #[test]
    fn test_gt_inside_quoted_attribute_of_stripped_tag() {
        assert_eq!(
            sanitize_html(r#"<img src="https://example.com/a>b.png">caption"#),
            "caption"
        );
    }

    #[test]
    fn test_mention_tokens_survive_sanitization() {
        // Mentions are resolved from sanitized text, so the bracket syntax
        // must come through untouched.
        assert_eq!(
            sanitize_html("<p>I agree [Bob]</p>"),
            "<p>I agree [Bob]</p>"
        );
    }
}
