use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use std::borrow::Cow;

const SPECIAL: [&str; 5] = ["&", "<", ">", "\"", "'"];
const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"];

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(SPECIAL).expect("Failed to build XML escaper")
});

/// Escape XML special characters.
///
/// Text without any of the five special characters is returned borrowed.
///
/// # Examples
///
/// ```
/// use canvas_pptx::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<t>\"hi\"</t>"), "&lt;t&gt;&quot;hi&quot;&lt;/t&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    if XML_ESCAPER.is_match(s) {
        Cow::Owned(XML_ESCAPER.replace_all(s, &ENTITIES))
    } else {
        Cow::Borrowed(s)
    }
}

/// Append `s` to `out`, escaping XML special characters on the way.
#[inline]
pub fn push_escaped(out: &mut String, s: &str) {
    XML_ESCAPER.replace_all_with(s, out, |mat, _, dst| {
        dst.push_str(ENTITIES[mat.pattern().as_usize()]);
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(escape_xml("Hello"), Cow::Borrowed("Hello")));
    }

    #[test]
    fn test_all_entities() {
        assert_eq!(escape_xml("&<>\"'"), "&amp;&lt;&gt;&quot;&apos;");
    }

    #[test]
    fn test_push_escaped_appends() {
        let mut out = String::from("<a:t>");
        push_escaped(&mut out, "R&D <draft>");
        out.push_str("</a:t>");
        assert_eq!(out, "<a:t>R&amp;D &lt;draft&gt;</a:t>");
    }
}
