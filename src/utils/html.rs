//! Escaping for the probe documents fed to the CSS tool.

use std::borrow::Cow;

/// Escape text content (`<title>`): `&`, `<`, `>`.
pub fn escape(s: &str) -> Cow<'_, str> {
    replace_chars(s, text_entity)
}

/// Escape a double- or single-quoted attribute value: text escapes plus quotes.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    replace_chars(s, |c| match c {
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        other => text_entity(other),
    })
}

fn text_entity(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    }
}

/// Borrow `s` unchanged unless some char has a replacement.
fn replace_chars(s: &str, entity: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    let Some(first) = s.char_indices().find(|&(_, c)| entity(c).is_some()).map(|(i, _)| i) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len() + 8);
    out.push_str(&s[..first]);
    for c in s[first..].chars() {
        match entity(c) {
            Some(e) => out.push_str(e),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_names_borrow() {
        assert!(matches!(escape("pricing"), Cow::Borrowed("pricing")));
        assert_eq!(escape("a & <b>"), "a &amp; &lt;b&gt;");
        // quotes are fine in text content
        assert_eq!(escape("it's \"new\""), "it's \"new\"");
    }

    #[test]
    fn test_class_tokens() {
        assert!(matches!(escape_attr("hover:bg-gray-100"), Cow::Borrowed(_)));
        assert_eq!(escape_attr("w-1/2"), "w-1/2");
        assert_eq!(escape_attr("x\"><b"), "x&quot;&gt;&lt;b");
        assert_eq!(escape_attr("{{'a'}}"), "{{&#39;a&#39;}}");
    }
}
