//! Helpers for working with raw page markup and building selectors.

/// The first `max_chars` characters of `markup`, cut on a char boundary.
pub fn excerpt(markup: &str, max_chars: usize) -> &str {
    match markup.char_indices().nth(max_chars) {
        Some((end, _)) => &markup[..end],
        None => markup,
    }
}

/// Quote `value` as a single-quoted CSS string.
pub fn css_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\a "),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Whether `value` can be written as a bare `#id` selector.
pub fn is_css_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Selector for an element with the given id.
pub fn id_selector(id: &str) -> String {
    if is_css_identifier(id) {
        format!("#{}", id)
    } else {
        format!("[id={}]", css_string(id))
    }
}

/// Selector matching `tag` elements whose `attr` equals `value`.
pub fn attr_selector(tag: &str, attr: &str, value: &str) -> String {
    format!("{}[{}={}]", tag, attr, css_string(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_is_char_safe() {
        assert_eq!(excerpt("héllo", 2), "hé");
        assert_eq!(excerpt("abc", 10), "abc");
        assert_eq!(excerpt("", 5), "");
    }

    #[test]
    fn test_css_string_escapes_quotes() {
        assert_eq!(css_string("q"), "'q'");
        assert_eq!(css_string("it's"), "'it\\'s'");
        assert_eq!(css_string("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_css_identifier("search-box_1"));
        assert!(!is_css_identifier("1search"));
        assert!(!is_css_identifier("a.b"));
        assert!(!is_css_identifier(""));
    }

    #[test]
    fn test_selectors() {
        assert_eq!(id_selector("searchbox"), "#searchbox");
        assert_eq!(id_selector("search:field"), "[id='search:field']");
        assert_eq!(attr_selector("input", "name", "q"), "input[name='q']");
    }
}
