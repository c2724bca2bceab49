//! Share URL layout: `<origin><path>#note=<token>`.

/// Fragment key that marks a URL as carrying a sealed note.
pub const NOTE_MARKER: &str = "note=";

/// Append the note fragment to `base`, replacing any fragment it already has.
pub fn share_url(base: &str, token: &str) -> String {
    format!("{}#{NOTE_MARKER}{token}", strip_fragment(base))
}

/// Cheap detection used before any parsing.
fn has_note_marker(url: &str) -> bool {
    fragment(url).is_some_and(|f| f.contains(NOTE_MARKER))
}

/// Pull the token out of the fragment.
///
/// Returns `None` when the URL does not carry a note at all. Escaped base64
/// punctuation (`%2B`, `%2F`, `%3D`) from links produced with the standard
/// alphabet is unescaped here.
pub fn extract_token(url: &str) -> Option<String> {
    if !has_note_marker(url) {
        return None;
    }
    let fragment = fragment(url)?;
    let start = fragment.find(NOTE_MARKER)? + NOTE_MARKER.len();
    let raw = fragment[start..].split('&').next().unwrap_or_default();
    Some(unescape_base64_punctuation(raw))
}

/// The URL with its fragment removed, i.e. what a viewer should leave in the
/// address bar once a self-destructing note has been read.
pub fn strip_fragment(url: &str) -> &str {
    match url.find('#') {
        Some(idx) => &url[..idx],
        None => url,
    }
}

fn fragment(url: &str) -> Option<&str> {
    url.find('#').map(|idx| &url[idx + 1..])
}

fn unescape_base64_punctuation(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find('%') {
        out.push_str(&rest[..idx]);
        let escape = rest.get(idx..idx + 3).unwrap_or(&rest[idx..]);
        let decoded = match escape.to_ascii_uppercase().as_str() {
            "%2B" => Some('+'),
            "%2F" => Some('/'),
            "%3D" => Some('='),
            _ => None,
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[idx + escape.len()..];
            }
            None => {
                out.push('%');
                rest = &rest[idx + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_url_with_marker() {
        let url = share_url("https://example.com/app/", "abc_-123");
        assert_eq!(url, "https://example.com/app/#note=abc_-123");
        assert!(has_note_marker(&url));
    }

    #[test]
    fn replaces_existing_fragment() {
        let url = share_url("https://example.com/#old", "tok");
        assert_eq!(url, "https://example.com/#note=tok");
    }

    #[test]
    fn extracts_token() {
        assert_eq!(
            extract_token("https://example.com/#note=abc").as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn url_without_marker_has_no_token() {
        assert_eq!(extract_token("https://example.com/"), None);
        assert_eq!(extract_token("https://example.com/#section"), None);
        assert!(!has_note_marker("https://example.com/?note=abc"));
    }

    #[test]
    fn empty_token_is_still_a_note_url() {
        assert_eq!(extract_token("https://example.com/#note=").as_deref(), Some(""));
    }

    #[test]
    fn unescapes_percent_encoded_standard_base64() {
        let token = extract_token("https://example.com/#note=ab%2Bc%2fd%3D%3D").unwrap();
        assert_eq!(token, "ab+c/d==");
    }

    #[test]
    fn leaves_unknown_escapes_alone() {
        let token = extract_token("https://example.com/#note=a%20b%").unwrap();
        assert_eq!(token, "a%20b%");
    }

    #[test]
    fn stops_at_next_fragment_parameter() {
        let token = extract_token("https://example.com/#view=1&note=abc&x=y").unwrap();
        assert_eq!(token, "abc");
    }

    #[test]
    fn strip_fragment_drops_token() {
        assert_eq!(
            strip_fragment("https://example.com/app#note=abc"),
            "https://example.com/app"
        );
        assert_eq!(strip_fragment("https://example.com/"), "https://example.com/");
    }
}
