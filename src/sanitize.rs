//! Script stripping for HTML handled by the editor surface.
//!
//! Runs before content is sealed and again before decrypted content is shown.
//! This is not a general HTML sanitizer; it only removes `<script>` elements.

const OPEN: &str = "<script";
const CLOSE: &str = "</script>";

pub fn strip_scripts(html: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;

    while let Some(rel) = lower[pos..].find(OPEN) {
        let start = pos + rel;
        let after_name = start + OPEN.len();
        // `<scripts>` or `<scripting>` are not script elements.
        let is_element = lower[after_name..]
            .chars()
            .next()
            .is_some_and(|c| c == '>' || c.is_ascii_whitespace() || c == '/');
        if !is_element {
            out.push_str(&html[pos..after_name]);
            pos = after_name;
            continue;
        }

        out.push_str(&html[pos..start]);
        pos = match lower[after_name..].find(CLOSE) {
            Some(rel_end) => after_name + rel_end + CLOSE.len(),
            None => html.len(),
        };
    }

    out.push_str(&html[pos..]);
    out
}
