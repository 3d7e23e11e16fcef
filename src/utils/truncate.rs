//! Byte-bounded truncation that keeps UTF-8 and markup entities intact.

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `max_len` bytes.
///
/// Text already within the bound is returned unchanged. Otherwise the cut
/// lands on a character boundary, an entity left open by the cut (`&amp` with
/// no `;`) is dropped, and [`ELLIPSIS`] is appended.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    if max_len < ELLIPSIS.len() {
        return ELLIPSIS[..max_len].to_string();
    }

    let mut cut = max_len - ELLIPSIS.len();
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut prefix = &text[..cut];

    if let Some(amp) = prefix.rfind('&') {
        if !prefix[amp..].contains(';') {
            prefix = &prefix[..amp];
        }
    }

    let mut out = String::with_capacity(prefix.len() + ELLIPSIS.len());
    out.push_str(prefix);
    out.push_str(ELLIPSIS);
    out
}
