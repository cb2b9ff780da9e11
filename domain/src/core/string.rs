//! String utilities for the domain layer.

/// Truncate a string to at most `max_len` bytes, appending `...` when cut.
///
/// The cut always lands on a char boundary.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3);
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// First line of `s`, truncated to `max_len` bytes.
///
/// Used for one-line previews of multi-line tool output.
pub fn first_line(s: &str, max_len: usize) -> String {
    let line = s.lines().next().unwrap_or_default();
    if line.len() < s.trim_end().len() {
        let cut = truncate(line, max_len.saturating_sub(3));
        if cut.ends_with("...") {
            cut
        } else {
            format!("{}...", cut)
        }
    } else {
        truncate(line, max_len)
    }
}
