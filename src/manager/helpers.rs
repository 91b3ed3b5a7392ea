//! Helper functions for captured output
//!
//! Pure text transformations, independent of capture timing.

/// Placeholder delivered when a command produced no output
pub const NO_RESPONSE: &str = "(no response)";

/// Appended after truncated output
pub const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Lines that are nothing but a prompt
const BARE_PROMPTS: &[&str] = &["$", "#", ">", "%", ">>>", "PS>"];

/// Turn raw captured text into display text
///
/// - carriage returns are removed
/// - surrounding whitespace is trimmed
/// - a trailing shell prompt line is dropped
/// - empty output becomes [`NO_RESPONSE`]
/// - output longer than `max_chars` characters is cut to `max_chars` and
///   followed by [`TRUNCATION_MARKER`]
///
/// # Examples
/// ```
/// use stellarlink::manager::render_capture;
///
/// assert_eq!(render_capture("uid=0(root)\r\n$ ", 1900), "uid=0(root)");
/// assert_eq!(render_capture("  \r\n", 1900), "(no response)");
/// ```
#[must_use]
pub fn render_capture(raw: &str, max_chars: usize) -> String {
    let normalized = raw.replace('\r', "");
    let mut text = normalized.trim();

    match text.rsplit_once('\n') {
        Some((body, last)) if is_prompt_line(last) => text = body.trim_end(),
        None if is_prompt_line(text) => text = "",
        _ => {}
    }

    if text.is_empty() {
        return NO_RESPONSE.to_string();
    }

    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Whether `line` looks like a bare shell prompt
///
/// Matches the bare markers (`$`, `#`, `>` ...) and prompts of the forms
/// `user@host:path$`, `C:\path>` and `C:>`.
#[must_use]
pub fn is_prompt_line(line: &str) -> bool {
    let line = line.trim();
    if BARE_PROMPTS.contains(&line) {
        return true;
    }

    let Some(marker) = line.chars().last() else {
        return false;
    };
    if !matches!(marker, '$' | '#' | '>' | '%') {
        return false;
    }

    let head = &line[..line.len() - marker.len_utf8()];
    let head = head.strip_prefix("PS ").unwrap_or(head);
    if head.is_empty() || head.contains(char::is_whitespace) {
        return false;
    }

    let unix_style = head.contains('@') && head.contains(':');
    let bytes = head.as_bytes();
    let drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    let windows_style = drive && (bytes.len() == 2 || head.contains('\\'));
    unix_style || windows_style
}
