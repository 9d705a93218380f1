//! Locating a JSON object inside free-form model output.

/// Return the first balanced `{...}` span in `text`.
///
/// Braces inside JSON string literals (including escaped quotes) do not
/// count toward nesting. Returns `None` when there is no `{` or the first
/// object never closes. The span is not parsed here, so prose such as
/// "use {salt}" ahead of the real payload still wins; callers treat a
/// failed parse of the span as an unusable response.
pub fn extract_first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}
