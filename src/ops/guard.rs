//! Input guard: the only trust boundary between typed text and stored markup.
//!
//! Every string that enters the canonical task list passes through
//! [`admit`], which rejects denylisted content with [`validate`] and then
//! entity-escapes it with [`sanitize`]. Stored text is therefore
//! pre-escaped markup: markup renderers emit it verbatim, and the terminal
//! renderer interprets the entities once with [`decode_entities`].

use std::sync::LazyLock;

use regex::RegexSet;

/// Error type for text rejected on the write path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("text is empty")]
    Empty,
    #[error("text contains unsafe markup")]
    Unsafe,
}

/// Case-insensitive denylist. A match anywhere in the text rejects it.
static DENYLIST: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        // a complete script element, across lines, up to the first close tag
        r"(?is)<script(?-u:\b).*?</script>",
        r"(?i)javascript:",
        // inline event handler attribute: onclick=, onload =, ...
        r"(?i)on(?-u:[a-z0-9_])+\s*=",
        // word boundaries and word characters are ASCII, so `<iframeé` still
        // opens an iframe
        r"(?i)<iframe(?-u:\b)",
        r"(?i)<object(?-u:\b)",
        r"(?i)<embed(?-u:\b)",
        r"(?i)<form(?-u:\b)",
    ])
    .expect("denylist patterns are valid")
});

/// Returns `false` if `text` contains any denylisted pattern.
/// Empty text is valid.
pub fn validate(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    !DENYLIST.is_match(text)
}

/// Escape the five markup-significant characters, then trim.
///
/// This neutralizes markup injection but does not remove denylisted
/// patterns; call [`validate`] first.
pub fn sanitize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Write-path check: reject empty or unsafe text, return the stored form.
pub fn admit(text: &str) -> Result<String, GuardError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GuardError::Empty);
    }
    if !validate(trimmed) {
        return Err(GuardError::Unsafe);
    }
    Ok(sanitize(trimmed))
}

/// Turn stored text back into plain characters for a non-markup surface.
///
/// Reverses exactly the entities produced by [`sanitize`]; any other `&`
/// sequence is left as typed.
pub fn decode_entities(text: &str) -> String {
    const ENTITIES: [(&str, char); 5] = [
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#x27;", '\''),
        ("&#x2F;", '/'),
    ];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match ENTITIES.iter().find(|(entity, _)| tail.starts_with(entity)) {
            Some((entity, c)) => {
                out.push(*c);
                rest = &tail[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
