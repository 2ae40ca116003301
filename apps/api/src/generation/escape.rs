//! Escaping of user-supplied text for embedding in generated Typst source.

/// Prefixes every backslash, double quote, `#` and `$` with a backslash.
///
/// Safe inside a string literal and inside a content block. Apply exactly once per
/// piece of user text; generated syntax (calls, date expressions) must never pass
/// through here.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '#' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
