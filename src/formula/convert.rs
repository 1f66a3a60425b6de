//! Batch formula conversion.

use super::Delimiter;

/// Converts every LaTeX math span in `text` to markdown math.
///
/// - `\[ body \]` becomes `$$ body $$` (body untouched)
/// - `\( body \)` becomes `$body$` (body trimmed)
///
/// A backslash followed by anything else is copied through together with
/// its follower, so `\\[` is an escaped backslash followed by a plain `[`.
/// An opener without a matching closer turns the rest of the input into the
/// span body and the span is never closed.
///
/// # Examples
///
/// ```
/// use theoryx_rs::formula::convert;
///
/// assert_eq!(convert(r"Energy \( E = mc^2 \) holds."), "Energy $E = mc^2$ holds.");
/// assert_eq!(convert(r"\[ F = ma \]"), "$$ F = ma $$");
/// ```
#[must_use]
pub fn convert(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let mut after = rest[pos + 1..].chars();

        match after.next() {
            Some(c) => match Delimiter::from_opening(c) {
                Some(delim) => {
                    let body = after.as_str();
                    if let Some(end) = body.find(delim.closing()) {
                        delim.write_span(&mut out, &body[..end]);
                        rest = &body[end + delim.closing().len()..];
                    } else {
                        out.push_str(delim.fence());
                        out.push_str(delim.body(body));
                        return out;
                    }
                }
                None => {
                    out.push('\\');
                    out.push(c);
                    rest = after.as_str();
                }
            },
            None => {
                out.push('\\');
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
