//! Streaming formula conversion.
//!
//! [`FormulaFilter`] consumes a response fragment by fragment and keeps the
//! converted text accumulated so far. Callers re-render the whole document on
//! every update, so the filter exposes its full output rather than a delta.
//!
//! Spans are only written once their closer arrives. Until then the opener
//! and body stay buffered, which keeps every intermediate output free of
//! dangling `$` fences.

use super::Delimiter;

/// Incremental `\[ \]` / `\( \)` to `$$ $$` / `$ $` rewriter.
///
/// # Examples
///
/// ```
/// use theoryx_rs::formula::FormulaFilter;
///
/// let mut filter = FormulaFilter::new();
/// assert_eq!(filter.push("so \\( a"), "so ");
/// assert_eq!(filter.push(" \\) done"), "so $a$ done");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormulaFilter {
    /// Backslash waiting for the character that decides what it starts.
    pending: Option<char>,
    /// Span currently open, if any.
    open: Option<Delimiter>,
    /// Body of the open span, including a possibly half-read closer.
    formula: String,
    /// Converted text visible to callers.
    output: String,
}

impl FormulaFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a fragment and returns the full converted output so far.
    pub fn push(&mut self, fragment: &str) -> &str {
        for c in fragment.chars() {
            self.push_char(c);
        }
        &self.output
    }

    /// Feeds a single character.
    pub fn push_char(&mut self, c: char) {
        if let Some(delim) = self.open {
            self.formula.push(c);
            if self.formula.ends_with(delim.closing()) {
                let body_len = self.formula.len() - delim.closing().len();
                delim.write_span(&mut self.output, &self.formula[..body_len]);
                self.formula.clear();
                self.open = None;
            }
            return;
        }

        match self.pending.take() {
            None if c == '\\' => self.pending = Some(c),
            None => self.output.push(c),
            Some(backslash) => {
                if let Some(delim) = Delimiter::from_opening(c) {
                    self.open = Some(delim);
                    self.formula.clear();
                } else {
                    self.output.push(backslash);
                    self.output.push(c);
                }
            }
        }
    }

    /// Converted output accumulated so far.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Returns `true` while a span is open and its body is withheld.
    #[cfg(test)]
    pub(crate) const fn in_formula(&self) -> bool {
        self.open.is_some()
    }

    /// Ends the stream and returns the final output.
    ///
    /// A trailing lone backslash is written out. The body of a span that
    /// never closed is dropped.
    #[must_use]
    pub fn finish(mut self) -> String {
        if let Some(backslash) = self.pending.take() {
            self.output.push(backslash);
        }
        if let Some(delim) = self.open {
            tracing::debug!(
                delimiter = ?delim,
                dropped = self.formula.len(),
                "dropping unterminated formula at end of stream"
            );
        }
        self.output
    }
}
