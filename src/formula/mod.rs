//! LaTeX delimiter rewriting.
//!
//! Model output uses `\[ ... \]` for display math and `\( ... \)` for inline
//! math. Markdown renderers expect `$$ ... $$` and `$ ... $`. This module
//! provides two equivalent rewriters:
//!
//! - [`convert`]: batch conversion of a complete text, used for archived
//!   output.
//! - [`FormulaFilter`]: an incremental state machine fed one fragment at a
//!   time while a response is still streaming.
//!
//! For any input without an unterminated delimiter, feeding the text through
//! a [`FormulaFilter`] and calling [`FormulaFilter::finish`] yields exactly
//! `convert(text)`.

pub mod convert;
pub mod filter;

pub use convert::convert;
pub use filter::FormulaFilter;

/// Kind of a LaTeX math span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `\[ ... \]`, rewritten to `$$ ... $$`.
    Display,
    /// `\( ... \)`, rewritten to `$ ... $` with the body trimmed.
    Inline,
}

impl Delimiter {
    /// Returns the delimiter opened by a backslash followed by `c`.
    #[must_use]
    pub const fn from_opening(c: char) -> Option<Self> {
        match c {
            '[' => Some(Self::Display),
            '(' => Some(Self::Inline),
            _ => None,
        }
    }

    /// The two-character LaTeX sequence that closes this span.
    #[must_use]
    pub const fn closing(self) -> &'static str {
        match self {
            Self::Display => "\\]",
            Self::Inline => "\\)",
        }
    }

    /// The markdown math fence written on both sides of the body.
    #[must_use]
    pub const fn fence(self) -> &'static str {
        match self {
            Self::Display => "$$",
            Self::Inline => "$",
        }
    }

    /// Normalizes a span body. Inline bodies lose surrounding whitespace,
    /// display bodies are kept verbatim.
    #[must_use]
    pub fn body(self, raw: &str) -> &str {
        match self {
            Self::Display => raw,
            Self::Inline => raw.trim(),
        }
    }

    /// Writes a closed span into `out`.
    pub(crate) fn write_span(self, out: &mut String, raw: &str) {
        out.push_str(self.fence());
        out.push_str(self.body(raw));
        out.push_str(self.fence());
    }
}
