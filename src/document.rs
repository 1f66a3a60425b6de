//! Output document assembled by the solver.
//!
//! A document is a list of finished blocks plus at most one live block that
//! is replaced on every update. Rendering joins all blocks with a horizontal
//! rule between them.

use serde::Serialize;

/// Separator appended to every block when rendering.
pub const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// Ordered, titled sections of a solution.
///
/// # Examples
///
/// ```
/// use theoryx_rs::document::OutputDocument;
///
/// let mut doc = OutputDocument::new();
/// doc.set_live("# Image description\n\nA bea");
/// doc.set_live("# Image description\n\nA beam");
/// doc.commit("# Image description\n\nA beam on two supports.");
/// doc.set_live("# solver\n\nStep 1");
/// assert_eq!(
///     doc.render(),
///     "# Image description\n\nA beam on two supports.\n\n---\n\n\n\n# solver\n\nStep 1"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputDocument {
    blocks: Vec<String>,
    live: Option<String>,
}

impl OutputDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the live block, opening one if none exists.
    pub fn set_live(&mut self, content: impl Into<String>) {
        self.live = Some(content.into());
    }

    /// Replaces the live block with its final content and freezes it.
    ///
    /// Without a live block this appends a new finished block.
    pub fn commit(&mut self, content: impl Into<String>) {
        self.live = None;
        self.blocks.push(content.into());
    }

    /// Freezes the live block as is and appends a finished block after it.
    pub fn append(&mut self, content: impl Into<String>) {
        if let Some(live) = self.live.take() {
            self.blocks.push(live);
        }
        self.blocks.push(content.into());
    }

    /// Content of the live block, if one is open.
    #[cfg(test)]
    pub(crate) fn live(&self) -> Option<&str> {
        self.live.as_deref()
    }

    /// Finished blocks in order.
    #[cfg(test)]
    pub(crate) fn blocks(&self) -> &[String] {
        &self.blocks
    }

    /// Returns `true` when the document has no blocks at all.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.live.is_none()
    }

    /// Renders all blocks, live block last, without the trailing separator.
    #[must_use]
    pub fn render(&self) -> String {
        let rendered = self
            .blocks
            .iter()
            .map(String::as_str)
            .chain(self.live.as_deref())
            .map(|block| format!("{block}{BLOCK_SEPARATOR}"))
            .collect::<Vec<_>>()
            .join("\n\n");

        match rendered.strip_suffix(BLOCK_SEPARATOR) {
            Some(trimmed) => trimmed.to_string(),
            None => rendered,
        }
    }
}
