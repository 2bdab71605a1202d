use tracing::trace;

use crate::dom::{Dom, NodeId};
use crate::Result;

pub const FILE_LABEL_PLACEHOLDER: &str = "Choose file...";

/// Mirrors the selected file name of a file input into its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileLabel {
    pub input: NodeId,
    pub label: NodeId,
}

impl FileLabel {
    pub fn new(input: NodeId, label: NodeId) -> Self {
        Self { input, label }
    }

    /// Returns the text written to the label.
    pub fn update(&self, dom: &mut Dom) -> Result<String> {
        let text = dom
            .files(self.input)?
            .first()
            .cloned()
            .unwrap_or_else(|| FILE_LABEL_PLACEHOLDER.to_string());
        dom.set_text_content(self.label, &text)?;
        trace!(label = ?self.label, text = %text, "updated file label");
        Ok(text)
    }
}
