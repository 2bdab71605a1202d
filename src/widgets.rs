use std::fmt;

use crate::dom::{Dom, NodeId};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Tooltip,
    Popover,
}

impl WidgetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tooltip => "tooltip",
            Self::Popover => "popover",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An element handed to the widget toolkit for initialization. Rendering is
/// the toolkit's business; the page only records the hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub node: NodeId,
    pub kind: WidgetKind,
    /// The `title` (tooltip) or `data-content` (popover) text, if any.
    pub content: Option<String>,
}

pub(crate) fn discover(dom: &Dom, selector: &str, kind: WidgetKind) -> Result<Vec<Widget>> {
    let content_attr = match kind {
        WidgetKind::Tooltip => "title",
        WidgetKind::Popover => "data-content",
    };
    Ok(dom
        .query_selector_all(selector)?
        .into_iter()
        .map(|node| Widget {
            node,
            kind,
            content: dom.attr(node, content_attr),
        })
        .collect())
}
