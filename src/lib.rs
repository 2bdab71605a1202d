//! Progressive enhancement for the scheduler simulator's server-rendered page.
//!
//! A [`Page`] parses the rendered HTML into an element tree, binds the page
//! behaviors once on [`Page::bind`], and then reacts to interactions delivered
//! through its harness-style API:
//!
//! ```
//! use page_enhancer::Page;
//!
//! let html = r#"
//!     <form>
//!       <input id="min_burst" type="number" value="1">
//!       <input id="max_burst" type="number" value="10">
//!     </form>
//! "#;
//!
//! let mut page = Page::from_html(html)?;
//! page.bind()?;
//! page.set_value("#min_burst", "12")?;
//! page.change("#min_burst")?;
//! page.assert_validity(
//!     "#max_burst",
//!     "Maximum value must be greater than or equal to minimum value",
//! )?;
//! # Ok::<(), page_enhancer::Error>(())
//! ```

mod collation;
mod config;
mod dom;
mod events;
mod file_label;
mod html;
mod numeric;
mod page;
mod selector;
mod sorter;
mod validation;
mod visibility;
mod widgets;

pub use collation::{Collator, Sensitivity};
pub use config::{DirectionPolicy, EnhancerConfig, FieldPairConfig, VisibilityConfig};
pub use dom::{Dom, NodeId};
pub use events::EventKind;
pub use file_label::{FileLabel, FILE_LABEL_PLACEHOLDER};
pub use numeric::{parse_float_prefix, parse_int_prefix};
pub use page::{Page, SubmitOutcome};
pub use sorter::{compare_cells, sort_rows, RowRecord, SortDirection, SortableTable};
pub use validation::{FieldPair, FormGate, RANGE_MESSAGE, WAS_VALIDATED_CLASS};
pub use visibility::{VisibilityRule, QUANTUM_ALGORITHMS};
pub use widgets::{Widget, WidgetKind};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("node is not an element: {0}")]
    NotAnElement(String),
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(String),
    #[error("type mismatch for {selector}: expected {expected}, actual {actual}")]
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    #[error("column {column} is out of range for a table with {columns} columns")]
    ColumnOutOfRange { column: usize, columns: usize },
    #[error("config error: {0}")]
    Config(String),
    #[error(
        "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
    )]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests;
