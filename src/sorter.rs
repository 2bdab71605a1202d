use std::cmp::Ordering;

use tracing::debug;

use crate::collation::Collator;
use crate::config::DirectionPolicy;
use crate::dom::{Dom, NodeId};
use crate::numeric::parse_float_prefix;
use crate::{Error, Result};

pub(crate) const SORT_DIR_ATTR: &str = "data-sort-dir";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    /// Value written to the table's `data-sort-dir` attribute: the direction
    /// of the sort that was just applied.
    pub fn as_attr(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    pub fn from_attr(raw: &str) -> Option<Self> {
        match raw.trim() {
            "asc" => Some(Self::Ascending),
            "desc" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// A data row as read from the tree at sort time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    /// The `<tr>` the cells were read from; used only to re-insert the row.
    pub node: NodeId,
    /// Trimmed text of each cell, one per column.
    pub cells: Vec<String>,
}

impl RowRecord {
    /// Text of `column`, or `""` for rows that are short of cells.
    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or_default()
    }
}

/// Compares two cell texts: numerically when both have a numeric prefix,
/// otherwise with the collator.
pub fn compare_cells(
    left: &str,
    right: &str,
    direction: SortDirection,
    collator: &Collator,
) -> Ordering {
    let left_num = parse_float_prefix(left);
    let right_num = parse_float_prefix(right);

    let ordering = if !left_num.is_nan() && !right_num.is_nan() {
        left_num.partial_cmp(&right_num).unwrap_or(Ordering::Equal)
    } else {
        collator.compare(left, right)
    };
    direction.apply(ordering)
}

/// Stable in-place sort of `rows` by `column`.
pub fn sort_rows(
    rows: &mut Vec<RowRecord>,
    column: usize,
    direction: SortDirection,
    collator: &Collator,
) {
    merge_sort_by(rows, &mut |a: &RowRecord, b: &RowRecord| {
        compare_cells(a.cell(column), b.cell(column), direction, collator)
    });
}

// Mixing numeric and lexical comparison is not a total order (e.g. "+5",
// "3", "+a" form a cycle), so this merge sort never assumes one. It only
// requires the comparator to be callable and keeps equal elements in input
// order.
fn merge_sort_by<T, F>(items: &mut Vec<T>, compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return;
    }
    let mut right = items.split_off(items.len() / 2);
    merge_sort_by(items, compare);
    merge_sort_by(&mut right, compare);

    let left = std::mem::take(items);
    items.reserve(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(r, l) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        items.extend(next);
    }
}

/// A table whose body rows reorder when a header is activated.
///
/// The direction is one value for the whole table. Under
/// [`DirectionPolicy::Global`] every activation flips it, whichever column
/// is targeted; [`DirectionPolicy::ResetOnColumnChange`] starts a new column
/// at ascending instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortableTable {
    pub table: NodeId,
    pub body: NodeId,
    pub headers: Vec<NodeId>,
    header_row: Option<NodeId>,
    direction: Option<SortDirection>,
    last_sorted_column: Option<usize>,
    policy: DirectionPolicy,
}

impl SortableTable {
    pub fn new(table: NodeId, body: NodeId, headers: Vec<NodeId>) -> Self {
        Self {
            table,
            body,
            headers,
            header_row: None,
            direction: None,
            last_sorted_column: None,
            policy: DirectionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DirectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reads the body, the header cells and any direction the server already
    /// rendered into `data-sort-dir`. Tables without a `<tbody>` are skipped.
    ///
    /// Without a `<thead>`, a header row written straight under `<table>`
    /// lands in the implied body. When no `th` exists outside the body, a
    /// leading body row made only of `th` cells is taken as the header row
    /// and stays in place while the rows below it are sorted.
    pub fn discover(dom: &Dom, table: NodeId) -> Result<Option<Self>> {
        let Some(body) = dom.query_selector_from(table, "tbody")? else {
            return Ok(None);
        };
        let mut headers: Vec<NodeId> = dom
            .query_selector_all_from(table, "th")?
            .into_iter()
            .filter(|th| !dom.is_descendant_of(*th, body))
            .collect();

        let mut header_row = None;
        if headers.is_empty() {
            let first_row = dom
                .element_children(body)
                .into_iter()
                .find(|row| dom.tag_name(*row) == Some("tr"));
            if let Some(row) = first_row {
                let cells = row_cells(dom, row);
                if !cells.is_empty() && cells.iter().all(|cell| dom.tag_name(*cell) == Some("th")) {
                    headers = cells;
                    header_row = Some(row);
                }
            }
        }

        let mut sortable = Self::new(table, body, headers);
        sortable.header_row = header_row;
        sortable.direction = dom
            .attr(table, SORT_DIR_ATTR)
            .and_then(|raw| SortDirection::from_attr(&raw));
        Ok(Some(sortable))
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.direction
    }

    pub fn last_sorted_column(&self) -> Option<usize> {
        self.last_sorted_column
    }

    pub fn policy(&self) -> DirectionPolicy {
        self.policy
    }

    /// Direction the next activation of `column` will apply.
    pub fn next_direction(&self, column: usize) -> SortDirection {
        match (self.policy, self.direction) {
            (DirectionPolicy::ResetOnColumnChange, _)
                if self.last_sorted_column != Some(column) =>
            {
                SortDirection::Ascending
            }
            (_, Some(current)) => current.toggled(),
            (_, None) => SortDirection::Ascending,
        }
    }

    /// The header row found inside the body, if any.
    pub fn header_row(&self) -> Option<NodeId> {
        self.header_row
    }

    pub fn rows(&self, dom: &Dom) -> Vec<RowRecord> {
        dom.element_children(self.body)
            .into_iter()
            .filter(|row| dom.tag_name(*row) == Some("tr") && Some(*row) != self.header_row)
            .map(|row| RowRecord {
                node: row,
                cells: row_cells(dom, row)
                    .into_iter()
                    .map(|cell| dom.text_content(cell).trim().to_string())
                    .collect(),
            })
            .collect()
    }

    pub fn column_count(&self, dom: &Dom) -> usize {
        if !self.headers.is_empty() {
            return self.headers.len();
        }
        self.rows(dom)
            .iter()
            .map(|row| row.cells.len())
            .max()
            .unwrap_or(0)
    }

    /// Sorts the body rows by `column` and returns the direction applied.
    /// An out-of-range column is rejected before anything is touched.
    pub fn sort(
        &mut self,
        dom: &mut Dom,
        column: usize,
        collator: &Collator,
    ) -> Result<SortDirection> {
        let columns = self.column_count(dom);
        if column >= columns {
            return Err(Error::ColumnOutOfRange { column, columns });
        }

        let direction = self.next_direction(column);
        let mut rows = self.rows(dom);
        sort_rows(&mut rows, column, direction, collator);

        for row in &rows {
            dom.remove_node(row.node);
        }
        for row in &rows {
            dom.append_child(self.body, row.node)?;
        }
        dom.set_attr(self.table, SORT_DIR_ATTR, direction.as_attr())?;

        self.direction = Some(direction);
        self.last_sorted_column = Some(column);
        debug!(
            table = ?self.table,
            column,
            direction = direction.as_attr(),
            rows = rows.len(),
            "sorted table"
        );
        Ok(direction)
    }
}

fn row_cells(dom: &Dom, row: NodeId) -> Vec<NodeId> {
    dom.element_children(row)
        .into_iter()
        .filter(|cell| matches!(dom.tag_name(*cell), Some("td") | Some("th")))
        .collect()
}
