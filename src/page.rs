use tracing::{debug, trace, warn};

use crate::collation::Collator;
use crate::config::EnhancerConfig;
use crate::dom::{Dom, NodeId};
use crate::events::{Behavior, EventKind, EventState, ListenerStore};
use crate::file_label::FileLabel;
use crate::html::parse_html;
use crate::sorter::{SortDirection, SortableTable};
use crate::validation::{FieldPair, FormGate};
use crate::visibility::VisibilityRule;
use crate::widgets::{self, Widget, WidgetKind};
use crate::{Error, Result};

const DEFAULT_TRACE_LOG_LIMIT: usize = 10_000;
const SORT_HINT_TITLE: &str = "Click to sort";

/// What happened to a submission after the submit listeners ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No listener prevented the default action.
    Submitted,
    /// A listener prevented the default action.
    Blocked,
    /// The target is not inside a form.
    NoForm,
}

impl SubmitOutcome {
    pub fn proceeds(self) -> bool {
        self == Self::Submitted
    }
}

/// The enhanced page: the element tree plus every behavior bound to it.
///
/// Nothing is bound until [`Page::bind`] is called. Interactions mirror what
/// a user does in the browser and deliver the same notifications (`input`,
/// `change`, `click`, `submit`) through the tree, bubbling from the target to
/// the document.
#[derive(Debug)]
pub struct Page {
    dom: Dom,
    config: EnhancerConfig,
    collator: Collator,
    listeners: ListenerStore,
    field_pairs: Vec<FieldPair>,
    tables: Vec<SortableTable>,
    visibility_rules: Vec<VisibilityRule>,
    file_labels: Vec<FileLabel>,
    gates: Vec<FormGate>,
    widgets: Vec<Widget>,
    bound: bool,
    trace: bool,
    trace_logs: Vec<String>,
    trace_log_limit: usize,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_config(html, EnhancerConfig::default())
    }

    pub fn from_html_with_config(html: &str, config: EnhancerConfig) -> Result<Self> {
        config.validate()?;
        let dom = parse_html(html)?;
        let collator = config.collator();
        Ok(Self {
            dom,
            config,
            collator,
            listeners: ListenerStore::default(),
            field_pairs: Vec::new(),
            tables: Vec::new(),
            visibility_rules: Vec::new(),
            file_labels: Vec::new(),
            gates: Vec::new(),
            widgets: Vec::new(),
            bound: false,
            trace: false,
            trace_logs: Vec::new(),
            trace_log_limit: DEFAULT_TRACE_LOG_LIMIT,
        })
    }

    /// The ready signal: discovers the configured elements and binds their
    /// behaviors. Elements that are missing are skipped. Calling it again
    /// does nothing.
    pub fn bind(&mut self) -> Result<()> {
        if self.bound {
            warn!("page already bound; ignoring repeated bind");
            self.trace_line("[bind] skipped already_bound".into());
            return Ok(());
        }

        self.bind_field_pairs();
        self.bind_visibility_rules()?;
        self.bind_file_label()?;
        self.bind_sortable_tables()?;
        self.bind_form_gate()?;
        self.bind_widgets()?;

        self.bound = true;
        debug!(
            field_pairs = self.field_pairs.len(),
            tables = self.tables.len(),
            visibility_rules = self.visibility_rules.len(),
            file_labels = self.file_labels.len(),
            widgets = self.widgets.len(),
            listeners = self.listeners.len(),
            "page bound"
        );
        self.trace_line(format!(
            "[bind] done pairs={} tables={} rules={} file_labels={} forms={} widgets={} listeners={}",
            self.field_pairs.len(),
            self.tables.len(),
            self.visibility_rules.len(),
            self.file_labels.len(),
            self.gates.len(),
            self.widgets.len(),
            self.listeners.len()
        ));
        Ok(())
    }

    fn bind_field_pairs(&mut self) {
        for pair_config in &self.config.field_pairs {
            let (Some(min), Some(max)) = (
                self.dom.by_id(&pair_config.min_id),
                self.dom.by_id(&pair_config.max_id),
            ) else {
                debug!(min = %pair_config.min_id, max = %pair_config.max_id, "field pair not on page");
                continue;
            };
            let idx = self.field_pairs.len();
            self.field_pairs.push(FieldPair::new(min, max));
            self.listeners
                .add(min, EventKind::Change, Behavior::ValidatePair(idx));
            self.listeners
                .add(max, EventKind::Change, Behavior::ValidatePair(idx));
        }
    }

    fn bind_visibility_rules(&mut self) -> Result<()> {
        for rule_config in &self.config.visibility {
            let Some(rule) = VisibilityRule::resolve(&self.dom, rule_config)? else {
                debug!(control = %rule_config.control_id, field = %rule_config.field_id, "visibility rule not on page");
                continue;
            };
            rule.apply(&mut self.dom)?;
            let idx = self.visibility_rules.len();
            self.listeners
                .add(rule.control, EventKind::Change, Behavior::ToggleVisibility(idx));
            self.visibility_rules.push(rule);
        }
        Ok(())
    }

    fn bind_file_label(&mut self) -> Result<()> {
        let input = self.dom.query_selector(&self.config.file_input_selector)?;
        let label = self.dom.query_selector(&self.config.file_label_selector)?;
        let (Some(input), Some(label)) = (input, label) else {
            return Ok(());
        };
        let idx = self.file_labels.len();
        self.file_labels.push(FileLabel::new(input, label));
        self.listeners
            .add(input, EventKind::Change, Behavior::UpdateFileLabel(idx));
        Ok(())
    }

    fn bind_sortable_tables(&mut self) -> Result<()> {
        for table in self
            .dom
            .query_selector_all(&self.config.sortable_table_selector)?
        {
            let Some(sortable) = SortableTable::discover(&self.dom, table)? else {
                debug!(table = ?table, "sortable table has no body");
                continue;
            };
            let table_idx = self.tables.len();
            for (column, header) in sortable.headers.iter().copied().enumerate() {
                if self.dom.class_contains(header, &self.config.no_sort_class) {
                    continue;
                }
                self.dom.set_style_property(header, "cursor", "pointer")?;
                self.dom.set_attr(header, "title", SORT_HINT_TITLE)?;
                self.listeners.add(
                    header,
                    EventKind::Click,
                    Behavior::SortColumn {
                        table: table_idx,
                        column,
                    },
                );
            }
            self.tables
                .push(sortable.with_policy(self.config.direction_policy));
        }
        Ok(())
    }

    fn bind_form_gate(&mut self) -> Result<()> {
        let Some(form) = self.dom.query_selector(&self.config.form_selector)? else {
            return Ok(());
        };
        let idx = self.gates.len();
        self.gates.push(FormGate::new(form));
        self.listeners
            .add(form, EventKind::Submit, Behavior::GateSubmit(idx));
        Ok(())
    }

    fn bind_widgets(&mut self) -> Result<()> {
        let tooltips = widgets::discover(
            &self.dom,
            &self.config.tooltip_selector,
            WidgetKind::Tooltip,
        )?;
        let popovers = widgets::discover(
            &self.dom,
            &self.config.popover_selector,
            WidgetKind::Popover,
        )?;
        for widget in tooltips.into_iter().chain(popovers) {
            let label = self.trace_node_label(widget.node);
            self.trace_line(format!("[widget] init {} target={label}", widget.kind));
            self.widgets.push(widget);
        }
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn config(&self) -> &EnhancerConfig {
        &self.config
    }

    pub fn collator(&self) -> &Collator {
        &self.collator
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn field_pairs(&self) -> &[FieldPair] {
        &self.field_pairs
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_logs)
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Config(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_log_limit = max_entries;
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
        Ok(())
    }

    /// Sets the value of an input, textarea or select the way typing or
    /// picking does, then delivers `input`. No `change` is delivered; call
    /// [`Page::change`] to commit.
    pub fn set_value(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }

        match self.tag_of(selector, target, "input, textarea or select")?.as_str() {
            "input" | "textarea" => self.dom.set_value(target, value)?,
            "select" => self.dom.set_select_value(target, value)?,
            other => {
                return Err(Error::TypeMismatch {
                    selector: selector.to_string(),
                    expected: "input, textarea or select".into(),
                    actual: other.to_string(),
                });
            }
        }
        self.dispatch_event(target, EventKind::Input)?;
        Ok(())
    }

    /// Delivers `change` to the element, as when it loses focus after an
    /// edit.
    pub fn change(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, EventKind::Change)?;
        Ok(())
    }

    /// Picks the option whose value is `value`, then delivers `input` and
    /// `change`.
    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let tag = self.tag_of(selector, target, "select")?;
        if tag != "select" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "select".into(),
                actual: tag,
            });
        }
        let known = self
            .dom
            .select_options(target)
            .into_iter()
            .any(|option| self.dom.option_value(option) == value);
        if !known {
            return Err(Error::SelectorNotFound(format!(
                "{selector} option[value=\"{value}\"]"
            )));
        }

        self.dom.set_select_value(target, value)?;
        self.dispatch_event(target, EventKind::Input)?;
        self.dispatch_event(target, EventKind::Change)?;
        Ok(())
    }

    /// Replaces the selection of a file input, then delivers `input` and
    /// `change`. An empty slice clears the selection.
    pub fn select_files(&mut self, selector: &str, files: &[&str]) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let is_file_input = self.dom.tag_name(target) == Some("input")
            && self
                .dom
                .attr(target, "type")
                .is_some_and(|kind| kind.eq_ignore_ascii_case("file"));
        if !is_file_input {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input[type=file]".into(),
                actual: self.dom.tag_name(target).unwrap_or("non-element").into(),
            });
        }

        self.dom
            .set_files(target, files.iter().map(|name| name.to_string()).collect())?;
        self.dispatch_event(target, EventKind::Input)?;
        self.dispatch_event(target, EventKind::Change)?;
        Ok(())
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }

        let outcome = self.dispatch_event(target, EventKind::Click)?;
        if outcome.default_prevented {
            return Ok(());
        }

        if self.is_submit_control(target) {
            if let Some(form) = self.form_owner(target)? {
                self.dispatch_event(form, EventKind::Submit)?;
            }
        }
        Ok(())
    }

    /// Submits the form at `selector`, or the form that owns the control at
    /// `selector`.
    pub fn submit(&mut self, selector: &str) -> Result<SubmitOutcome> {
        let target = self.select_one(selector)?;
        let Some(form) = self.form_owner(target)? else {
            return Ok(SubmitOutcome::NoForm);
        };
        let event = self.dispatch_event(form, EventKind::Submit)?;
        Ok(if event.default_prevented {
            SubmitOutcome::Blocked
        } else {
            SubmitOutcome::Submitted
        })
    }

    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let kind = EventKind::parse(event).ok_or_else(|| Error::TypeMismatch {
            selector: selector.to_string(),
            expected: "input, change, click or submit".into(),
            actual: event.to_string(),
        })?;
        self.dispatch_event(target, kind)?;
        Ok(())
    }

    /// Sorts a table directly, as if header `column` had been activated.
    /// Tables outside the sortable selector are picked up on first use.
    pub fn sort_table(&mut self, selector: &str, column: usize) -> Result<SortDirection> {
        let idx = self.table_index(selector)?;
        self.tables[idx].sort(&mut self.dom, column, &self.collator)
    }

    /// Direction of the last sort applied to the table, if any.
    pub fn sort_direction(&self, selector: &str) -> Result<Option<SortDirection>> {
        let table = self.select_one(selector)?;
        Ok(self
            .tables
            .iter()
            .find(|sortable| sortable.table == table)
            .and_then(SortableTable::direction))
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn custom_validity(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.custom_validity_message(target)
    }

    /// Inline `display` of the element, `None` when unset.
    pub fn display(&self, selector: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.style_property(target, "display"))
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dom.class_contains(target, class_name))
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.attr(target, name))
    }

    /// Trimmed text of `column` for every body row, top to bottom.
    pub fn column_texts(&self, selector: &str, column: usize) -> Result<Vec<String>> {
        let table = self.select_one(selector)?;
        let Some(sortable) = SortableTable::discover(&self.dom, table)? else {
            return Ok(Vec::new());
        };
        Ok(sortable
            .rows(&self.dom)
            .iter()
            .map(|row| row.cell(column).to_string())
            .collect())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        self.check_assertion(selector, target, expected, actual)
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        self.check_assertion(selector, target, expected, actual)
    }

    /// Asserts the custom-validity message; `""` asserts the field is valid.
    pub fn assert_validity(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.custom_validity_message(target)?;
        self.check_assertion(selector, target, expected, actual)
    }

    /// Asserts the inline `display`; `""` asserts it is unset.
    pub fn assert_display(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self
            .dom
            .style_property(target, "display")
            .unwrap_or_default();
        self.check_assertion(selector, target, expected, actual)
    }

    fn check_assertion(
        &self,
        selector: &str,
        target: NodeId,
        expected: &str,
        actual: String,
    ) -> Result<()> {
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    fn dispatch_event(&mut self, target: NodeId, kind: EventKind) -> Result<EventState> {
        let mut event = EventState::new(kind, target);

        let mut cursor = Some(target);
        while let Some(node) = cursor {
            event.current_target = node;
            for behavior in self.listeners.get(node, kind) {
                if self.trace {
                    let target_label = self.trace_node_label(event.target);
                    let current_label = self.trace_node_label(event.current_target);
                    self.trace_line(format!(
                        "[event] {kind} target={target_label} current={current_label} behavior={behavior:?}"
                    ));
                }
                self.run_behavior(behavior, &mut event)?;
            }
            if event.propagation_stopped {
                self.trace_event_done(&event, "propagation_stopped");
                return Ok(event);
            }
            cursor = self.dom.parent(node);
        }

        self.trace_event_done(&event, "completed");
        Ok(event)
    }

    fn run_behavior(&mut self, behavior: Behavior, event: &mut EventState) -> Result<()> {
        trace!(?behavior, event = %event.kind, "running behavior");
        match behavior {
            Behavior::ValidatePair(idx) => {
                if let Some(pair) = self.field_pairs.get(idx) {
                    pair.validate(&mut self.dom)?;
                }
            }
            Behavior::SortColumn { table, column } => {
                if let Some(sortable) = self.tables.get_mut(table) {
                    let direction = sortable.sort(&mut self.dom, column, &self.collator)?;
                    self.trace_line(format!(
                        "[sort] column={column} direction={}",
                        direction.as_attr()
                    ));
                }
            }
            Behavior::ToggleVisibility(idx) => {
                if let Some(rule) = self.visibility_rules.get(idx) {
                    rule.apply(&mut self.dom)?;
                }
            }
            Behavior::UpdateFileLabel(idx) => {
                if let Some(file_label) = self.file_labels.get(idx) {
                    file_label.update(&mut self.dom)?;
                }
            }
            Behavior::GateSubmit(idx) => {
                if let Some(gate) = self.gates.get(idx) {
                    gate.on_submit(&mut self.dom, event)?;
                }
            }
        }
        Ok(())
    }

    fn table_index(&mut self, selector: &str) -> Result<usize> {
        let table = self.select_one(selector)?;
        if let Some(idx) = self.tables.iter().position(|sortable| sortable.table == table) {
            return Ok(idx);
        }
        let sortable = SortableTable::discover(&self.dom, table)?
            .ok_or_else(|| Error::SelectorNotFound(format!("{selector} tbody")))?;
        self.tables
            .push(sortable.with_policy(self.config.direction_policy));
        Ok(self.tables.len() - 1)
    }

    fn tag_of(&self, selector: &str, target: NodeId, expected: &str) -> Result<String> {
        self.dom
            .tag_name(target)
            .map(|tag| tag.to_ascii_lowercase())
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: expected.into(),
                actual: "non-element".into(),
            })
    }

    fn is_submit_control(&self, node: NodeId) -> bool {
        let kind = self
            .dom
            .attr(node, "type")
            .map(|kind| kind.to_ascii_lowercase());
        match self.dom.tag_name(node) {
            Some("button") => kind.is_none_or(|kind| kind == "submit"),
            Some("input") => matches!(kind.as_deref(), Some("submit") | Some("image")),
            _ => false,
        }
    }

    fn form_owner(&self, node: NodeId) -> Result<Option<NodeId>> {
        self.dom.closest(node, "form")
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    fn trace_node_label(&self, node: NodeId) -> String {
        if let Some(id) = self.dom.attr(node, "id") {
            if !id.is_empty() {
                return format!("#{id}");
            }
        }
        self.dom
            .tag_name(node)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("node-{}", node.0))
    }

    fn trace_event_done(&mut self, event: &EventState, outcome: &str) {
        if !self.trace {
            return;
        }
        let target_label = self.trace_node_label(event.target);
        let current_label = self.trace_node_label(event.current_target);
        self.trace_line(format!(
            "[event] done {} target={} current={} outcome={} default_prevented={} propagation_stopped={}",
            event.kind,
            target_label,
            current_label,
            outcome,
            event.default_prevented,
            event.propagation_stopped
        ));
    }

    fn trace_line(&mut self, line: String) {
        if self.trace {
            if self.trace_logs.len() >= self.trace_log_limit {
                self.trace_logs.remove(0);
            }
            self.trace_logs.push(line);
        }
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}
