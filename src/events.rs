use std::collections::HashMap;
use std::fmt;

use crate::dom::NodeId;

/// Notifications the host delivers to bound behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Input,
    Change,
    Click,
    Submit,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Change => "change",
            Self::Click => "click",
            Self::Submit => "submit",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "input" => Some(Self::Input),
            "change" => Some(Self::Change),
            "click" => Some(Self::Click),
            "submit" => Some(Self::Submit),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a listener does when it fires. Indexes point into the behavior
/// tables owned by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Behavior {
    ValidatePair(usize),
    SortColumn { table: usize, column: usize },
    ToggleVisibility(usize),
    UpdateFileLabel(usize),
    GateSubmit(usize),
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<EventKind, Vec<Behavior>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: EventKind, behavior: Behavior) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event)
            .or_default()
            .push(behavior);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: EventKind) -> Vec<Behavior> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(&event))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.map
            .values()
            .flat_map(|events| events.values())
            .map(Vec::len)
            .sum()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) kind: EventKind,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
}

impl EventState {
    pub(crate) fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub(crate) fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub(crate) fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}
