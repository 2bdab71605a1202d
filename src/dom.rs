use std::collections::{HashMap, HashSet};

use crate::html::is_void_tag;
use crate::selector::{
    SelectorAttrCondition, SelectorCombinator, SelectorPart, SelectorStep, parse_selector_groups,
};
use crate::{Error, Result};

/// Handle to a node in a [`Dom`] arena. Handles stay valid for the lifetime
/// of the tree; nodes are moved between parents, never freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) files: Vec<String>,
    pub(crate) disabled: bool,
    pub(crate) required: bool,
    pub(crate) custom_validity_message: String,
}

/// The rendered page as an arena of nodes.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
    root: NodeId,
    id_index: HashMap<String, Vec<NodeId>>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let disabled = attrs.contains_key("disabled");
        let required = attrs.contains_key("required");
        let element = Element {
            tag_name,
            attrs,
            value,
            files: Vec::new(),
            disabled,
            required,
            custom_validity_message: String::new(),
        };
        let id = self.create_node(Some(parent), NodeType::Element(element));
        if let Some(id_attr) = self
            .element(id)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            self.id_index.entry(id_attr).or_default().push(id);
        }
        id
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_or_err(&self, node_id: NodeId, what: &str) -> Result<&Element> {
        self.element(node_id)
            .ok_or_else(|| Error::NotAnElement(format!("{what} target {node_id:?}")))
    }

    fn element_mut_or_err(&mut self, node_id: NodeId, what: &str) -> Result<&mut Element> {
        self.element_mut(node_id)
            .ok_or_else(|| Error::NotAnElement(format!("{what} target {node_id:?}")))
    }

    pub fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0)?.parent
    }

    pub fn parent_element(&self, node_id: NodeId) -> Option<NodeId> {
        self.parent(node_id).filter(|parent| self.element(*parent).is_some())
    }

    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    pub fn element_children(&self, node_id: NodeId) -> Vec<NodeId> {
        self.children(node_id)
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
            .collect()
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).and_then(|ids| ids.first().copied())
    }

    pub fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|element| element.attrs.get(name).cloned())
    }

    pub fn has_attr(&self, node_id: NodeId, name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|element| element.attrs.contains_key(name))
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "setAttribute")?;
        element.attrs.insert(name.to_ascii_lowercase(), value.to_string());
        Ok(())
    }

    pub fn text_content(&self, node_id: NodeId) -> String {
        let Some(node) = self.nodes.get(node_id.0) else {
            return String::new();
        };
        match &node.node_type {
            NodeType::Document | NodeType::Element(_) => {
                let mut out = String::new();
                for child in &node.children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
        }
    }

    pub(crate) fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        self.element_or_err(node_id, "textContent")?;
        let children = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        if !value.is_empty() {
            self.create_text(node_id, value.to_string());
        }
        Ok(())
    }

    pub fn value(&self, node_id: NodeId) -> Result<String> {
        Ok(self.element_or_err(node_id, "value")?.value.clone())
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "value")?;
        element.value = value.to_string();
        Ok(())
    }

    pub fn files(&self, node_id: NodeId) -> Result<&[String]> {
        Ok(self.element_or_err(node_id, "files")?.files.as_slice())
    }

    pub(crate) fn set_files(&mut self, node_id: NodeId, files: Vec<String>) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "files")?;
        element.value = files.first().cloned().unwrap_or_default();
        element.files = files;
        Ok(())
    }

    pub fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|element| element.disabled)
    }

    pub fn required(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|element| element.required)
    }

    pub fn custom_validity_message(&self, node_id: NodeId) -> Result<String> {
        Ok(self
            .element_or_err(node_id, "validationMessage")?
            .custom_validity_message
            .clone())
    }

    pub(crate) fn set_custom_validity_message(
        &mut self,
        node_id: NodeId,
        message: &str,
    ) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "setCustomValidity")?;
        element.custom_validity_message = message.to_string();
        Ok(())
    }

    pub fn class_contains(&self, node_id: NodeId, class_name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|element| has_class(element, class_name))
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "classList")?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        set_class_attr(element, &classes);
        Ok(())
    }

    pub fn style_property(&self, node_id: NodeId, prop: &str) -> Option<String> {
        let element = self.element(node_id)?;
        parse_style_declarations(element.attrs.get("style").map(String::as_str))
            .into_iter()
            .find(|(name, _)| name == prop)
            .map(|(_, value)| value)
    }

    pub(crate) fn set_style_property(
        &mut self,
        node_id: NodeId,
        prop: &str,
        value: &str,
    ) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "style")?;
        let mut decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        let prop = prop.to_ascii_lowercase();
        if let Some(pos) = decls.iter().position(|(name, _)| name == &prop) {
            if value.is_empty() {
                decls.remove(pos);
            } else {
                decls[pos].1 = value.to_string();
            }
        } else if !value.is_empty() {
            decls.push((prop, value.to_string()));
        }

        if decls.is_empty() {
            element.attrs.remove("style");
        } else {
            element
                .attrs
                .insert("style".to_string(), serialize_style_declarations(&decls));
        }
        Ok(())
    }

    /// Detaches `child` from its current parent, if any.
    pub(crate) fn remove_node(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        self.nodes[parent.0].children.retain(|id| *id != child);
        self.nodes[child.0].parent = None;
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(Error::HierarchyRequest(format!(
                "cannot append {child:?} under {parent:?}"
            )));
        }
        self.remove_node(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    pub(crate) fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<()> {
        self.remove_node(child);
        let Some(pos) = self.nodes[parent.0]
            .children
            .iter()
            .position(|id| *id == reference)
        else {
            return self.append_child(parent, child);
        };
        self.nodes[parent.0].children.insert(pos, child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    pub fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(node_id) {
            if self.element(*child).is_some() {
                out.push(*child);
            }
            self.collect_elements_dfs(*child, out);
        }
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        self.query_selector_from(self.root, selector)
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;

        if groups.len() == 1 && groups[0].len() == 1 {
            if let Some(id) = groups[0][0].step.id_only() {
                return Ok(self.id_index.get(id).cloned().unwrap_or_default());
            }
        }

        Ok(self.match_groups_under(self.root, &groups))
    }

    pub fn query_selector_from(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all_from(root, selector)?.into_iter().next())
    }

    pub fn query_selector_all_from(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        Ok(self.match_groups_under(root, &groups))
    }

    fn match_groups_under(&self, root: NodeId, groups: &[Vec<SelectorPart>]) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_elements_dfs(root, &mut ids);

        let mut seen = HashSet::new();
        ids.into_iter()
            .filter(|candidate| {
                groups
                    .iter()
                    .any(|steps| self.matches_selector_chain(*candidate, steps))
                    && seen.insert(*candidate)
            })
            .collect()
    }

    pub fn matches_selector(&self, node_id: NodeId, selector: &str) -> Result<bool> {
        if self.element(node_id).is_none() {
            return Ok(false);
        }
        let groups = parse_selector_groups(selector)?;
        Ok(groups
            .iter()
            .any(|steps| self.matches_selector_chain(node_id, steps)))
    }

    pub fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        if self.element(node_id).is_none() {
            return Ok(None);
        }

        let groups = parse_selector_groups(selector)?;
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if groups
                .iter()
                .any(|steps| self.matches_selector_chain(current, steps))
            {
                return Ok(Some(current));
            }
            cursor = self.parent_element(current);
        }
        Ok(None)
    }

    fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        if let Some(tag) = &step.tag {
            if !element.tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &step.id {
            if element.attrs.get("id") != Some(id) {
                return false;
            }
        }

        if step
            .classes
            .iter()
            .any(|class_name| !has_class(element, class_name))
        {
            return false;
        }

        step.attrs.iter().all(|cond| match cond {
            SelectorAttrCondition::Exists { key } => element.attrs.contains_key(key),
            SelectorAttrCondition::Eq { key, value } => element.attrs.get(key) == Some(value),
            SelectorAttrCondition::Includes { key, value } => element
                .attrs
                .get(key)
                .is_some_and(|attr| attr.split_whitespace().any(|token| token == value)),
        })
    }

    fn matches_selector_chain(&self, node_id: NodeId, steps: &[SelectorPart]) -> bool {
        let Some(last) = steps.last() else {
            return false;
        };
        if !self.matches_step(node_id, &last.step) {
            return false;
        }

        let mut current = node_id;
        for idx in (1..steps.len()).rev() {
            let prev_step = &steps[idx - 1].step;
            let combinator = steps[idx]
                .combinator
                .unwrap_or(SelectorCombinator::Descendant);

            let matched = match combinator {
                SelectorCombinator::Child => self
                    .parent(current)
                    .filter(|parent| self.matches_step(*parent, prev_step)),
                SelectorCombinator::Descendant => {
                    let mut cursor = self.parent(current);
                    let mut found = None;
                    while let Some(parent) = cursor {
                        if self.matches_step(parent, prev_step) {
                            found = Some(parent);
                            break;
                        }
                        cursor = self.parent(parent);
                    }
                    found
                }
            };

            let Some(matched) = matched else {
                return false;
            };
            current = matched;
        }

        true
    }

    /// Controls owned by `form`, in tree order.
    pub fn form_controls(&self, form: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_elements_dfs(form, &mut ids);
        ids.into_iter()
            .filter(|id| {
                self.tag_name(*id).is_some_and(|tag| {
                    matches!(
                        tag.to_ascii_lowercase().as_str(),
                        "input" | "select" | "textarea" | "button"
                    )
                })
            })
            .collect()
    }

    /// Effective value of a `<select>`: the selected option, else the first one.
    pub(crate) fn initialize_select_values(&mut self) {
        let mut selects = Vec::new();
        self.collect_elements_dfs(self.root, &mut selects);
        selects.retain(|id| {
            self.tag_name(*id)
                .is_some_and(|tag| tag.eq_ignore_ascii_case("select"))
        });

        for select in selects {
            let options = self.select_options(select);
            let chosen = options
                .iter()
                .find(|option| self.has_attr(**option, "selected"))
                .or_else(|| options.first())
                .map(|option| self.option_value(*option))
                .unwrap_or_default();
            if let Some(element) = self.element_mut(select) {
                element.value = chosen;
            }
        }
    }

    pub(crate) fn select_options(&self, select: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_elements_dfs(select, &mut ids);
        ids.retain(|id| {
            self.tag_name(*id)
                .is_some_and(|tag| tag.eq_ignore_ascii_case("option"))
        });
        ids
    }

    pub(crate) fn option_value(&self, option: NodeId) -> String {
        self.attr(option, "value")
            .unwrap_or_else(|| self.text_content(option).trim().to_string())
    }

    pub(crate) fn set_select_value(&mut self, select: NodeId, requested: &str) -> Result<()> {
        let options = self.select_options(select);
        let matched = options
            .iter()
            .copied()
            .find(|option| self.option_value(*option) == requested);
        for option in &options {
            if let Some(element) = self.element_mut(*option) {
                if Some(*option) == matched {
                    element.attrs.insert("selected".into(), "true".into());
                } else {
                    element.attrs.remove("selected");
                }
            }
        }
        let value = if matched.is_some() {
            requested.to_string()
        } else {
            String::new()
        };
        self.set_value(select, &value)
    }

    /// Wraps `<tr>` children placed directly under `<table>` into a `<tbody>`.
    pub(crate) fn normalize_implied_table_bodies(&mut self) -> Result<()> {
        let mut tables = Vec::new();
        self.collect_elements_dfs(self.root, &mut tables);
        tables.retain(|id| {
            self.tag_name(*id)
                .is_some_and(|tag| tag.eq_ignore_ascii_case("table"))
        });

        for table in tables {
            let direct_rows = self
                .element_children(table)
                .into_iter()
                .filter(|child| {
                    self.tag_name(*child)
                        .is_some_and(|tag| tag.eq_ignore_ascii_case("tr"))
                })
                .collect::<Vec<_>>();
            let Some(first_row) = direct_rows.first().copied() else {
                continue;
            };

            let body = self.create_node(
                None,
                NodeType::Element(Element {
                    tag_name: "tbody".to_string(),
                    attrs: HashMap::new(),
                    value: String::new(),
                    files: Vec::new(),
                    disabled: false,
                    required: false,
                    custom_validity_message: String::new(),
                }),
            );
            self.insert_before(table, body, first_row)?;
            for row in direct_rows {
                self.append_child(body, row)?;
            }
        }
        Ok(())
    }

    pub fn dump_node(&self, node_id: NodeId) -> String {
        let Some(node) = self.nodes.get(node_id.0) else {
            return String::new();
        };
        match &node.node_type {
            NodeType::Document => node
                .children
                .iter()
                .map(|child| self.dump_node(*child))
                .collect(),
            NodeType::Text(text) => escape_html_text_for_serialization(text),
            NodeType::Element(element) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag_name);
                let mut attrs = element.attrs.iter().collect::<Vec<_>>();
                attrs.sort_by(|(left, _), (right, _)| left.cmp(right));
                for (k, v) in attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&escape_html_attr_for_serialization(v));
                    out.push('"');
                }
                out.push('>');
                if is_void_tag(&element.tag_name) {
                    return out;
                }
                for child in &node.children {
                    out.push_str(&self.dump_node(*child));
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
                out
            }
        }
    }
}

fn has_class(element: &Element, class_name: &str) -> bool {
    element
        .attrs
        .get("class")
        .map(|classes| classes.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in class_attr.unwrap_or_default().split_whitespace() {
        if !out.iter().any(|existing| existing == token) {
            out.push(token.to_string());
        }
    }
    out
}

fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.remove("class");
    } else {
        element.attrs.insert("class".to_string(), classes.join(" "));
    }
}

fn parse_style_declarations(style_attr: Option<&str>) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    let Some(style_attr) = style_attr else {
        return out;
    };

    for decl in style_attr.split(';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        let Some((name, value)) = decl.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            continue;
        }
        let value = value.trim().to_string();
        if let Some(pos) = out.iter().position(|(existing, _)| existing == &name) {
            out[pos].1 = value;
        } else {
            out.push((name, value));
        }
    }

    out
}

fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    let mut out = String::new();
    for (idx, (name, value)) in decls.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}

fn escape_html_text_for_serialization(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_html_attr_for_serialization(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
