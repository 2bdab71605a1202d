use tracing::{debug, trace};

use crate::dom::{Dom, NodeId};
use crate::events::EventState;
use crate::numeric::{parse_float_prefix, parse_int_prefix};
use crate::Result;

pub const RANGE_MESSAGE: &str = "Maximum value must be greater than or equal to minimum value";
pub const WAS_VALIDATED_CLASS: &str = "was-validated";

/// Two numeric inputs under a `min <= max` rule. A violation is reported
/// through the custom-validity message of the maximum field; values are
/// never rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPair {
    pub min: NodeId,
    pub max: NodeId,
}

impl FieldPair {
    pub fn new(min: NodeId, max: NodeId) -> Self {
        Self { min, max }
    }

    /// Re-checks the pair and returns whether the maximum field is now
    /// flagged invalid.
    pub fn validate(&self, dom: &mut Dom) -> Result<bool> {
        let min_val = parse_int_prefix(&dom.value(self.min)?);
        let max_val = parse_int_prefix(&dom.value(self.max)?);

        // NaN on either side compares false, so incomplete input clears the flag.
        let violated = min_val > max_val;
        let message = if violated { RANGE_MESSAGE } else { "" };
        dom.set_custom_validity_message(self.max, message)?;
        trace!(min = ?self.min, max = ?self.max, min_val, max_val, violated, "validated field pair");
        Ok(violated)
    }
}

/// Blocks submission of a form while any of its controls fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormGate {
    pub form: NodeId,
}

impl FormGate {
    pub fn new(form: NodeId) -> Self {
        Self { form }
    }

    pub fn check_validity(&self, dom: &Dom) -> bool {
        dom.form_controls(self.form)
            .into_iter()
            .all(|control| control_is_valid(dom, control))
    }

    pub(crate) fn on_submit(&self, dom: &mut Dom, event: &mut EventState) -> Result<()> {
        if !self.check_validity(dom) {
            debug!(form = ?self.form, "blocking submit of invalid form");
            event.prevent_default();
            event.stop_propagation();
        }
        dom.class_add(self.form, WAS_VALIDATED_CLASS)
    }
}

pub(crate) fn control_is_valid(dom: &Dom, control: NodeId) -> bool {
    if dom.disabled(control) {
        return true;
    }
    let Some(element) = dom.element(control) else {
        return true;
    };
    if !element.custom_validity_message.is_empty() {
        return false;
    }

    let kind = element
        .attrs
        .get("type")
        .map(|kind| kind.to_ascii_lowercase())
        .unwrap_or_else(|| "text".into());
    if element.tag_name.eq_ignore_ascii_case("input")
        && kind == "number"
        && !element.value.is_empty()
    {
        let value = parse_float_prefix(&element.value);
        let limit = |name: &str| {
            element
                .attrs
                .get(name)
                .map(|raw| parse_float_prefix(raw))
                .filter(|limit| !limit.is_nan())
        };
        let range_underflow = limit("min").is_some_and(|min| value < min);
        let range_overflow = limit("max").is_some_and(|max| value > max);
        if range_underflow || range_overflow {
            trace!(?control, range_underflow, range_overflow, "number outside its limits");
            return false;
        }
    }

    if !element.required {
        return true;
    }
    if element.tag_name.eq_ignore_ascii_case("button")
        || matches!(
            kind.as_str(),
            "submit" | "reset" | "button" | "hidden" | "image"
        )
    {
        return true;
    }
    if kind == "file" {
        return !element.files.is_empty();
    }
    !element.value.is_empty()
}
