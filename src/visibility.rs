use tracing::trace;

use crate::config::VisibilityConfig;
use crate::dom::{Dom, NodeId};
use crate::Result;

/// Algorithms that take a time quantum.
pub const QUANTUM_ALGORITHMS: [&str; 3] = ["rr", "priority_rr", "all"];

/// Shows `group` while `control`'s value is one of `allowed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityRule {
    pub control: NodeId,
    pub group: NodeId,
    pub allowed: Vec<String>,
}

impl VisibilityRule {
    pub fn new(control: NodeId, group: NodeId, allowed: Vec<String>) -> Self {
        Self {
            control,
            group,
            allowed,
        }
    }

    /// Builds the rule from ids. The toggled element is the parent of the
    /// field's closest group; `None` when any piece is missing.
    pub fn resolve(dom: &Dom, config: &VisibilityConfig) -> Result<Option<Self>> {
        let (Some(control), Some(field)) = (dom.by_id(&config.control_id), dom.by_id(&config.field_id))
        else {
            return Ok(None);
        };
        let Some(group) = dom.closest(field, &config.group_selector)? else {
            return Ok(None);
        };
        let Some(container) = dom.parent_element(group) else {
            return Ok(None);
        };
        Ok(Some(Self::new(control, container, config.allowed_values.clone())))
    }

    pub fn is_satisfied(&self, dom: &Dom) -> Result<bool> {
        let value = dom.value(self.control)?;
        Ok(self.allowed.iter().any(|allowed| *allowed == value))
    }

    /// Writes `display: block` or `display: none` on the group and returns
    /// whether it is shown.
    pub fn apply(&self, dom: &mut Dom) -> Result<bool> {
        let shown = self.is_satisfied(dom)?;
        let shown_display = if shown { "block" } else { "none" };
        dom.set_style_property(self.group, "display", shown_display)?;
        trace!(group = ?self.group, display = shown_display, "applied visibility rule");
        Ok(shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;
    use crate::Error;

    const FORM: &str = r#"
        <form>
          <select id="algorithm">
            <option value="fcfs">FCFS</option>
            <option value="rr" selected>Round Robin</option>
            <option value="priority_rr">Priority RR</option>
            <option value="all">All</option>
          </select>
          <div class="row" id="quantum-row">
            <div class="col form-group">
              <input id="quantum" type="number" value="2">
            </div>
          </div>
        </form>
    "#;

    #[test]
    fn resolves_the_parent_of_the_closest_group() -> Result<()> {
        let dom = parse_html(FORM)?;
        let rule = VisibilityRule::resolve(&dom, &VisibilityConfig::default())?
            .ok_or_else(|| Error::SelectorNotFound("quantum group".into()))?;
        assert_eq!(Some(rule.group), dom.by_id("quantum-row"));
        Ok(())
    }

    #[test]
    fn display_follows_the_selected_algorithm() -> Result<()> {
        let mut dom = parse_html(FORM)?;
        let rule = VisibilityRule::resolve(&dom, &VisibilityConfig::default())?
            .ok_or_else(|| Error::SelectorNotFound("quantum group".into()))?;

        for (value, shown) in [("rr", true), ("fcfs", false), ("priority_rr", true), ("all", true)] {
            dom.set_select_value(rule.control, value)?;
            assert_eq!(rule.apply(&mut dom)?, shown, "{value}");
            let expected = if shown { "block" } else { "none" };
            assert_eq!(
                dom.style_property(rule.group, "display").as_deref(),
                Some(expected)
            );
        }
        Ok(())
    }

    #[test]
    fn missing_group_skips_the_rule() -> Result<()> {
        let dom = parse_html(r#"<select id="algorithm"></select><input id="quantum">"#)?;
        assert_eq!(VisibilityRule::resolve(&dom, &VisibilityConfig::default())?, None);
        Ok(())
    }
}
