use std::path::Path;

use serde::Deserialize;

use crate::collation::{Collator, DEFAULT_LOCALE, Sensitivity};
use crate::selector::parse_selector_groups;
use crate::visibility::QUANTUM_ALGORITHMS;
use crate::{Error, Result};

/// How a [`SortableTable`](crate::SortableTable) picks the direction of the
/// next sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionPolicy {
    /// One direction per table, flipped on every activation.
    #[default]
    Global,
    /// Flip only when the same column is activated again.
    ResetOnColumnChange,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldPairConfig {
    pub min_id: String,
    pub max_id: String,
}

impl FieldPairConfig {
    pub fn new(min_id: &str, max_id: &str) -> Self {
        Self {
            min_id: min_id.to_string(),
            max_id: max_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Id of the `<select>` whose value drives the rule.
    pub control_id: String,
    /// Id of the dependent field; its group is resolved from here.
    pub field_id: String,
    /// Selector of the field's enclosing group. The element toggled is the
    /// parent of the closest match.
    pub group_selector: String,
    pub allowed_values: Vec<String>,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            control_id: "algorithm".into(),
            field_id: "quantum".into(),
            group_selector: ".form-group".into(),
            allowed_values: QUANTUM_ALGORITHMS.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Names every element [`Page::bind`](crate::Page::bind) discovers.
///
/// The defaults describe the simulator page, so most callers never build one
/// by hand. Any subset of fields can be overridden from TOML:
///
/// ```
/// use page_enhancer::{DirectionPolicy, EnhancerConfig};
///
/// let config = EnhancerConfig::from_toml_str(
///     r#"
///     direction_policy = "reset_on_column_change"
///     locale = "sv"
///     "#,
/// )?;
/// assert_eq!(config.direction_policy, DirectionPolicy::ResetOnColumnChange);
/// assert_eq!(config.field_pairs.len(), 3);
/// # Ok::<(), page_enhancer::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EnhancerConfig {
    pub form_selector: String,
    pub field_pairs: Vec<FieldPairConfig>,
    pub visibility: Vec<VisibilityConfig>,
    pub file_input_selector: String,
    pub file_label_selector: String,
    pub sortable_table_selector: String,
    pub no_sort_class: String,
    pub direction_policy: DirectionPolicy,
    pub locale: String,
    pub sensitivity: Sensitivity,
    pub tooltip_selector: String,
    pub popover_selector: String,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            form_selector: "form".into(),
            field_pairs: vec![
                FieldPairConfig::new("min_burst", "max_burst"),
                FieldPairConfig::new("min_arrival", "max_arrival"),
                FieldPairConfig::new("min_priority", "max_priority"),
            ],
            visibility: vec![VisibilityConfig::default()],
            file_input_selector: r#"input[type="file"]"#.into(),
            file_label_selector: ".custom-file-label".into(),
            sortable_table_selector: ".table.sortable".into(),
            no_sort_class: "no-sort".into(),
            direction_policy: DirectionPolicy::Global,
            locale: DEFAULT_LOCALE.into(),
            sensitivity: Sensitivity::Variant,
            tooltip_selector: r#"[data-toggle="tooltip"]"#.into(),
            popover_selector: r#"[data-toggle="popover"]"#.into(),
        }
    }
}

impl EnhancerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("failed to read {}: {err}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects selectors the engine cannot parse and empty identifiers, so
    /// that binding never has to.
    pub fn validate(&self) -> Result<()> {
        for (field, selector) in [
            ("form_selector", &self.form_selector),
            ("file_input_selector", &self.file_input_selector),
            ("file_label_selector", &self.file_label_selector),
            ("sortable_table_selector", &self.sortable_table_selector),
            ("tooltip_selector", &self.tooltip_selector),
            ("popover_selector", &self.popover_selector),
        ] {
            parse_selector_groups(selector)
                .map_err(|err| Error::Config(format!("{field}: {err}")))?;
        }

        for pair in &self.field_pairs {
            if pair.min_id.trim().is_empty() || pair.max_id.trim().is_empty() {
                return Err(Error::Config("field_pairs: ids must not be empty".into()));
            }
        }

        for rule in &self.visibility {
            if rule.control_id.trim().is_empty() || rule.field_id.trim().is_empty() {
                return Err(Error::Config("visibility: ids must not be empty".into()));
            }
            parse_selector_groups(&rule.group_selector)
                .map_err(|err| Error::Config(format!("visibility.group_selector: {err}")))?;
        }

        if self.no_sort_class.split_whitespace().count() != 1 {
            return Err(Error::Config(format!(
                "no_sort_class must be a single class name, got {:?}",
                self.no_sort_class
            )));
        }
        Ok(())
    }

    pub fn collator(&self) -> Collator {
        Collator::new(&self.locale).with_sensitivity(self.sensitivity)
    }
}
