use super::*;

#[test]
fn bind_attaches_every_behavior_of_the_simulator_page() -> Result<()> {
    let page = bound_simulator_page()?;

    assert!(page.is_bound());
    assert_eq!(page.field_pairs().len(), 3);
    // 3 pairs x 2 fields, quantum rule, file label, 3 sortable headers, form.
    assert_eq!(page.listener_count(), 12);
    assert_eq!(page.widgets().len(), 2);
    Ok(())
}

#[test]
fn nothing_reacts_before_bind() -> Result<()> {
    let mut page = Page::from_html(SIMULATOR_PAGE)?;
    page.set_value("#min_burst", "50")?;
    page.change("#min_burst")?;
    page.assert_validity("#max_burst", "")?;
    page.assert_display("#quantum-row", "")?;
    assert_eq!(page.listener_count(), 0);
    Ok(())
}

#[test]
fn second_bind_is_a_no_op() -> Result<()> {
    let mut page = bound_simulator_page()?;
    let listeners = page.listener_count();
    let widgets = page.widgets().len();

    page.enable_trace(true);
    page.bind()?;

    assert_eq!(page.listener_count(), listeners);
    assert_eq!(page.widgets().len(), widgets);
    assert_eq!(page.take_trace_logs(), vec!["[bind] skipped already_bound"]);
    Ok(())
}

#[test]
fn sortable_headers_are_decorated_except_no_sort() -> Result<()> {
    let page = bound_simulator_page()?;

    assert_eq!(
        page.attr("#results thead th", "title")?.as_deref(),
        Some("Click to sort")
    );
    assert_eq!(
        page.attr("#results thead th", "style")?.as_deref(),
        Some("cursor: pointer;")
    );
    assert_eq!(page.attr("#results th.no-sort", "title")?, None);
    assert_eq!(page.attr("#results th.no-sort", "style")?, None);
    assert_eq!(page.attr("#summary th", "title")?, None);
    Ok(())
}

#[test]
fn missing_elements_are_skipped() -> Result<()> {
    let mut page = Page::from_html(
        r#"<form><input id="min_burst" value="1"><input id="max_burst" value="2"></form>"#,
    )?;
    page.bind()?;

    assert_eq!(page.field_pairs().len(), 1);
    // One pair plus the submit gate.
    assert_eq!(page.listener_count(), 3);
    assert!(page.widgets().is_empty());
    Ok(())
}

#[test]
fn custom_config_drives_discovery() -> Result<()> {
    let config = EnhancerConfig::from_toml_str(
        r#"
        sortable_table_selector = "table.grid"
        no_sort_class = "fixed"
        direction_policy = "reset_on_column_change"
        locale = "sv"

        [[field_pairs]]
        min_id = "lo"
        max_id = "hi"
        "#,
    )?;
    let mut page = Page::from_html_with_config(
        r#"
        <input id="lo" value="9"><input id="hi" value="3">
        <table class="grid" id="g">
          <thead><tr><th class="fixed">#</th><th id="name-col">Name</th></tr></thead>
          <tbody><tr><td>1</td><td>b</td></tr><tr><td>2</td><td>a</td></tr></tbody>
        </table>
        "#,
        config,
    )?;
    page.bind()?;
    assert_eq!(page.config().direction_policy, DirectionPolicy::ResetOnColumnChange);
    assert_eq!(page.collator().locale(), "sv");

    page.change("#hi")?;
    page.assert_validity("#hi", RANGE_MESSAGE)?;

    page.click("#g th.fixed")?;
    assert_eq!(page.column_texts("#g", 1)?, vec!["b", "a"]);
    page.click("#name-col")?;
    assert_eq!(page.column_texts("#g", 1)?, vec!["a", "b"]);
    Ok(())
}

#[test]
fn invalid_config_is_rejected_before_parsing_the_page() {
    let config = EnhancerConfig {
        form_selector: "form >".into(),
        ..EnhancerConfig::default()
    };
    let err = Page::from_html_with_config("<form></form>", config).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn default_page_uses_default_config_and_collator() -> Result<()> {
    let page = bound_simulator_page()?;
    assert_eq!(page.config(), &EnhancerConfig::default());
    assert_eq!(page.collator().locale(), Collator::default().locale());
    Ok(())
}

#[test]
fn bound_controls_match_their_configured_selectors() -> Result<()> {
    let page = bound_simulator_page()?;
    let dom = page.dom();
    let quantum = dom
        .by_id("quantum")
        .ok_or_else(|| Error::SelectorNotFound("#quantum".into()))?;

    assert!(dom.matches_selector(quantum, "form#sim input[type=number]")?);
    assert!(dom.matches_selector(quantum, "select, .form-control")?);
    assert!(!dom.matches_selector(quantum, "table input")?);
    assert!(matches!(
        dom.matches_selector(quantum, "input:hover"),
        Err(Error::UnsupportedSelector(_))
    ));
    Ok(())
}
