use super::*;

#[test]
fn min_above_max_marks_the_maximum_on_change() -> Result<()> {
    let mut page = bound_simulator_page()?;

    page.set_value("#min_burst", "12")?;
    page.assert_validity("#max_burst", "")?;

    page.change("#min_burst")?;
    page.assert_validity("#max_burst", RANGE_MESSAGE)?;
    page.assert_validity("#min_burst", "")?;
    page.assert_value("#min_burst", "12")?;
    page.assert_value("#max_burst", "10")?;
    Ok(())
}

#[test]
fn raising_the_maximum_clears_the_mark() -> Result<()> {
    let mut page = bound_simulator_page()?;
    page.set_value("#min_burst", "12")?;
    page.change("#min_burst")?;

    page.set_value("#max_burst", "12")?;
    page.change("#max_burst")?;
    page.assert_validity("#max_burst", "")?;
    Ok(())
}

#[test]
fn incomplete_input_clears_the_mark() -> Result<()> {
    let mut page = bound_simulator_page()?;
    page.set_value("#min_burst", "12")?;
    page.change("#min_burst")?;

    page.set_value("#max_burst", "")?;
    page.change("#max_burst")?;
    page.assert_validity("#max_burst", "")?;

    page.set_value("#max_burst", "abc")?;
    page.change("#max_burst")?;
    page.assert_validity("#max_burst", "")?;
    Ok(())
}

#[test]
fn pairs_are_checked_independently() -> Result<()> {
    let mut page = bound_simulator_page()?;

    page.set_value("#min_arrival", "9")?;
    page.change("#min_arrival")?;
    page.set_value("#min_priority", "-2")?;
    page.change("#min_priority")?;

    page.assert_validity("#max_arrival", RANGE_MESSAGE)?;
    page.assert_validity("#max_burst", "")?;
    page.assert_validity("#max_priority", "")?;
    Ok(())
}

#[test]
fn submit_is_blocked_while_a_pair_is_invalid() -> Result<()> {
    let mut page = bound_simulator_page()?;
    page.set_value("#min_burst", "99")?;
    page.change("#min_burst")?;

    assert_eq!(page.submit("#sim")?, SubmitOutcome::Blocked);
    assert!(page.has_class("#sim", WAS_VALIDATED_CLASS)?);
    Ok(())
}

#[test]
fn valid_form_submits_and_is_still_marked() -> Result<()> {
    let mut page = bound_simulator_page()?;

    let outcome = page.submit("#sim")?;
    assert!(outcome.proceeds());
    assert!(page.has_class("#sim", WAS_VALIDATED_CLASS)?);
    Ok(())
}

#[test]
fn submit_button_click_runs_the_gate() -> Result<()> {
    let mut page = bound_simulator_page()?;
    assert!(!page.has_class("#sim", WAS_VALIDATED_CLASS)?);

    page.click("#run")?;
    assert!(page.has_class("#sim", WAS_VALIDATED_CLASS)?);
    Ok(())
}

#[test]
fn submit_from_a_control_resolves_its_form() -> Result<()> {
    let mut page = bound_simulator_page()?;
    assert_eq!(page.submit("#quantum")?, SubmitOutcome::Submitted);
    assert_eq!(page.submit("#results")?, SubmitOutcome::NoForm);
    Ok(())
}

#[test]
fn required_fields_gate_submission() -> Result<()> {
    let mut page = Page::from_html(
        r#"
        <form id="upload">
          <input type="file" id="process_file" required>
          <label class="custom-file-label">Choose file...</label>
          <button type="submit">Upload</button>
        </form>
        "#,
    )?;
    page.bind()?;

    assert_eq!(page.submit("#upload")?, SubmitOutcome::Blocked);
    page.select_files("#process_file", &["procs.csv"])?;
    assert_eq!(page.submit("#upload")?, SubmitOutcome::Submitted);
    Ok(())
}

#[test]
fn quantum_below_its_minimum_blocks_submission() -> Result<()> {
    let mut page = bound_simulator_page()?;

    page.set_value("#quantum", "0")?;
    assert_eq!(page.submit("#sim")?, SubmitOutcome::Blocked);
    assert!(page.has_class("#sim", WAS_VALIDATED_CLASS)?);

    page.set_value("#quantum", "1")?;
    assert_eq!(page.submit("#sim")?, SubmitOutcome::Submitted);
    Ok(())
}
