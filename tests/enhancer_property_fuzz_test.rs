use std::cmp::Ordering;

use page_enhancer::{Collator, Page, RANGE_MESSAGE, SortDirection, compare_cells};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseError, TestCaseResult};

const ENHANCER_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/enhancer_property_fuzz_test.txt";
const DEFAULT_ENHANCER_PROPTEST_CASES: u32 = 64;

const PAIR_HTML: &str = r#"
<form id="sim">
  <input type="number" id="min_burst" value="1">
  <input type="number" id="max_burst" value="10">
</form>
"#;

fn enhancer_proptest_cases() -> u32 {
    std::env::var("PAGE_ENHANCER_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_ENHANCER_PROPTEST_CASES)
}

fn fail(err: page_enhancer::Error) -> TestCaseError {
    TestCaseError::fail(format!("{err:?}"))
}

fn word_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        Just("pear"),
        Just("Apple"),
        Just("apple"),
        Just("cherry"),
        Just("Banana"),
        Just("fig"),
        Just("x"),
        Just("P10"),
        Just("P2"),
        Just(""),
    ]
    .prop_map(str::to_string)
    .boxed()
}

fn number_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        any::<i16>().prop_map(|v| v.to_string()),
        (0u16..1000, 0u8..100).prop_map(|(whole, frac)| format!("{whole}.{frac}5")),
    ]
    .boxed()
}

fn mixed_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        word_strategy(),
        number_strategy(),
        Just("-".to_string()),
        Just("+a".to_string()),
        Just("+5".to_string()),
        Just("12 ms".to_string()),
    ]
    .boxed()
}

fn non_numeric_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        Just(""),
        Just("abc"),
        Just("-"),
        Just("+"),
        Just(".5"),
        Just("e3"),
        Just("  "),
    ]
    .prop_map(str::to_string)
    .boxed()
}

fn table_html(values: &[String]) -> String {
    let rows = values
        .iter()
        .enumerate()
        .map(|(idx, value)| format!("<tr id=\"row-{idx}\"><td>R{idx}</td><td>{value}</td></tr>"))
        .collect::<String>();
    format!(
        r#"<table class="table sortable" id="t">
             <thead><tr><th>Row</th><th id="value">Value</th></tr></thead>
             <tbody>{rows}</tbody>
           </table>"#
    )
}

fn bound_table(values: &[String]) -> Result<Page, TestCaseError> {
    let mut page = Page::from_html(&table_html(values)).map_err(fail)?;
    page.bind().map_err(fail)?;
    Ok(page)
}

fn rows_by_value(page: &Page) -> Result<Vec<(String, String)>, TestCaseError> {
    let labels = page.column_texts("#t", 0).map_err(fail)?;
    let values = page.column_texts("#t", 1).map_err(fail)?;
    Ok(labels.into_iter().zip(values).collect())
}

fn assert_sorted_then_reversed(values: &[String]) -> TestCaseResult {
    let collator = Collator::default();
    let mut page = bound_table(values)?;
    let mut before = rows_by_value(&page)?;

    page.click("#value").map_err(fail)?;
    let ascending = page.column_texts("#t", 1).map_err(fail)?;
    for pair in ascending.windows(2) {
        prop_assert_ne!(
            compare_cells(&pair[0], &pair[1], SortDirection::Ascending, &collator),
            Ordering::Greater,
            "out of order: {:?}",
            ascending
        );
    }

    let mut after = rows_by_value(&page)?;
    before.sort();
    after.sort();
    prop_assert_eq!(&before, &after);

    page.click("#value").map_err(fail)?;
    let descending = page.column_texts("#t", 1).map_err(fail)?;
    let mut reversed = ascending.clone();
    reversed.reverse();
    prop_assert_eq!(descending, reversed);
    prop_assert_eq!(
        page.sort_direction("#t").map_err(fail)?,
        Some(SortDirection::Descending)
    );
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: enhancer_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(ENHANCER_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn max_is_invalid_exactly_when_min_exceeds_it(min in any::<i32>(), max in any::<i32>()) {
        let mut page = Page::from_html(PAIR_HTML).map_err(fail)?;
        page.bind().map_err(fail)?;
        page.set_value("#min_burst", &min.to_string()).map_err(fail)?;
        page.set_value("#max_burst", &max.to_string()).map_err(fail)?;
        page.change("#max_burst").map_err(fail)?;

        let expected = if min > max { RANGE_MESSAGE } else { "" };
        prop_assert_eq!(page.custom_validity("#max_burst").map_err(fail)?, expected);
        prop_assert_eq!(page.value("#max_burst").map_err(fail)?, max.to_string());
    }

    #[test]
    fn non_numeric_side_never_flags(
        text in non_numeric_strategy(),
        number in any::<i32>(),
        text_is_min in any::<bool>(),
    ) {
        let mut page = Page::from_html(PAIR_HTML).map_err(fail)?;
        page.bind().map_err(fail)?;
        let (min, max) = if text_is_min {
            (text, number.to_string())
        } else {
            (number.to_string(), text)
        };
        page.set_value("#min_burst", &min).map_err(fail)?;
        page.set_value("#max_burst", &max).map_err(fail)?;
        page.change("#min_burst").map_err(fail)?;

        prop_assert_eq!(page.custom_validity("#max_burst").map_err(fail)?, "");
    }

    #[test]
    fn numeric_columns_sort_and_toggle(values in vec(number_strategy(), 0..=16)) {
        assert_sorted_then_reversed(&values)?;
    }

    #[test]
    fn text_columns_sort_and_toggle(values in vec(word_strategy(), 0..=16)) {
        assert_sorted_then_reversed(&values)?;
    }

    #[test]
    fn mixed_columns_keep_every_row(values in vec(mixed_strategy(), 0..=16)) {
        let mut page = bound_table(&values)?;
        let mut before = rows_by_value(&page)?;
        for _ in 0..3 {
            page.click("#value").map_err(fail)?;
        }
        let mut after = rows_by_value(&page)?;
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }
}
