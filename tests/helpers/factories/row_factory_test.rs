use serde_json::json;

use crate::test_helpers::factory::Factory;

#[test]
fn creates_row_with_defaults_and_overrides() {
    let row = Factory::row().with("city", "Porto").create();
    assert_eq!(row, json!({ "value": "v", "sep": ",", "city": "Porto" }));

    let row = Factory::row().without("sep").with("value", json!(null)).create();
    assert_eq!(row, json!({ "value": null }));
}

#[test]
fn creates_numbered_list() {
    let rows = Factory::row().create_list("a", 3);
    let values: Vec<_> = rows.iter().map(|r| r["value"].as_str().unwrap()).collect();
    assert_eq!(values, vec!["a0", "a1", "a2"]);
}
