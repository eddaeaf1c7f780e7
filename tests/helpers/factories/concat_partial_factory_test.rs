use crate::engine::aggregate::partial::GroupKey;
use crate::test_helpers::factory::Factory;

#[test]
fn builds_partial_with_groups() {
    let partial = Factory::concat_partial()
        .with_group_by(vec!["city"])
        .add_group(&["Porto"], &["a", "b"], Some(","))
        .add_group(&["Braga"], &[], Some(","))
        .create();

    assert_eq!(partial.len(), 2);
    let porto = partial.get(&GroupKey::new(vec!["Porto".into()])).unwrap();
    assert_eq!(porto.buffer(), "a,b");
    let braga = partial.get(&GroupKey::new(vec!["Braga".into()])).unwrap();
    assert!(braga.is_empty());
    assert_eq!(partial.spec.output_name(), "group_concat_value");
}
