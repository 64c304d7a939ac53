//! Integration tests for Attributes
//!
//! Tests persistence, ordering, and merging of attribute mappings.

use edgemap_foundation::{Attributes, Label, NodeId, Value};

#[test]
fn builder_and_lookup() {
    let attrs = Attributes::new().with("name", "x").with("size", 3);
    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs.get("name"), Some(&Value::from("x")));
    assert!(attrs.get("missing").is_none());
}

#[test]
fn modifications_are_persistent() {
    let base = Attributes::new().with("name", "x");
    let more = base.insert("parent", NodeId::new(1, 1));
    let less = more.remove("name");

    assert_eq!(base.len(), 1);
    assert_eq!(more.len(), 2);
    assert_eq!(less.len(), 1);
    assert!(less.contains_key("parent"));
    assert!(base.contains_key("name"));
}

#[test]
fn take_returns_rest_and_value() {
    let attrs = Attributes::new().with("a", 1).with("b", 2);
    let (rest, value) = attrs.take("a").unwrap();
    assert_eq!(value, Value::Int(1));
    assert_eq!(rest, Attributes::new().with("b", 2));
}

#[test]
fn iteration_is_ordered() {
    let attrs: Attributes = [("zeta", 1), ("alpha", 2), ("mid", 3)].into_iter().collect();
    let keys: Vec<&str> = attrs.keys().map(Label::as_str).collect();
    assert_eq!(keys, ["alpha", "mid", "zeta"]);

    let owned: Vec<(Label, Value)> = attrs.into_iter().collect();
    assert_eq!(owned[0], (Label::new("alpha"), Value::Int(2)));
}

#[test]
fn merge_other_wins() {
    let a = Attributes::new().with("x", 1).with("y", 1);
    let b = Attributes::new().with("y", 2).with("z", 2);
    let merged = a.merge(&b);
    assert_eq!(
        merged,
        Attributes::new().with("x", 1).with("y", 2).with("z", 2)
    );
}

#[test]
fn merge_other_wins_when_smaller() {
    let base: Attributes = (0..16).map(|i| (format!("k{i:02}"), i)).collect();
    let update = Attributes::new().with("k03", -1);

    let merged = base.merge(&update);

    assert_eq!(merged.len(), 16);
    assert_eq!(merged.get("k03"), Some(&Value::Int(-1)));
    assert_eq!(merged.get("k04"), Some(&Value::Int(4)));
    assert_eq!(base.get("k03"), Some(&Value::Int(3)));
}
