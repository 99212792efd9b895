//! Integration tests for reading and writing through paths.

use pathquill::{delete_in, exist_in, get_in, segments, set_in, Path, PathError};
use serde_json::{json, Value};

fn read(source: &Value, pattern: &str) -> Option<Value> {
    get_in(source, pattern).unwrap().map(|value| value.into_owned())
}

#[test]
fn test_get_and_set() {
    let mut value = json!({"a": {"b": {"c": 2, "d": 333}}});
    assert_eq!(read(&value, "a.b.c"), Some(json!(2)));

    set_in(&mut value, "a.b.c", json!(1111)).unwrap();
    assert_eq!(read(&value, "a.b.c"), Some(json!(1111)));
    assert_eq!(read(&value, "a.b.d"), Some(json!(333)));
}

#[test]
fn test_get_missing_is_none() {
    let value = json!({"a": {"b": 1}});
    assert_eq!(read(&value, "a.x.y"), None);
    assert_eq!(read(&value, "a.b.c"), None);
    assert_eq!(read(&Value::Null, "a"), None);
}

#[test]
fn test_get_with_array_destructor() {
    let value = json!({"array": [{"aa": 123, "bb": 321}]});
    assert_eq!(read(&value, "array.0.[aa,bb]"), Some(json!([123, 321])));
}

#[test]
fn test_set_auto_creates_arrays() {
    let mut value = json!({});
    set_in(&mut value, "array[0].bb[2]", json!("hello world")).unwrap();
    assert_eq!(value, json!({"array": [{"bb": [null, null, "hello world"]}]}));
}

#[test]
fn test_set_does_not_affect_other_items() {
    let mut value = json!({
        "aa": [
            {
                "dd": [{"ee": "yes"}],
                "cc": "1111"
            }
        ]
    });

    set_in(&mut value, "aa.1.dd.0.ee", json!("no")).unwrap();
    assert_eq!(value["aa"][0], json!({"dd": [{"ee": "yes"}], "cc": "1111"}));
    assert_eq!(value["aa"][1], json!({"dd": [{"ee": "no"}]}));
}

#[test]
fn test_destructuring_set_spreads_flat_value() {
    let mut value = json!({});
    set_in(
        &mut value,
        "{
            a : {
                b : {
                    c,
                    d
                }
            }
        }",
        json!({"c": 2, "d": 333}),
    )
    .unwrap();
    assert_eq!(value, json!({"a": {"b": {"c": 2, "d": 333}}}));
}

#[test]
fn test_destructuring_get_flattens() {
    let value = json!({"a": {"b": {"c": 2, "d": 333}}});
    assert_eq!(
        read(&value, "{a:{b:{c,d}}}"),
        Some(json!({"c": 2, "d": 333}))
    );
}

#[test]
fn test_destructuring_get_with_renames() {
    let value = json!({"a": {"b": {"c": 2, "d": 333}}});
    assert_eq!(
        read(&value, "a.b.{c:kk,d:mm}"),
        Some(json!({"kk": 2, "mm": 333}))
    );
}

#[test]
fn test_destructuring_round_trip() {
    let pattern = "{a:{b:{c,d}}}";
    let flat = json!({"c": 2, "d": 333});
    let mut value = json!({});
    set_in(&mut value, pattern, flat.clone()).unwrap();
    assert_eq!(read(&value, pattern), Some(flat));
}

#[test]
fn test_array_destructor_set() {
    let mut value = json!({});
    set_in(&mut value, "\n      [aa,bb]\n      ", json!([123, 444])).unwrap();
    assert_eq!(value, json!({"aa": 123, "bb": 444}));

    let mut value = json!({});
    set_in(&mut value, "aa.bb.ddd.[aa,bb]", json!([123, 444])).unwrap();
    assert_eq!(value, json!({"aa": {"bb": {"ddd": {"aa": 123, "bb": 444}}}}));
}

#[test]
fn test_array_of_objects_destructor_set() {
    let mut value = json!({});
    set_in(
        &mut value,
        "aa.bb.ddd.[{cc:aa,bb}]",
        json!([{"aa": 123, "bb": 444}]),
    )
    .unwrap();
    assert_eq!(value, json!({"aa": {"bb": {"ddd": {"cc": 123, "bb": 444}}}}));
}

#[test]
fn test_array_destructor_inverse() {
    let pattern = "a.b.c.[aaa,bbb]";
    let mut value = json!({});
    set_in(&mut value, pattern, json!([123, 321])).unwrap();
    assert_eq!(value, json!({"a": {"b": {"c": {"aaa": 123, "bbb": 321}}}}));
    assert_eq!(read(&value, pattern), Some(json!([123, 321])));
}

#[test]
fn test_destructuring_set_leaves_other_keys() {
    let mut value = json!({"keep": true, "a": {"x": 1}});
    set_in(&mut value, "{a:{y}}", json!({"y": 2})).unwrap();
    assert_eq!(value, json!({"keep": true, "a": {"x": 1, "y": 2}}));
}

#[test]
fn test_set_then_get_round_trip() {
    let mut value = json!({"existing": [1, 2]});
    for (pattern, item) in [
        ("a.b.c", json!(1)),
        ("existing.1", json!("two")),
        ("list.3.name", json!("n")),
        ("x\\.y.z", json!(false)),
    ] {
        set_in(&mut value, pattern, item.clone()).unwrap();
        assert_eq!(read(&value, pattern), Some(item));
    }
    assert_eq!(value["x.y"]["z"], json!(false));
}

#[test]
fn test_set_is_idempotent() {
    let mut once = json!({"a": [1]});
    set_in(&mut once, "a.2.b", json!("v")).unwrap();
    let mut twice = once.clone();
    set_in(&mut twice, "a.2.b", json!("v")).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_delete() {
    let mut value = json!({"a": {"b": 1, "c": 2}, "list": [1, 2, 3]});
    delete_in(&mut value, "a.b").unwrap();
    delete_in(&mut value, "list.0").unwrap();
    delete_in(&mut value, "missing.deep.key").unwrap();
    assert_eq!(value, json!({"a": {"c": 2}, "list": [2, 3]}));
}

#[test]
fn test_delete_with_destructor() {
    let mut value = json!({"a": {"b": 1, "c": 2, "d": 3}});
    delete_in(&mut value, "a.{b,c}").unwrap();
    assert_eq!(value, json!({"a": {"d": 3}}));
}

#[test]
fn test_exist_in() {
    let value = json!({"a": {"b": null}, "list": [0]});
    assert!(exist_in(&value, "a.b", 0).unwrap());
    assert!(exist_in(&value, "list.0", 0).unwrap());
    assert!(!exist_in(&value, "list.1", 0).unwrap());
    assert!(!exist_in(&value, "a.c", 0).unwrap());
    assert!(exist_in(&value, "a.{b}", 0).unwrap());
    assert!(!exist_in(&value, "a.{b,c}", 0).unwrap());
}

#[test]
fn test_exist_in_from_offset() {
    let path = Path::new("root.child.leaf").unwrap();
    let child = json!({"leaf": 1});
    assert!(path.exist_in(&child, 2).unwrap());
    assert!(!path.exist_in(&child, 1).unwrap());
}

#[test]
fn test_segment_list_access() {
    let value = json!({"a.b": {"c": [5, 6]}});
    let path = Path::new(segments!["[[a.b]]", "c", 1]).unwrap();
    assert_eq!(
        path.get_in(&value).unwrap().map(|value| value.into_owned()),
        Some(json!(6))
    );
}

#[test]
fn test_accessors_reject_match_patterns() {
    let mut value = json!({"a": 1});
    assert!(matches!(
        get_in(&value, "a.*"),
        Err(PathError::WrongPathKind { .. })
    ));
    assert!(set_in(&mut value, "*(a,b)", json!(2)).is_err());
    assert!(delete_in(&mut value, "a.*[1:2]").is_err());
    assert_eq!(value, json!({"a": 1}));
}

#[test]
fn test_invalid_pattern_is_parse_error() {
    let value = json!({});
    assert!(matches!(get_in(&value, "a.*(b"), Err(PathError::Parse(_))));
}

#[test]
fn test_set_huge_index_is_dropped() {
    let mut value = json!({"a": []});
    set_in(&mut value, "a.18446744073709551615", json!(1)).unwrap();
    set_in(&mut value, "a.100000000000.b", json!(1)).unwrap();
    assert_eq!(value, json!({"a": []}));
}

#[test]
fn test_set_null_deep_is_noop() {
    let mut value = json!({});
    set_in(&mut value, "a.b.c", Value::Null).unwrap();
    set_in(&mut value, "list.3.x", Value::Null).unwrap();
    assert_eq!(value, json!({}));
}
