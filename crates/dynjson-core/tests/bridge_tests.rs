use dynjson_core::{parse, Map, Value};
use serde_json::json;

#[test]
fn into_serde_json() {
    let value = parse(r#"{"a":[1,2.5,"s",null,true],"b":{}}"#).unwrap();
    let json: serde_json::Value = value.into();
    assert_eq!(json, json!({"a": [1, 2.5, "s", null, true], "b": {}}));
}

#[test]
fn duplicate_keys_collapse_to_last() {
    let value = parse(r#"{"k":1,"k":2}"#).unwrap();
    let json: serde_json::Value = value.into();
    assert_eq!(json, json!({"k": 2}));
}

#[test]
fn non_finite_float_becomes_null() {
    let json: serde_json::Value = Value::Float(f64::NAN as _).into();
    assert_eq!(json, serde_json::Value::Null);
}

#[test]
fn from_serde_json() {
    let value = Value::from(json!({"n": 7, "f": 0.5, "big": u64::MAX, "list": [null, false]}));
    assert_eq!(value["n"], Value::Integer(7));
    assert_eq!(value["f"], Value::Float(0.5));
    assert!(matches!(value["big"], Value::Float(_)));
    assert_eq!(value["list"], Value::List(vec![Value::Null, Value::Bool(false)]));
}

#[test]
fn serialize_keeps_stored_order() {
    let mut map = Map::new();
    map.insert("z", 1_i64);
    map.insert("a", "x");
    let text = serde_json::to_string(&Value::Map(map)).unwrap();
    assert_eq!(text, r#"{"z":1,"a":"x"}"#);
}

#[test]
fn encoded_text_reads_back_through_serde_json() {
    let value = parse(r#"[{"k":[1,-2,"v"]},true,null,"q\"uote",0.25]"#).unwrap();
    let text = dynjson_core::encode(&value).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(Value::from(json), value);
}
