use batis_core::{
    pg::{Array, Circle, GeoBox, Line, Point, Range, Record},
    Family, FromValue, Value,
};
use std::ops::Bound;

// ---------------------------------------------------------------------------
// Scalar arrays
// ---------------------------------------------------------------------------

#[test]
fn int_array() {
    let array = Array::<i64>::decode("{1,-2,300}").unwrap();
    assert_eq!(array.0, [1, -2, 300]);
    assert_eq!(array.to_string(), "{1,-2,300}");
}

#[test]
fn int_array_rejects_garbage() {
    let err = Array::<i64>::decode("{1,two}").unwrap_err();
    assert_eq!(err.invalid_format_family(), Some(Family::IntArray));

    let err = Array::<i64>::decode("{1,2").unwrap_err();
    assert_eq!(err.invalid_format_family(), Some(Family::IntArray));

    let err = Array::<i64>::decode("{{1},{2}}").unwrap_err();
    assert!(err.is_invalid_format());
}

#[test]
fn float_array_special_values() {
    let array = Array::<f64>::decode("{1,-2.5,Infinity,-Infinity}").unwrap();
    assert_eq!(array.0, [1.0, -2.5, f64::INFINITY, f64::NEG_INFINITY]);
    assert_eq!(array.to_string(), "{1,-2.5,Infinity,-Infinity}");
}

#[test]
fn bool_array() {
    let array = Array::<bool>::decode("{t,f,true}").unwrap();
    assert_eq!(array.0, [true, false, true]);
    assert_eq!(array.to_string(), "{t,f,t}");
}

#[test]
fn string_array_quoting() {
    let items = ["a", "b c", "", "q\"t", "back\\slash", "x,y"];
    let array = Array::new(items.iter().map(|s| s.to_string()).collect());
    let text = array.to_string();

    assert_eq!(text, r#"{a,"b c","","q\"t","back\\slash","x,y"}"#);
    assert_eq!(Array::<String>::decode(&text).unwrap(), array);
}

#[test]
fn string_array_keeps_inner_whitespace() {
    let array = Array::<String>::decode("{ hello world , x }").unwrap();
    assert_eq!(array.0, ["hello world", "x"]);
}

// ---------------------------------------------------------------------------
// Arrays of composite element types
// ---------------------------------------------------------------------------

#[test]
fn point_array() {
    let text = r#"{"(1,2)","(-3.5,0)"}"#;
    let array = Array::<Point>::decode(text).unwrap();
    assert_eq!(array.0, [Point::new(1.0, 2.0), Point::new(-3.5, 0.0)]);
    assert_eq!(array.to_string(), text);
}

#[test]
fn box_array_uses_semicolons() {
    let text = "{(1,2),(0,0);(5,5),(3,3)}";
    let array = Array::<GeoBox>::decode(text).unwrap();
    assert_eq!(
        array.0,
        [
            GeoBox::new(Point::new(1.0, 2.0), Point::new(0.0, 0.0)),
            GeoBox::new(Point::new(5.0, 5.0), Point::new(3.0, 3.0)),
        ]
    );
    assert_eq!(array.to_string(), text);
}

#[test]
fn line_and_circle_arrays() {
    let lines = Array::<Line>::decode(r#"{"{1,-1,0}"}"#).unwrap();
    assert_eq!(lines.0, [Line::new(1.0, -1.0, 0.0)]);
    assert_eq!(lines.to_string(), r#"{"{1,-1,0}"}"#);

    let circles = Array::new(vec![Circle::new(Point::new(0.0, 0.0), 1.5)]);
    assert_eq!(circles.to_string(), r#"{"<(0,0),1.5>"}"#);
}

#[test]
fn record_array_nests_escapes() {
    let array = Array::new(vec![
        Record::new([Some("1"), Some("a b")]),
        Record::new([Some("2"), None]),
    ]);
    let text = array.to_string();

    assert_eq!(text, r#"{"(1,\"a b\")","(2,)"}"#);
    assert_eq!(Array::<Record>::decode(&text).unwrap(), array);
}

#[test]
fn range_array() {
    let array = Array::new(vec![
        Range::new(Bound::Included("1".into()), Bound::Excluded("5".into())),
        Range::Empty,
    ]);
    let text = array.to_string();

    assert_eq!(text, r#"{"[1,5)",empty}"#);
    assert_eq!(Array::<Range>::decode(&text).unwrap(), array);
}

// ---------------------------------------------------------------------------
// Value conversions
// ---------------------------------------------------------------------------

#[test]
fn array_into_value_is_composite() {
    let Value::Composite(composite) = Value::from(Array::new(vec![1i64, 2])) else {
        panic!("expected a composite value");
    };
    assert_eq!(composite.type_name, "int8[]");
    assert_eq!(composite.text, "{1,2}");
}

#[test]
fn array_from_text_value() {
    let array = Array::<Option<i64>>::from_value(Value::from("{1,NULL}")).unwrap();
    assert_eq!(array.0, [Some(1), None]);
}
