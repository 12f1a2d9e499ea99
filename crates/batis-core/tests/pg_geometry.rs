use batis_core::{
    pg::{Circle, GeoBox, Line, Lseg, Path, PgType, Point, Polygon, Vector},
    Family, FromValue, Value,
};

#[test]
fn point_negative_and_fractional() {
    let point = Point::decode("(-1,-2.5)").unwrap();
    assert_eq!(point, Point::new(-1.0, -2.5));
    assert_eq!(point.to_string(), "(-1,-2.5)");
}

#[test]
fn point_value_round_trip() {
    let value = Value::from(Point::new(3.0, 4.0));
    assert_eq!(value.to_string(), "(3,4)");
    assert_eq!(Point::from_value(value).unwrap(), Point::new(3.0, 4.0));
}

#[test]
fn geo_box() {
    let b = GeoBox::decode("(3,4),(1,2)").unwrap();
    assert_eq!(b.high, Point::new(3.0, 4.0));
    assert_eq!(b.low, Point::new(1.0, 2.0));
    assert_eq!(b.to_string(), "(3,4),(1,2)");

    let err = GeoBox::decode("(3,4)").unwrap_err();
    assert_eq!(err.invalid_format_family(), Some(Family::Box));
}

#[test]
fn circle() {
    let circle = Circle::decode("<(1,2),3.5>").unwrap();
    assert_eq!(circle, Circle::new(Point::new(1.0, 2.0), 3.5));
    assert_eq!(circle.to_string(), "<(1,2),3.5>");
}

#[test]
fn circle_missing_close() {
    let err = Circle::decode("<(1,2),3").unwrap_err();
    assert_eq!(err.invalid_format_family(), Some(Family::Circle));
    assert_eq!(err.to_string(), "invalid circle value: missing `>`");
}

#[test]
fn line() {
    let line = Line::decode("{1,-1,0.5}").unwrap();
    assert_eq!(line, Line::new(1.0, -1.0, 0.5));
    assert_eq!(line.to_string(), "{1,-1,0.5}");
}

#[test]
fn lseg() {
    let lseg = Lseg::decode("[(0,0),(2,2)]").unwrap();
    assert_eq!(lseg, Lseg::new(Point::new(0.0, 0.0), Point::new(2.0, 2.0)));
    assert_eq!(lseg.to_string(), "[(0,0),(2,2)]");
}

#[test]
fn open_and_closed_paths() {
    let open = Path::decode("[(0,0),(1,1)]").unwrap();
    assert!(!open.closed);
    assert_eq!(open.points.len(), 2);
    assert_eq!(open.to_string(), "[(0,0),(1,1)]");

    let closed = Path::decode("((0,0),(1,1),(1,0))").unwrap();
    assert!(closed.closed);
    assert_eq!(closed.to_string(), "((0,0),(1,1),(1,0))");

    let err = Path::decode("[(0,0),(1,1))").unwrap_err();
    assert_eq!(err.invalid_format_family(), Some(Family::Path));
}

#[test]
fn polygon() {
    let polygon = Polygon::decode("((0,0),(0,1),(1,1))").unwrap();
    assert_eq!(polygon.points[2], Point::new(1.0, 1.0));
    assert_eq!(polygon.to_string(), "((0,0),(0,1),(1,1))");
}

#[test]
fn vector() {
    let vector = Vector::decode("[1,2.5,-3]").unwrap();
    assert_eq!(vector.as_slice(), [1.0, 2.5, -3.0]);
    assert_eq!(vector.to_string(), "[1,2.5,-3]");
    assert_eq!(Vector::decode("[]").unwrap(), Vector::default());

    let err = Vector::decode("[1,x]").unwrap_err();
    assert_eq!(err.invalid_format_family(), Some(Family::Vector));
}
