use domain::{AccessMode, Role, ScalarValue, ValueType};

#[test]
fn value_type_parse_falls_back_to_float() {
    assert_eq!(ValueType::parse("Boolean"), ValueType::Boolean);
    assert_eq!(ValueType::parse("Int32"), ValueType::Int32);
    assert_eq!(ValueType::parse("Complex128"), ValueType::Float);
}

#[test]
fn access_mode_parse_falls_back_to_read() {
    assert_eq!(AccessMode::parse("CurrentReadWrite"), AccessMode::ReadWrite);
    assert!(AccessMode::parse("CurrentReadWrite").is_writable());
    assert_eq!(AccessMode::parse("garbage"), AccessMode::Read);
    assert!(!AccessMode::parse("garbage").is_writable());
}

#[test]
fn scalar_truthiness() {
    assert!(ScalarValue::Text("TRUE".to_string()).truthy());
    assert!(!ScalarValue::Text("yes".to_string()).truthy());
    assert!(ScalarValue::Int(2).truthy());
    assert!(!ScalarValue::Float(0.0).truthy());
}

#[test]
fn scalar_numeric_conversions() {
    assert_eq!(ScalarValue::Text(" 3.5 ".to_string()).as_f64(), Some(3.5));
    assert_eq!(ScalarValue::Text("abc".to_string()).as_f64(), None);
    assert_eq!(ScalarValue::Float(3.9).as_i64(), Some(3));
    assert_eq!(ScalarValue::Bool(true).as_f64(), Some(1.0));
}

#[test]
fn role_parse_falls_back_to_readonly() {
    assert_eq!(Role::parse("Admin"), Role::Admin);
    assert_eq!(Role::parse("guest"), Role::ReadOnly);
}
