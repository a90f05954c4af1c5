use super::*;

#[test]
fn null_schema() {
    assert_eq!(resolve("~"), Value::Null);
    assert_eq!(resolve("null"), Value::Null);
    assert_eq!(resolve("Null"), Value::Null);
    assert_eq!(resolve("NULL"), Value::Null);
    assert_eq!(resolve(""), Value::Null);
}

#[test]
fn bool_schema() {
    assert_eq!(resolve("true"), Value::Bool(true));
    assert_eq!(resolve("Yes"), Value::Bool(true));
    assert_eq!(resolve("ON"), Value::Bool(true));
    assert_eq!(resolve("false"), Value::Bool(false));
    assert_eq!(resolve("No"), Value::Bool(false));
}

/// spec.md §8 scenario 4: trailing space defeats the bool match and falls
/// all the way through to the string fallback.
#[test]
fn bool_with_trailing_space_is_string() {
    assert_eq!(resolve("y "), Value::Str("y ".to_string()));
}

#[test]
fn int_binary_octal_hex() {
    assert_eq!(resolve("0b10"), Value::Int(2));
    assert_eq!(resolve("017"), Value::Int(15));
    assert_eq!(resolve("0x1F"), Value::Int(31));
    assert_eq!(resolve("-0x1F"), Value::Int(-31));
}

#[test]
fn int_decimal_with_underscores() {
    assert_eq!(resolve("1_000_000"), Value::Int(1_000_000));
    assert_eq!(resolve("0"), Value::Int(0));
    assert_eq!(resolve("-42"), Value::Int(-42));
}

#[test]
fn int_sexagesimal() {
    assert_eq!(resolve("1:30:00"), Value::Int(5400));
}

#[test]
fn float_inf_and_nan() {
    match resolve("+.inf") {
        Value::Float(f) => assert!(f.is_infinite() && f > 0.0),
        other => panic!("expected float, got {:?}", other),
    }
    match resolve("-.inf") {
        Value::Float(f) => assert!(f.is_infinite() && f < 0.0),
        other => panic!("expected float, got {:?}", other),
    }
    match resolve(".nan") {
        Value::Float(f) => assert!(f.is_nan()),
        other => panic!("expected float, got {:?}", other),
    }
}

#[test]
fn float_decimal() {
    assert_eq!(resolve("3.14"), Value::Float(3.14));
    assert_eq!(resolve("-0.5e+2"), Value::Float(-50.0));
}

#[test]
fn lone_dot_is_not_a_float() {
    match resolve(".") {
        Value::Str(s) => assert_eq!(s, "."),
        other => panic!("expected string fallback, got {:?}", other),
    }
}

#[test]
fn timestamp_date_only_is_utc_midnight() {
    match resolve("2000-01-01") {
        Value::Timestamp(dt) => {
            assert_eq!(dt.to_rfc3339(), "2000-01-01T00:00:00+00:00");
        }
        other => panic!("expected timestamp, got {:?}", other),
    }
}

#[test]
fn timestamp_with_fraction_and_offset() {
    match resolve("2001-12-14t21:59:43.10-05:00") {
        Value::Timestamp(dt) => {
            assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
            assert_eq!(dt.naive_local().to_string(), "2001-12-14 21:59:43.100");
        }
        other => panic!("expected timestamp, got {:?}", other),
    }
}

#[test]
fn timestamp_bare_z_is_utc() {
    match resolve("2001-12-14 21:59:43Z") {
        Value::Timestamp(dt) => assert_eq!(dt.offset().local_minus_utc(), 0),
        other => panic!("expected timestamp, got {:?}", other),
    }
}

#[test]
fn binary_schema_decodes_base64_after_stripping_whitespace() {
    match resolve_as("aGVs bG8=", Schema::Binary) {
        Some(Value::Binary(bytes)) => assert_eq!(bytes, b"hello"),
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn str_is_the_universal_fallback() {
    assert_eq!(resolve("hello world"), Value::Str("hello world".to_string()));
}

#[test]
fn resolve_tagged_rejects_unknown_schema_name() {
    let err = resolve_tagged("1", "bignum").unwrap_err();
    assert_eq!(err.0, "bignum");
}

#[test]
fn resolve_tagged_forces_a_schema() {
    assert_eq!(resolve_tagged("42", "int").unwrap(), Some(Value::Int(42)));
    assert_eq!(resolve_tagged("abc", "int").unwrap(), None);
}
