//! Testing for null, NaN, and signed zero

use quirks_coercion::{bootstrap, builtins, invoke, logical_not, strict_equals, type_of};
use quirks_foundation::{TypeTag, Value};

// =============================================================================
// Null
// =============================================================================

#[test]
fn null_compares_strictly_equal_to_null() {
    let a = Value::Null;
    assert!(strict_equals(&a, &Value::Null));
}

#[test]
fn null_is_the_only_falsy_value_with_typeof_object() {
    let heap = bootstrap().unwrap();
    let a = Value::Null;
    assert!(logical_not(&heap, &a) && type_of(&heap, &a) == TypeTag::Object);
}

// =============================================================================
// NaN
// =============================================================================

#[test]
fn nan_is_not_equal_to_itself() {
    let a = Value::Number(f64::NAN);
    assert!(!strict_equals(&a, &a));
}

#[test]
fn number_is_nan_is_explicit() {
    assert!(builtins::number_is_nan(&Value::Number(f64::NAN)));
    assert!(!builtins::number_is_nan(&Value::from("abc")));
}

#[test]
fn global_is_nan_coerces_its_argument() {
    let mut heap = bootstrap().unwrap();
    let object = Value::Object(heap.create_object());

    let nan_cases = [
        Value::Number(f64::NAN),
        Value::Undefined,
        object,
        Value::from("123ABC"),
        Value::from("abc"),
    ];
    for value in &nan_cases {
        assert!(builtins::is_nan(&mut heap, value).unwrap(), "isNaN({value:?})");
    }

    let number_cases = [
        Value::Null,
        Value::Bool(true),
        Value::from(12.34),
        Value::from(""),
        Value::from(" "),
        Value::from("123"),
    ];
    for value in &number_cases {
        assert!(!builtins::is_nan(&mut heap, value).unwrap(), "isNaN({value:?})");
    }
}

#[test]
fn is_nan_of_a_date_and_its_string() {
    let mut heap = bootstrap().unwrap();
    let date = builtins::date_constructor(&mut heap, &[]).unwrap();
    assert!(!builtins::is_nan(&mut heap, &date).unwrap());

    let text = invoke(&mut heap, &date, "toString", &[]).unwrap();
    assert!(builtins::is_nan(&mut heap, &text).unwrap());
}

// =============================================================================
// Signed Zero
// =============================================================================

#[test]
fn positive_and_negative_zero_are_strictly_equal() {
    assert!(strict_equals(&Value::Number(0.0), &Value::Number(-0.0)));
}
