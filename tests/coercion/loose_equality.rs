//! Loose equality `==`

use quirks_coercion::{bootstrap, loose_equals};
use quirks_foundation::{Heap, Value};
use quirks_runtime::{Realm, RealmConfig};

fn array_of(heap: &mut Heap, values: impl IntoIterator<Item = Value>) -> Value {
    Value::Object(heap.create_array(values))
}

// =============================================================================
// string == number
// =============================================================================

#[test]
fn strings_are_converted_with_to_number() {
    let mut heap = bootstrap().unwrap();
    assert!(loose_equals(&mut heap, &Value::from("42"), &Value::from(42)).unwrap());
    assert!(!loose_equals(&mut heap, &Value::from("42"), &Value::from(43)).unwrap());
}

// =============================================================================
// * == boolean
// =============================================================================

#[test]
fn booleans_are_converted_with_to_number() {
    let mut heap = bootstrap().unwrap();
    let one = array_of(&mut heap, [Value::from(1)]);
    let zero = array_of(&mut heap, [Value::from(0)]);
    let zero_text = array_of(&mut heap, [Value::from("0")]);
    let empty = array_of(&mut heap, Vec::new());

    let unequal = [
        (Value::from("42"), true),
        (Value::from("42"), false),
    ];
    for (left, b) in &unequal {
        assert!(!loose_equals(&mut heap, left, &Value::Bool(*b)).unwrap(), "{left:?} == {b}");
    }

    let equal = [
        (Value::from("1"), true),
        (Value::from(1), true),
        (one, true),
        (Value::from("0"), false),
        (Value::from(0), false),
        (zero, false),
        (zero_text, false),
        (empty, false),
    ];
    for (left, b) in &equal {
        assert!(loose_equals(&mut heap, left, &Value::Bool(*b)).unwrap(), "{left:?} == {b}");
    }
}

// =============================================================================
// null and undefined
// =============================================================================

#[test]
fn document_all_equals_null_and_undefined() {
    let mut realm = Realm::new(RealmConfig::browser()).unwrap();
    let all = realm.document_all().unwrap().clone();
    let heap = realm.heap_mut();
    assert!(loose_equals(heap, &all, &Value::Null).unwrap());
    assert!(loose_equals(heap, &Value::Undefined, &all).unwrap());
    assert!(loose_equals(heap, &Value::Null, &Value::Undefined).unwrap());
    assert!(!loose_equals(heap, &Value::Null, &Value::from(0)).unwrap());
}
