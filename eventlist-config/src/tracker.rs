use serde_json::{Map, Number, Value};

use crate::config::Config;

/// Return whether the draft diverges from the saved snapshot.
///
/// The comparison is structural: mapping keys match regardless of their
/// order, arrays compare element by element, and numbers compare by value
/// so `1` and `1.0` are the same setting.
pub fn is_changed(draft: &Config, saved: &Config) -> bool {
    !maps_equal(draft.as_map(), saved.as_map())
}

/// Structural equality of two JSON values under the rules of [`is_changed`].
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(l), Value::Bool(r)) => l == r,
        (Value::Number(l), Value::Number(r)) => numbers_equal(l, r),
        (Value::String(l), Value::String(r)) => l == r,
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len()
                && l.iter().zip(r).all(|(l, r)| values_equal(l, r))
        },
        (Value::Object(l), Value::Object(r)) => maps_equal(l, r),
        _ => false,
    }
}

fn maps_equal(left: &Map<String, Value>, right: &Map<String, Value>) -> bool {
    left.len() == right.len()
        && left.iter().all(|(key, value)| {
            right.get(key).is_some_and(|other| values_equal(value, other))
        })
}

fn numbers_equal(left: &Number, right: &Number) -> bool {
    if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
        return l == r;
    }
    if let (Some(l), Some(r)) = (left.as_u64(), right.as_u64()) {
        return l == r;
    }
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => l == r,
        _ => false,
    }
}
