//! Dotted property-path resolution over entity documents.
//!
//! A path such as `workspace.id` walks nested objects one segment at a time.
//! When a segment lands on an array, the remaining path is applied to every
//! element, so `styles.id` on a layer yields the id of each listed style.

use serde_json::Value;
use std::cmp::Ordering;

/// Resolves `path` against `root`, returning every value it reaches.
///
/// Missing properties resolve to nothing; an explicit JSON `null` resolves to
/// `Value::Null`. An empty path resolves to the root itself.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![root];
    if path.is_empty() {
        return current;
    }
    for segment in path.split('.') {
        let mut next = Vec::with_capacity(current.len());
        for value in current {
            step(value, segment, &mut next);
        }
        if next.is_empty() {
            return next;
        }
        current = next;
    }
    current
}

fn step<'a>(value: &'a Value, segment: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            if let Some(child) = map.get(segment) {
                out.push(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                step(item, segment, out);
            }
        }
        _ => {}
    }
}

/// The first value reached by `path`, if any.
pub fn first<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    resolve(root, path).into_iter().next()
}

/// Total order over JSON values used for sorting.
///
/// Values of different kinds order as null < bool < number < string < array
/// < object. Strings compare lexicographically, arrays element-wise.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(f64::NAN);
                    let y = y.as_f64().unwrap_or(f64::NAN);
                    x.total_cmp(&y)
                }
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y.iter())
            .map(|(a, b)| compare_values(a, b))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// The sort key of `path` in `root`: the first resolved value, or null.
pub fn sort_key<'a>(root: &'a Value, path: &str) -> &'a Value {
    static NULL: Value = Value::Null;
    first(root, path).unwrap_or(&NULL)
}
