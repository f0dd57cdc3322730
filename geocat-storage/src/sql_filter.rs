//! Translation of [`Predicate`]s into a SQLite `WHERE` prefilter.
//!
//! The generated clause selects a superset of the matching rows: anything
//! that cannot be expressed exactly with `json_extract` becomes `1=1`, and
//! callers re-evaluate the predicate in Rust on every returned row. Only
//! scalar schema properties are pushed down, since `json_extract` does not
//! fan out over arrays the way property resolution does.

use geocat_model::{FieldType, InfoSchema, InfoType, Predicate};
use rusqlite::types::Value as SqlValue;
use serde_json::Value;

/// A SQL fragment plus its positional parameters.
#[derive(Debug)]
pub(crate) struct SqlFilter {
    pub clause: String,
    pub params: Vec<SqlValue>,
}

const ALWAYS: &str = "1=1";

pub(crate) fn translate(info_type: InfoType, predicate: &Predicate) -> SqlFilter {
    let schema = InfoSchema::for_type(info_type);
    let mut params = Vec::new();
    let clause = build(&schema, predicate, &mut params);
    SqlFilter { clause, params }
}

fn build(schema: &InfoSchema, predicate: &Predicate, params: &mut Vec<SqlValue>) -> String {
    match predicate {
        Predicate::AcceptAll => ALWAYS.to_string(),
        Predicate::Equal { property, value } => {
            let Some(path) = json_path(schema, property) else {
                return ALWAYS.to_string();
            };
            let Some(param) = scalar(value) else {
                return ALWAYS.to_string();
            };
            params.push(SqlValue::Text(path));
            params.push(param);
            format!("json_extract(blob, ?{}) = ?{}", params.len() - 1, params.len())
        }
        Predicate::IsNull { property } => {
            let Some(path) = json_path(schema, property) else {
                return ALWAYS.to_string();
            };
            params.push(SqlValue::Text(path));
            format!("json_extract(blob, ?{}) IS NULL", params.len())
        }
        Predicate::And { left, right } => {
            let l = build(schema, left, params);
            let r = build(schema, right, params);
            format!("({l} AND {r})")
        }
        Predicate::Or { left, right } => {
            let l = build(schema, left, params);
            let r = build(schema, right, params);
            format!("({l} OR {r})")
        }
    }
}

/// `$.a.b` for a scalar schema property, `None` otherwise.
fn json_path(schema: &InfoSchema, property: &str) -> Option<String> {
    let field = schema.field(property)?;
    if field.field_type == FieldType::List {
        return None;
    }
    let plain = property
        .split('.')
        .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    plain.then(|| format!("$.{property}"))
}

fn scalar(value: &Value) -> Option<SqlValue> {
    match value {
        Value::String(s) => Some(SqlValue::Text(s.clone())),
        Value::Bool(b) => Some(SqlValue::Integer(i64::from(*b))),
        Value::Number(n) => n
            .as_i64()
            .map(SqlValue::Integer)
            .or_else(|| n.as_f64().map(SqlValue::Real)),
        _ => None,
    }
}
