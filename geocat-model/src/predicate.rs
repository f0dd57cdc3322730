use crate::property;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Boolean filter over an entity's properties.
///
/// Properties are dotted paths resolved with [`property::resolve`]. Evaluation
/// is pure, so backends that translate a predicate into a native query can
/// always fall back to [`Predicate::evaluate`] to confirm a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    #[default]
    AcceptAll,
    Equal {
        property: String,
        value: Value,
    },
    IsNull {
        property: String,
    },
    And {
        left: Box<Predicate>,
        right: Box<Predicate>,
    },
    Or {
        left: Box<Predicate>,
        right: Box<Predicate>,
    },
}

impl Predicate {
    pub fn accept_all() -> Self {
        Predicate::AcceptAll
    }

    pub fn equal(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Equal {
            property: property.into(),
            value: value.into(),
        }
    }

    pub fn is_null(property: impl Into<String>) -> Self {
        Predicate::IsNull {
            property: property.into(),
        }
    }

    /// Conjunction. `AcceptAll` operands are folded away.
    pub fn and(self, other: Predicate) -> Self {
        match (self, other) {
            (Predicate::AcceptAll, p) | (p, Predicate::AcceptAll) => p,
            (left, right) => Predicate::And {
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    pub fn or(self, other: Predicate) -> Self {
        match (self, other) {
            (Predicate::AcceptAll, _) | (_, Predicate::AcceptAll) => Predicate::AcceptAll,
            (left, right) => Predicate::Or {
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    /// Equality on every `(property, value)` pair.
    pub fn all_equal<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        pairs
            .into_iter()
            .fold(Predicate::AcceptAll, |acc, (k, v)| acc.and(Predicate::equal(k, v)))
    }

    pub fn is_accept_all(&self) -> bool {
        matches!(self, Predicate::AcceptAll)
    }

    /// Evaluates the predicate against an entity document.
    ///
    /// `Equal` matches if any value reached by the path equals `value`, or is
    /// an array containing it. `IsNull` matches when the path reaches nothing
    /// but nulls (including when it reaches nothing at all).
    pub fn evaluate(&self, document: &Value) -> bool {
        match self {
            Predicate::AcceptAll => true,
            Predicate::Equal { property, value } => property::resolve(document, property)
                .into_iter()
                .any(|found| found == value || matches!(found, Value::Array(items) if items.contains(value))),
            Predicate::IsNull { property } => property::resolve(document, property)
                .into_iter()
                .all(Value::is_null),
            Predicate::And { left, right } => left.evaluate(document) && right.evaluate(document),
            Predicate::Or { left, right } => left.evaluate(document) || right.evaluate(document),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::AcceptAll => f.write_str("INCLUDE"),
            Predicate::Equal { property, value } => match value {
                Value::String(s) => write!(f, "{property} = '{}'", s.replace('\'', "''")),
                other => write!(f, "{property} = {other}"),
            },
            Predicate::IsNull { property } => write!(f, "{property} IS NULL"),
            Predicate::And { left, right } => write!(f, "({left} AND {right})"),
            Predicate::Or { left, right } => write!(f, "({left} OR {right})"),
        }
    }
}
