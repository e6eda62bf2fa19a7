// File: src/value.rs
// Purpose: Safe traversal and display of JSON values for placeholders

use serde_json::{Map, Value as JsonValue};
use std::borrow::Cow;

/// Outcome of walking a key path through page data
///
/// `Missing` is distinct from finding a legitimately empty value such as
/// `""` or `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a JsonValue),
    Missing,
}

impl<'a> Lookup<'a> {
    pub fn found(self) -> Option<&'a JsonValue> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing => None,
        }
    }
}

/// Split a key expression into path segments
///
/// `[` counts as a separator and `]` is dropped, so `users[0].name`,
/// `users.0.name` and `users[0]name` are the same path. Empty segments are
/// ignored.
pub fn key_segments(expr: &str) -> Vec<String> {
    expr.replace('[', ".")
        .replace(']', "")
        .split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Walk `expr` through `data`
///
/// Objects are indexed by key and arrays by decimal index; anything else
/// ends the walk as `Missing`. An expression with no segments is `Missing`.
pub fn lookup<'a>(data: &'a Map<String, JsonValue>, expr: &str) -> Lookup<'a> {
    let segments = key_segments(expr);
    let Some((first, rest)) = segments.split_first() else {
        return Lookup::Missing;
    };

    let found = rest
        .iter()
        .try_fold(data.get(first.as_str()), |current, segment| {
            current.map(|value| step(value, segment))
        })
        .flatten();

    match found {
        Some(value) => Lookup::Found(value),
        None => Lookup::Missing,
    }
}

fn step<'a>(value: &'a JsonValue, segment: &str) -> Option<&'a JsonValue> {
    match value {
        JsonValue::Object(map) => map.get(segment),
        JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Text form of a value inside HTML
///
/// Strings are inserted verbatim, numbers and booleans in display form,
/// `null` as `null`, and arrays and objects as compact JSON.
pub fn display(value: &JsonValue) -> Cow<'_, str> {
    match value {
        JsonValue::String(s) => Cow::Borrowed(s),
        JsonValue::Null => Cow::Borrowed("null"),
        JsonValue::Bool(b) => Cow::Owned(b.to_string()),
        JsonValue::Number(n) => Cow::Owned(n.to_string()),
        JsonValue::Array(_) | JsonValue::Object(_) => Cow::Owned(value.to_string()),
    }
}
