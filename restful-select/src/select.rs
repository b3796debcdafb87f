use restful_model::{Entity, number_value};
use serde_json::Value;
use tracing::trace;

use crate::{Result, SelectError};

/// Renders `value` as the key rows are grouped under.
#[must_use]
pub fn group_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), |f| number_value(f).to_string()),
        other => other.to_string(),
    }
}

/// Every row whose `key` field groups with `value`, in collection order.
#[must_use]
pub fn select_all<'a>(rows: &'a [Entity], key: &str, value: &Value) -> Vec<&'a Entity> {
    let wanted = group_key(value);
    let selected: Vec<&Entity> = rows
        .iter()
        .filter(|row| row.get(key).is_some_and(|v| group_key(v) == wanted))
        .collect();
    trace!(key, value = %value, count = selected.len(), "Selected rows");
    selected
}

/// The single row whose `key` field groups with `value`.
///
/// Returns `Ok(None)` when nothing matches and
/// [`SelectError::AmbiguousSelection`] when several rows do.
pub fn select_one<'a>(rows: &'a [Entity], key: &str, value: &Value) -> Result<Option<&'a Entity>> {
    let mut selected = select_all(rows, key, value);
    match selected.len() {
        0 | 1 => Ok(selected.pop()),
        count => Err(SelectError::AmbiguousSelection {
            key: key.to_string(),
            value: value.clone(),
            count,
        }),
    }
}
