//! Total-result-count extraction.
//!
//! The search API has shipped the total under several shapes over time.
//! Extraction walks a fixed priority list of key paths; the first path that
//! both resolves through JSON objects and integer-coerces wins. A path that
//! resolves to a non-coercible value does not fail the extraction — the
//! next candidate is tried.

use serde_json::Value;

/// Candidate key paths into the response body, in priority order.
const TOTAL_PATHS: [&[&str]; 4] = [
    &["pagination", "total"],
    &["meta", "total"],
    &["data", "total"],
    &["total"],
];

/// Locates the total result count in a search response body.
///
/// Returns `None` when no candidate path yields a usable integer; callers
/// treat that as "total unknown" and fall back to the full-page heuristic.
#[must_use]
pub fn extract_total(body: &Value) -> Option<i64> {
    for path in TOTAL_PATHS {
        let Some(leaf) = resolve_path(body, path) else {
            continue;
        };
        if let Some(total) = coerce_int(leaf) {
            return Some(total);
        }
    }
    None
}

/// Follows `path` through nested JSON objects; `None` as soon as an
/// intermediate key is missing or a non-object is hit.
fn resolve_path<'a>(body: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = body;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// Lenient integer coercion: integers, floats (truncated toward zero),
/// booleans, and trimmed decimal strings.
#[allow(clippy::cast_possible_truncation)] // float totals truncate toward zero
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}
