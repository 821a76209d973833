//! In-place field mutation applied before validation runs.
//!
//! Sanitizers transform a string field through a mutable accessor and are
//! a no-op when the accessor misses or the value is not a string.

use serde_json::Value;

/// Resolves one mutable field slot inside the request body.
pub type MutFieldAccessor = fn(&mut Value) -> Option<&mut Value>;

fn modify(body: &mut Value, accessor: MutFieldAccessor, modifier: impl Fn(&str) -> String) {
    if let Some(Value::String(s)) = accessor(body) {
        *s = modifier(s);
    }
}

/// Strips leading and trailing whitespace.
pub fn trim(body: &mut Value, accessor: MutFieldAccessor) {
    modify(body, accessor, |s| s.trim().to_string());
}

pub fn to_lower_case(body: &mut Value, accessor: MutFieldAccessor) {
    modify(body, accessor, str::to_lowercase);
}

pub fn to_upper_case(body: &mut Value, accessor: MutFieldAccessor) {
    modify(body, accessor, str::to_uppercase);
}
