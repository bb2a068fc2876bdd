//! Helpers for navigating loosely-shaped catalog JSON.
//!
//! Catalog documents come from several generations of tooling and disagree on
//! key casing (`Versions` vs `versions`, `displayVersion` vs `DisplayVersion`)
//! and on nesting. Every reader goes through this module instead of indexing
//! [`Value`]s directly:
//!
//! - [`get_ci`] / [`get_str_ci`] - property lookup, exact match first, then a
//!   case-insensitive scan in document order
//! - [`walk`] - pre-order traversal with early exit
//! - [`find_all`] / [`find_first`] - predicate searches built on [`walk`]
//!
//! # Examples
//!
//! ```
//! use pvc_core::json::{find_all, get_str_ci, has_array_ci};
//! use serde_json::json;
//!
//! let doc = json!({"Section": {"name": "WPF", "versions": []}});
//! assert_eq!(get_str_ci(&doc["Section"], "Name"), Some("WPF"));
//!
//! let roots = find_all(&doc, |node| has_array_ci(node, "Versions"));
//! assert_eq!(roots.len(), 1);
//! assert_eq!(roots[0].key, Some("Section"));
//! ```

use std::ops::ControlFlow;

use serde_json::Value;

use crate::text::eq_ignore_case;

/// Looks up a property on a JSON object, ignoring key case.
///
/// An exact match wins; otherwise the first key (in document order) that
/// matches case-insensitively is used. Returns `None` for non-objects.
#[must_use]
pub fn get_ci<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    let object = value.as_object()?;
    if let Some(found) = object.get(name) {
        return Some(found);
    }
    object
        .iter()
        .find(|(key, _)| eq_ignore_case(key, name))
        .map(|(_, found)| found)
}

/// Looks up a string property, ignoring key case.
///
/// Properties that exist but hold a non-string value yield `None`.
#[must_use]
pub fn get_str_ci<'a>(value: &'a Value, name: &str) -> Option<&'a str> {
    get_ci(value, name).and_then(Value::as_str)
}

/// Looks up a string property and drops it when blank.
#[must_use]
pub fn get_non_blank_ci<'a>(value: &'a Value, name: &str) -> Option<&'a str> {
    get_str_ci(value, name).filter(|s| !s.trim().is_empty())
}

/// Returns the first non-blank string among several candidate property names.
#[must_use]
pub fn first_str_ci<'a>(value: &'a Value, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| get_non_blank_ci(value, name))
}

/// Looks up an array property, ignoring key case.
#[must_use]
pub fn get_array_ci<'a>(value: &'a Value, name: &str) -> Option<&'a Vec<Value>> {
    get_ci(value, name).and_then(Value::as_array)
}

/// Returns `true` if `value` is an object with an array-valued `name` property.
#[must_use]
pub fn has_array_ci(value: &Value, name: &str) -> bool {
    get_array_ci(value, name).is_some()
}

/// A node reached during a [`walk`].
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// The node itself.
    pub node: &'a Value,
    /// The nearest enclosing object key. Array items inherit the key of the
    /// array; the root has none.
    pub key: Option<&'a str>,
}

/// Walks a JSON tree in pre-order, calling `visitor` for every node.
///
/// Object properties are visited in document order. Returning
/// [`ControlFlow::Break`] from the visitor stops the walk immediately.
pub fn walk<'a, B>(
    root: &'a Value,
    visitor: &mut impl FnMut(Visit<'a>) -> ControlFlow<B>,
) -> ControlFlow<B> {
    walk_inner(root, None, visitor)
}

fn walk_inner<'a, B>(
    node: &'a Value,
    key: Option<&'a str>,
    visitor: &mut impl FnMut(Visit<'a>) -> ControlFlow<B>,
) -> ControlFlow<B> {
    visitor(Visit { node, key })?;

    match node {
        Value::Object(object) => {
            for (child_key, child) in object {
                walk_inner(child, Some(child_key.as_str()), visitor)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_inner(item, key, visitor)?;
            }
        }
        _ => {}
    }

    ControlFlow::Continue(())
}

/// Collects every node matching `predicate`, in pre-order.
///
/// Matching nodes are still descended into, so nested matches are reported too.
pub fn find_all<'a>(root: &'a Value, predicate: impl Fn(&'a Value) -> bool) -> Vec<Visit<'a>> {
    let mut found = Vec::new();
    let _ = walk::<()>(root, &mut |visit| {
        if predicate(visit.node) {
            found.push(visit);
        }
        ControlFlow::Continue(())
    });
    found
}

/// Returns the first node (in pre-order, starting with `root` itself)
/// matching `predicate`.
pub fn find_first<'a>(root: &'a Value, predicate: impl Fn(&'a Value) -> bool) -> Option<Visit<'a>> {
    match walk(root, &mut |visit| {
        if predicate(visit.node) {
            ControlFlow::Break(visit)
        } else {
            ControlFlow::Continue(())
        }
    }) {
        ControlFlow::Break(visit) => Some(visit),
        ControlFlow::Continue(()) => None,
    }
}
