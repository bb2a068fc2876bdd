//! Japanese legacy layout.
//!
//! Products sit under one of several container keys, either as an array or
//! as an object keyed by product name. Documents without a known container
//! are scanned for any object holding a `Versions` array.

use pvc_core::json::{
    Visit, find_all, find_first, first_str_ci, get_array_ci, get_ci, get_str_ci, has_array_ci,
};
use pvc_core::text::{is_blank, slug};
use pvc_core::Product;
use serde_json::Value;
use tracing::debug;

use super::read_versions;

/// Container keys, highest priority first.
const CONTAINER_KEYS: [&str; 5] = ["Products", "Editions", "製品", "プロダクト", "項目"];

pub(super) fn parse(root: &Value) -> Vec<Product> {
    for key in CONTAINER_KEYS {
        match get_ci(root, key) {
            Some(Value::Array(items)) => {
                return items.iter().filter_map(|item| from_node(item, None)).collect();
            }
            Some(Value::Object(entries)) => {
                return entries
                    .iter()
                    .filter_map(|(name, item)| from_node(item, Some(name.as_str())))
                    .collect();
            }
            _ => {}
        }
    }

    debug!("No known container key, scanning for versions arrays");
    find_all(root, |node| has_array_ci(node, "Versions"))
        .into_iter()
        .map(scanned)
        .collect()
}

/// Builds a product from a container element.
///
/// The element must hold a `Versions` array itself or somewhere below it; in
/// the latter case the first nested holder becomes the product node.
fn from_node(node: &Value, preferred_name: Option<&str>) -> Option<Product> {
    let node = match get_ci(node, "Versions") {
        Some(Value::Array(_)) => node,
        Some(_) => return None,
        None => find_first(node, |n| has_array_ci(n, "Versions"))?.node,
    };

    let name = preferred_name
        .filter(|s| !is_blank(s))
        .or_else(|| first_str_ci(node, &["Name", "Title", "製品名"]))
        .unwrap_or(Product::UNNAMED);

    Some(build(node, name))
}

/// Builds a product from a scanned object; the enclosing key names it when
/// the object has no `Name` or `Title`.
fn scanned(visit: Visit<'_>) -> Product {
    let name = first_str_ci(visit.node, &["Name", "Title"])
        .or(visit.key.filter(|s| !is_blank(s)))
        .unwrap_or(Product::UNNAMED);
    build(visit.node, name)
}

fn build(node: &Value, name: &str) -> Product {
    let id = slug(first_str_ci(node, &["Id"]).unwrap_or(name));
    let description = get_str_ci(node, "Description")
        .or_else(|| get_str_ci(node, "説明"))
        .map(str::to_owned);

    let mut product = Product::new(id, name).with_description(description);
    if let Some(items) = get_array_ci(node, "Versions") {
        product.versions = read_versions(items);
    }
    product
}
