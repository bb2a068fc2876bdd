//! English/Korean legacy layout.
//!
//! Tried in order: a top-level `Editions` array, a top-level `Products`
//! array, then a scan of the whole document for objects carrying `Name` or
//! `Id`.

use pvc_core::json::{find_all, first_str_ci, get_array_ci, get_ci, get_str_ci};
use pvc_core::text::{DEFAULT_SLUG, eq_ignore_case, slug};
use pvc_core::Product;
use serde_json::Value;
use tracing::debug;

use super::{display_name, latest_version, read_versions};

/// Edition that holds shared components rather than a product.
const COMMON_EDITION: &str = "Common";

pub(super) fn parse(root: &Value) -> Vec<Product> {
    if let Some(editions) = get_array_ci(root, "Editions") {
        return editions.iter().filter_map(edition).collect();
    }
    if let Some(products) = get_array_ci(root, "Products") {
        return products.iter().filter_map(product_entry).collect();
    }
    debug!("No Editions or Products array, scanning for product-like objects");
    find_all(root, |node| {
        get_ci(node, "Name").is_some() || get_ci(node, "Id").is_some()
    })
    .into_iter()
    .map(|visit| scanned(visit.node))
    .collect()
}

fn base_product(node: &Value, name: String) -> Product {
    let id = slug(first_str_ci(node, &["Id", "Name"]).unwrap_or(DEFAULT_SLUG));
    Product::new(id, name).with_description(get_str_ci(node, "Description").map(str::to_owned))
}

fn edition(node: &Value) -> Option<Product> {
    if !node.is_object() {
        return None;
    }
    let name = display_name(node, &["Name", "Title", "SKU", "Key"]);
    if eq_ignore_case(name.trim(), COMMON_EDITION) {
        debug!("Skipping Common edition");
        return None;
    }

    let mut product = base_product(node, name);
    match get_array_ci(node, "Versions") {
        Some(items) => product.versions = read_versions(items),
        None => product.versions.extend(latest_version(node, true)),
    }
    Some(product)
}

fn product_entry(node: &Value) -> Option<Product> {
    if !node.is_object() {
        return None;
    }
    let mut product = base_product(node, display_name(node, &["Name", "SKU", "Key"]));
    if let Some(items) = get_array_ci(node, "Versions") {
        product.versions = read_versions(items);
    }
    if product.versions.is_empty() {
        product.versions.extend(latest_version(node, false));
    }
    Some(product)
}

fn scanned(node: &Value) -> Product {
    let mut product = base_product(node, display_name(node, &["Name"]));
    match get_array_ci(node, "Versions") {
        Some(items) => product.versions = read_versions(items),
        None => product.versions.extend(latest_version(node, false)),
    }
    product
}

#[cfg(test)]
mod tests {
    use super::*;
    use pvc_core::VersionSource;
    use serde_json::json;

    #[test]
    fn test_editions_excludes_common() {
        let doc = json!({"Editions": [
            {"Name": "WinForms", "LatestVersion": "20251.1.710"},
            {"Name": "COMMON", "LatestVersion": "20251.1.710"},
            {"Name": "WPF", "LatestVersion": "20251.1.700"}
        ]});
        let names: Vec<_> = parse(&doc).into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["WinForms", "WPF"]);
    }

    #[test]
    fn test_editions_prefer_versions_array() {
        let doc = json!({"editions": [{
            "Id": "WinForms Edition",
            "Name": "WinForms",
            "Description": "Controls for WinForms",
            "LatestVersion": "ignored",
            "Versions": [
                {"Version": "20251.1.710", "DisplayVersion": "2025v1(710)"},
                {"FrameWorkVersions": "v8.0"},
                {"Version": "20243.2.655"}
            ]
        }]});
        let products = parse(&doc);
        assert_eq!(products.len(), 1);
        let product = &products[0];
        assert_eq!(product.id, "winforms-edition");
        assert_eq!(product.description.as_deref(), Some("Controls for WinForms"));

        let versions: Vec<_> = product
            .versions
            .iter()
            .map(|v| v.version.as_deref())
            .collect();
        assert_eq!(versions, [Some("20251.1.710"), Some("20243.2.655")]);
        assert!(product.versions.iter().all(|v| v.source == VersionSource::OldJson));
    }

    #[test]
    fn test_edition_name_fallbacks() {
        let doc = json!({"Editions": [
            {"Title": "Blazor"},
            {"SKU": "C1-STUDIO"},
            {"Key": "ent"},
            {"Name": " "}
        ]});
        let products = parse(&doc);
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Blazor", "C1-STUDIO", "ent", "Unnamed Product"]);
        // Without Id or Name the id falls back to the default slug.
        assert_eq!(products[0].id, "product");
    }

    #[test]
    fn test_edition_latest_version_copies_siblings() {
        let doc = json!({"Editions": [{
            "Name": "WinForms",
            "LatestVersion": "20251.1.710",
            "ToolBoxVersion": "20251.710",
            "C1LiveVersion": "20231.672",
            "FrameWorkVersions": "v8.0,v4.8",
            "DefaultCheckFrameWorks": "v8.0"
        }]});
        let version = &parse(&doc)[0].versions[0];
        assert_eq!(version.display_version.as_deref(), Some("2025v1(710)"));
        assert_eq!(version.tool_box_version.as_deref(), Some("20251.710"));
        assert_eq!(version.c1_live_version.as_deref(), Some("20231.672"));
        assert_eq!(version.framework_versions.as_deref(), Some("v8.0,v4.8"));
        assert_eq!(version.default_check_frameworks.as_deref(), Some("v8.0"));
    }

    #[test]
    fn test_products_fallback() {
        let doc = json!({"Products": [
            {"SKU": "Studio WPF", "Versions": [{"Version": "1.0"}]},
            {"Name": "MVC", "Versions": [], "LatestVersion": "20251.1.700"}
        ]});
        let products = parse(&doc);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Studio WPF");
        assert_eq!(products[0].versions[0].version.as_deref(), Some("1.0"));
        assert_eq!(products[1].id, "mvc");
        assert_eq!(products[1].versions[0].display_version.as_deref(), Some("2025v1(700)"));
    }

    #[test]
    fn test_scan_fallback_finds_nested_objects() {
        let doc = json!({
            "Catalog": {
                "Groups": [
                    {"Name": "Reports", "LatestVersion": "20251.1.710",
                     "Sub": {"Id": "viewer"}}
                ]
            }
        });
        let products = parse(&doc);
        let ids: Vec<_> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["reports", "viewer"]);
        assert_eq!(products[1].name, "Unnamed Product");
        assert_eq!(products[0].versions.len(), 1);
    }

    #[test]
    fn test_editions_not_array_falls_through() {
        let doc = json!({"Editions": {"Name": "x"}, "Products": [{"Name": "Grid"}]});
        let names: Vec<_> = parse(&doc).into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Grid"]);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn edition_name() -> impl Strategy<Value = String> {
            prop_oneof![
                "[A-Za-z][A-Za-z0-9 ]{0,20}",
                Just("Common".to_owned()),
                Just("COMMON".to_owned()),
                Just(" common ".to_owned()),
            ]
        }

        proptest! {
            /// Property: every edition except Common becomes a product, in order.
            #[test]
            fn editions_keep_all_but_common(names in proptest::collection::vec(edition_name(), 0..10)) {
                let editions: Vec<Value> = names.iter().map(|name| json!({"Name": name})).collect();
                let doc = json!({"Editions": editions});

                let parsed: Vec<String> = parse(&doc).into_iter().map(|p| p.name).collect();
                let expected: Vec<String> = names
                    .into_iter()
                    .filter(|name| !eq_ignore_case(name.trim(), COMMON_EDITION))
                    .collect();
                prop_assert_eq!(parsed, expected);
            }
        }
    }
}
