use std::cmp::Ordering;

use serde_json::Value;

use crate::config::DocumentFilter;
use crate::document::{Document, node_display_name};

/// The container keys descended into, in order, at every level of nesting.
const CHILD_KEYS: [&str; 4] = ["resources", "methods", "responses", "body"];

/// Flattens the loader's per-path results into one ordered sequence and
/// sorts every node's `properties` collection.
///
/// Order is outer sequence first, then inner sequence. When a content filter
/// is configured, every flattened document is replaced by the filter's return
/// value before sorting.
pub(crate) fn normalize(
    nested: Vec<Vec<Document>>,
    content_filter: Option<&DocumentFilter>,
) -> Vec<Document> {
    let mut documents: Vec<Document> = nested.into_iter().flatten().collect();
    if let Some(filter) = content_filter {
        documents = documents.into_iter().map(|doc| filter(doc)).collect();
    }
    for document in &mut documents {
        walk(&mut document.0, &mut sort_properties);
    }
    documents
}

/// Recursive descent over [`CHILD_KEYS`], invoking `visit` at every node,
/// the top-level one included.
///
/// A child collection may be a sequence (`resources`, `methods`,
/// `responses`) or a mapping (`body` is keyed by media type); both are
/// descended into.
fn walk(node: &mut Value, visit: &mut impl FnMut(&mut Value)) {
    visit(node);
    for key in CHILD_KEYS {
        let Some(children) = node.get_mut(key) else {
            continue;
        };
        match children {
            Value::Array(items) => {
                for child in items {
                    walk(child, visit);
                }
            }
            Value::Object(entries) => {
                for child in entries.values_mut() {
                    walk(child, visit);
                }
            }
            _ => {}
        }
    }
}

/// Sorts the node's `properties` collection, or `items.properties` when the
/// node has no direct one, ascending by `displayName`.
///
/// Nodes carrying neither are left untouched; that is the expected case for
/// many node kinds, never an error.
fn sort_properties(node: &mut Value) {
    let properties = if node.get("properties").is_some() {
        node.get_mut("properties")
    } else {
        node.get_mut("items")
            .and_then(|items| items.get_mut("properties"))
    };
    let Some(Value::Array(properties)) = properties else {
        return;
    };
    properties.sort_by(|left, right| {
        collate(
            node_display_name(left).unwrap_or_default(),
            node_display_name(right).unwrap_or_default(),
        )
    });
}

/// Collation-style string comparison: case-insensitive, with a
/// case-sensitive tiebreak. Stable under `sort_by`, so entries without a
/// `displayName` keep their relative order.
fn collate(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        Document::from(value)
    }

    fn names(properties: &Value) -> Vec<&str> {
        properties
            .as_array()
            .expect("array")
            .iter()
            .map(|property| node_display_name(property).unwrap_or_default())
            .collect()
    }

    #[test]
    fn should_flatten_preserving_order() {
        let nested = vec![
            vec![doc(json!({"title": "a"})), doc(json!({"title": "b"}))],
            vec![doc(json!({"title": "c"}))],
        ];

        let flat = normalize(nested, None);

        let titles: Vec<_> = flat
            .iter()
            .map(|document| document.get("title").and_then(Value::as_str))
            .collect();
        assert_eq!(titles, vec![Some("a"), Some("b"), Some("c")]);
    }

    #[test]
    fn should_apply_the_content_filter_to_every_document() {
        use std::sync::Arc;

        let nested = vec![vec![doc(json!({"title": "a"})), doc(json!({"title": "b"}))]];
        let filter: DocumentFilter = Arc::new(|document: Document| {
            let mut value = document.into_value();
            if let Some(object) = value.as_object_mut() {
                object.insert("seen".to_string(), json!(true));
            }
            Document::from(value)
        });

        let flat = normalize(nested, Some(&filter));

        assert!(
            flat.iter()
                .all(|document| document.get("seen") == Some(&json!(true)))
        );
    }

    #[test]
    fn should_sort_properties_at_every_nesting_level() {
        let document = doc(json!({
            "properties": [
                {"displayName": "zebra"},
                {"displayName": "Ant"},
            ],
            "resources": [{
                "displayName": "Animals",
                "methods": [{
                    "method": "get",
                    "responses": [{
                        "code": "200",
                        "body": {
                            "application/json": {
                                "items": {
                                    "properties": [
                                        {"displayName": "banana"},
                                        {"displayName": "apple"},
                                    ],
                                },
                            },
                        },
                    }],
                }],
            }],
        }));

        let normalized = normalize(vec![vec![document]], None);

        let top = &normalized[0];
        assert_eq!(names(&top["properties"]), vec!["Ant", "zebra"]);
        let body_item =
            &top["resources"][0]["methods"][0]["responses"][0]["body"]["application/json"];
        assert_eq!(names(&body_item["items"]["properties"]), vec!["apple", "banana"]);
    }

    #[test]
    fn should_prefer_direct_properties_over_items() {
        let document = doc(json!({
            "properties": [
                {"displayName": "b"},
                {"displayName": "a"},
            ],
            "items": {
                "properties": [
                    {"displayName": "y"},
                    {"displayName": "x"},
                ],
            },
        }));

        let normalized = normalize(vec![vec![document]], None);

        let top = &normalized[0];
        assert_eq!(names(&top["properties"]), vec!["a", "b"]);
        // The items collection is only consulted when there is no direct one.
        assert_eq!(names(&top["items"]["properties"]), vec!["y", "x"]);
    }

    #[test]
    fn should_leave_nodes_without_properties_untouched() {
        let original = json!({
            "title": "no collections here",
            "resources": [{"displayName": "plain"}],
        });

        let normalized = normalize(vec![vec![doc(original.clone())]], None);

        assert_eq!(*normalized[0], original);
    }

    #[test]
    fn should_be_idempotent() {
        let document = doc(json!({
            "properties": [
                {"displayName": "b"},
                {"displayName": "B"},
                {"displayName": "a"},
            ],
        }));

        let once = normalize(vec![vec![document]], None);
        let twice = normalize(vec![once.clone()], None);

        assert_eq!(once, twice);
    }

    #[test]
    fn should_collate_case_insensitively() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Apple", "apple"), Ordering::Less);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }
}
