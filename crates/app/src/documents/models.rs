//! Document Models

use std::cmp::Ordering;

use serde_json::{Map, Value};

/// Untyped document body: a JSON object.
pub type Document = Map<String, Value>;

/// A document read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    /// Collection the document lives in.
    pub collection: String,

    /// Document id, unique within its collection.
    pub id: String,

    /// Document body.
    pub data: Document,
}

/// Sort direction for [`Query::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first.
    Ascending,

    /// Largest first.
    Descending,
}

/// Equality filters plus an optional single ordering over one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    collection: String,
    filters: Vec<(String, Value)>,
    order_by: Option<(String, Direction)>,
}

impl Query {
    /// Query every document in `collection`.
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            order_by: None,
        }
    }

    /// Keep only documents whose top-level `field` equals `value`.
    #[must_use]
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Order results by a top-level field. Documents lacking the field sort last.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    /// Target collection.
    #[must_use]
    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    /// Equality filters, in the order they were added.
    #[must_use]
    pub fn filters(&self) -> &[(String, Value)] {
        &self.filters
    }

    /// Requested ordering, if any.
    #[must_use]
    pub fn ordering(&self) -> Option<(&str, Direction)> {
        self.order_by
            .as_ref()
            .map(|(field, direction)| (field.as_str(), *direction))
    }

    /// Whether `document` passes every filter.
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        self.filters
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }

    /// Sort snapshots according to the requested ordering.
    pub fn sort(&self, snapshots: &mut [DocumentSnapshot]) {
        let Some((field, direction)) = self.ordering() else {
            return;
        };

        snapshots.sort_by(|a, b| {
            match (a.data.get(field), b.data.get(field)) {
                (Some(left), Some(right)) => match direction {
                    Direction::Ascending => compare_values(left, right),
                    Direction::Descending => compare_values(right, left),
                },
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| a.id.cmp(&b.id))
        });
    }

    /// Filters as a single JSON object, for containment matching.
    #[must_use]
    pub fn filter_object(&self) -> Document {
        self.filters.iter().cloned().collect()
    }
}

/// Total order over JSON values: null, booleans, numbers, strings, then
/// everything else by its serialized form.
fn compare_values(left: &Value, right: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a
                .as_f64()
                .unwrap_or_default()
                .total_cmp(&b.as_f64().unwrap_or_default()),
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => rank(left)
            .cmp(&rank(right))
            .then_with(|| left.to_string().cmp(&right.to_string())),
    }
}

/// One staged write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOperation {
    /// Create or overwrite a document.
    Set {
        /// Target collection.
        collection: String,

        /// Document id.
        id: String,

        /// New document body.
        data: Document,

        /// Field to stamp with the store's clock, in milliseconds since the
        /// Unix epoch.
        server_timestamp: Option<String>,
    },

    /// Merge top-level fields into an existing document.
    Update {
        /// Target collection.
        collection: String,

        /// Document id.
        id: String,

        /// Fields to replace.
        fields: Document,
    },

    /// Remove a document.
    Delete {
        /// Target collection.
        collection: String,

        /// Document id.
        id: String,
    },
}

/// Ordered list of writes applied all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    operations: Vec<WriteOperation>,
}

impl WriteBatch {
    /// Empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a create-or-overwrite.
    pub fn set(&mut self, collection: &str, id: &str, data: Document) -> &mut Self {
        self.operations.push(WriteOperation::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            data,
            server_timestamp: None,
        });
        self
    }

    /// Stage a create-or-overwrite whose `field` is stamped with the server
    /// timestamp when the batch commits.
    pub fn set_stamped(
        &mut self,
        collection: &str,
        id: &str,
        data: Document,
        field: &str,
    ) -> &mut Self {
        self.operations.push(WriteOperation::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            data,
            server_timestamp: Some(field.to_string()),
        });
        self
    }

    /// Stage a field update.
    pub fn update(&mut self, collection: &str, id: &str, fields: Document) -> &mut Self {
        self.operations.push(WriteOperation::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            fields,
        });
        self
    }

    /// Stage a removal.
    pub fn delete(&mut self, collection: &str, id: &str) -> &mut Self {
        self.operations.push(WriteOperation::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        self
    }

    /// Staged writes, in order.
    #[must_use]
    pub fn operations(&self) -> &[WriteOperation] {
        &self.operations
    }

    /// Number of staged writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl IntoIterator for WriteBatch {
    type Item = WriteOperation;
    type IntoIter = std::vec::IntoIter<WriteOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn snapshot(id: &str, data: Value) -> DocumentSnapshot {
        DocumentSnapshot {
            collection: "orders".to_string(),
            id: id.to_string(),
            data: data.as_object().cloned().unwrap_or_default(),
        }
    }

    fn ids(snapshots: &[DocumentSnapshot]) -> Vec<&str> {
        snapshots.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn filters_match_on_equal_top_level_fields() {
        let query = Query::collection("orders").where_eq("userId", "u1");

        assert!(query.matches(&snapshot("a", json!({ "userId": "u1" })).data));
        assert!(!query.matches(&snapshot("b", json!({ "userId": "u2" })).data));
        assert!(!query.matches(&snapshot("c", json!({})).data));
    }

    #[test]
    fn descending_order_puts_missing_fields_last() {
        let query = Query::collection("orders").order_by("placedAt", Direction::Descending);

        let mut snapshots = vec![
            snapshot("a", json!({ "placedAt": 10 })),
            snapshot("b", json!({})),
            snapshot("c", json!({ "placedAt": 30 })),
            snapshot("d", json!({ "placedAt": 20 })),
        ];

        query.sort(&mut snapshots);

        assert_eq!(ids(&snapshots), vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn ascending_order_compares_numbers_numerically() {
        let query = Query::collection("orders").order_by("total", Direction::Ascending);

        let mut snapshots = vec![
            snapshot("a", json!({ "total": 100 })),
            snapshot("b", json!({ "total": 9 })),
            snapshot("c", json!({ "total": 25.5 })),
        ];

        query.sort(&mut snapshots);

        assert_eq!(ids(&snapshots), vec!["b", "c", "a"]);
    }

    #[test]
    fn batch_keeps_operations_in_order() {
        let mut batch = WriteBatch::new();

        batch
            .set("orders", "1", Document::new())
            .update("orders", "1", Document::new())
            .delete("carts", "u1");

        assert_eq!(batch.len(), 3);
        assert!(matches!(
            batch.operations(),
            [
                WriteOperation::Set { .. },
                WriteOperation::Update { .. },
                WriteOperation::Delete { .. }
            ]
        ));
    }
}
