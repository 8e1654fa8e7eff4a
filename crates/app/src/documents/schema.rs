//! Schema boundary between untyped documents and typed records.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::documents::{Document, DocumentSnapshot, DocumentStoreError};

/// Decode a snapshot into a typed record.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Malformed`] when the document does not match
/// the record's shape.
pub fn decode<T: DeserializeOwned>(snapshot: &DocumentSnapshot) -> Result<T, DocumentStoreError> {
    serde_json::from_value(Value::Object(snapshot.data.clone())).map_err(|source| {
        DocumentStoreError::Malformed {
            collection: snapshot.collection.clone(),
            id: snapshot.id.clone(),
            source,
        }
    })
}

/// Encode a typed record as a document body.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Encode`] when the record does not serialize
/// to a JSON object.
pub fn encode<T: Serialize>(record: &T) -> Result<Document, DocumentStoreError> {
    match serde_json::to_value(record)? {
        Value::Object(document) => Ok(document),
        other => Err(DocumentStoreError::Encode(serde::ser::Error::custom(
            format!("expected a JSON object, got {other}"),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Record {
        product_name: String,
        total_price: u64,
    }

    fn snapshot(data: Value) -> DocumentSnapshot {
        DocumentSnapshot {
            collection: "orders".to_string(),
            id: "o1".to_string(),
            data: data.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn decodes_matching_documents() -> TestResult {
        let record: Record = decode(&snapshot(json!({
            "productName": "Idli",
            "totalPrice": 60,
        })))?;

        assert_eq!(
            record,
            Record {
                product_name: "Idli".to_string(),
                total_price: 60
            }
        );

        Ok(())
    }

    #[test]
    fn malformed_documents_name_their_location() {
        let result = decode::<Record>(&snapshot(json!({ "productName": 12 })));

        assert!(
            matches!(
                &result,
                Err(DocumentStoreError::Malformed { collection, id, .. })
                    if collection == "orders" && id == "o1"
            ),
            "expected Malformed, got {result:?}"
        );
    }

    #[test]
    fn encodes_records_as_objects() -> TestResult {
        let document = encode(&Record {
            product_name: "Vada".to_string(),
            total_price: 30,
        })?;

        assert_eq!(document.get("productName"), Some(&json!("Vada")));

        Ok(())
    }

    #[test]
    fn rejects_non_object_records() {
        let result = encode(&42_u32);

        assert!(matches!(result, Err(DocumentStoreError::Encode(_))));
    }
}
