//! Data API command envelopes
//!
//! Request bodies for the document-oriented API. Each body is a single-key
//! object naming the operation, e.g. `{"find": {...}}`.

use serde::Serialize;
use serde_json::Value;

/// A Data API operation, serialized as `{"<operation>": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentCommand {
    Find(FindCommand),
    InsertOne(InsertOneCommand),
    FindOneAndUpdate(FindOneAndUpdateCommand),
}

/// Caller-facing options of a `find`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Sort document, e.g. `{"created_at": -1}`
    pub sort: Option<Value>,
    pub limit: Option<u32>,
    pub skip: Option<u32>,
}

impl FindOptions {
    pub fn sort(mut self, sort: Value) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }
}

/// Body of `{"find": ...}`. Sort sits beside the filter; paging goes into
/// `options`, which is left out entirely when empty.
#[derive(Debug, Clone, Serialize)]
pub struct FindCommand {
    pub filter: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Value>,
    #[serde(skip_serializing_if = "PageOptions::is_empty")]
    pub options: PageOptions,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
}

impl PageOptions {
    fn is_empty(&self) -> bool {
        self.limit.is_none() && self.skip.is_none()
    }
}

impl FindCommand {
    pub fn new(filter: Value, options: FindOptions) -> Self {
        Self {
            filter,
            sort: options.sort,
            options: PageOptions {
                limit: options.limit,
                skip: options.skip,
            },
        }
    }
}

/// Body of `{"insertOne": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct InsertOneCommand {
    pub document: Value,
}

/// Body of `{"findOneAndUpdate": ...}`; always applies `$set` and asks for
/// the document as it looks after the update.
#[derive(Debug, Clone, Serialize)]
pub struct FindOneAndUpdateCommand {
    pub filter: Value,
    pub update: SetUpdate,
    pub options: UpdateOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetUpdate {
    #[serde(rename = "$set")]
    pub set: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOptions {
    pub return_document: &'static str,
}

impl FindOneAndUpdateCommand {
    pub fn new(filter: Value, set: Value) -> Self {
        Self {
            filter,
            update: SetUpdate { set },
            options: UpdateOptions {
                return_document: "after",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_envelope_full() {
        let options = FindOptions::default()
            .sort(json!({"created_at": -1}))
            .limit(1000)
            .skip(20);
        let cmd = DocumentCommand::Find(FindCommand::new(json!({"outlet_id": "o1"}), options));

        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({
                "find": {
                    "filter": {"outlet_id": "o1"},
                    "sort": {"created_at": -1},
                    "options": {"limit": 1000, "skip": 20}
                }
            })
        );
    }

    #[test]
    fn test_find_envelope_minimal() {
        let cmd = DocumentCommand::Find(FindCommand::new(json!({"code": "A"}), FindOptions::default()));

        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({"find": {"filter": {"code": "A"}}})
        );
    }

    #[test]
    fn test_insert_one_envelope() {
        let cmd = DocumentCommand::InsertOne(InsertOneCommand {
            document: json!({"_id": "x", "total": 5}),
        });

        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({"insertOne": {"document": {"_id": "x", "total": 5}}})
        );
    }

    #[test]
    fn test_find_one_and_update_envelope() {
        let cmd = DocumentCommand::FindOneAndUpdate(FindOneAndUpdateCommand::new(
            json!({"code": "A"}),
            json!({"used": true}),
        ));

        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({
                "findOneAndUpdate": {
                    "filter": {"code": "A"},
                    "update": {"$set": {"used": true}},
                    "options": {"returnDocument": "after"}
                }
            })
        );
    }
}
