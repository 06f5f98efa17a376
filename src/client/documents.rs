//! Document API
//!
//! `find`, `insertOne` and `findOneAndUpdate` against a collection of the
//! Data API. Reads are never cached; writes invalidate the collection's
//! cached row-API views.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::facade::{decode, RemoteClient};
use crate::client::http::HttpMethod;
use crate::error::{ClientError, Result};
use crate::models::commands::{
    DocumentCommand, FindCommand, FindOneAndUpdateCommand, FindOptions, InsertOneCommand,
};
use crate::normalize::{as_string, extract_documents, CanonicalRow};

impl RemoteClient {
    // == Find ==
    /// Returns the documents of `collection` matching `filter`.
    pub async fn find(
        &self,
        collection: &str,
        filter: Value,
        options: FindOptions,
    ) -> Result<Vec<CanonicalRow>> {
        let command = DocumentCommand::Find(FindCommand::new(filter, options));
        let body = self.run_command(collection, &command).await?;
        let documents = extract_documents(&body);
        debug!(collection, found = documents.len(), "find completed");
        Ok(documents)
    }

    // == Insert One ==
    /// Inserts `document` and returns the ids the store reports as inserted.
    pub async fn insert_one<D>(&self, collection: &str, document: &D) -> Result<Vec<String>>
    where
        D: Serialize + ?Sized,
    {
        let document =
            serde_json::to_value(document).map_err(|e| ClientError::Serialization(e.to_string()))?;
        let command = DocumentCommand::InsertOne(InsertOneCommand { document });
        let body = self.run_command(collection, &command).await?;
        self.invalidate_resource(collection);

        let ids = body
            .pointer("/status/insertedIds")
            .and_then(Value::as_array)
            .map(|ids| ids.iter().map(as_string).collect())
            .unwrap_or_default();
        Ok(ids)
    }

    // == Find One And Update ==
    /// Applies `$set: set` to the first document matching `filter` and
    /// returns it as it looks after the update, if one matched.
    pub async fn find_one_and_update(
        &self,
        collection: &str,
        filter: Value,
        set: Value,
    ) -> Result<Option<CanonicalRow>> {
        let command = DocumentCommand::FindOneAndUpdate(FindOneAndUpdateCommand::new(filter, set));
        let body = self.run_command(collection, &command).await?;
        self.invalidate_resource(collection);

        Ok(body
            .pointer("/data/document")
            .and_then(Value::as_object)
            .cloned())
    }

    async fn run_command(&self, collection: &str, command: &DocumentCommand) -> Result<Value> {
        let path = format!("/{}", collection.trim_matches('/'));
        let response = self
            .documents
            .execute(HttpMethod::Post, &path, Some(command))
            .await?;
        debug!(%path, status = response.status, "document command answered");
        decode(&response.body, &format!("POST {}", path))
    }
}
