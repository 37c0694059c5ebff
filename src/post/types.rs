//! Publication records: the caller's item, the derived post and its metadata blob.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// One document to publish, as described by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishItem {
    /// Path of the file to upload.
    pub filename: String,
    pub title: String,
    #[serde(default)]
    pub issuer_name: String,
    #[serde(default)]
    pub home_member_state: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub identifier_id: String,
    #[serde(default)]
    pub identifier_value: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub subclass: String,
    #[serde(default)]
    pub disclosure_date: String,
    #[serde(default)]
    pub submission_date: String,
    #[serde(default)]
    pub document_language: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub financial_year: String,
    #[serde(default)]
    pub type_submission: String,
    #[serde(default, rename = "subclassTag", alias = "subclass_tag")]
    pub subclass_tag: String,

    /// Retrieval URL, filled in after upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Batch timestamp, filled in before post assembly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_date: Option<String>,
}

/// Hand-written JSON often carries years and ids as bare numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// A `comment` ledger operation payload.
///
/// Field order matches the ledger's binary serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub parent_author: String,
    pub parent_permlink: String,
    pub author: String,
    pub permlink: String,
    pub title: String,
    pub body: String,
    /// Serialized [`PostMetadata`].
    pub json_metadata: String,
}

/// Structured metadata attached to every publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetadata {
    pub issuer_name: String,
    pub home_member_state: String,
    pub identifier_id: String,
    pub identifier_value: String,
    pub subclass: String,
    pub disclosure_date: String,
    pub submission_date: String,
    pub document_language: String,
    /// The item title.
    pub comment: String,
    pub financial_year: String,
    pub type_submission: String,
    pub tags: Vec<String>,
    pub storage_date: String,
    pub permlink: String,
    pub app: String,
}

/// Errors raised while assembling a post.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("item '{0}' has no uploaded url")]
    MissingUrl(String),

    #[error("item '{0}' has no storage date")]
    MissingStorageDate(String),

    #[error("metadata serialization failed: {0}")]
    Metadata(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_accepts_numeric_ids_and_camel_case_tag() {
        let item: PublishItem = serde_json::from_str(
            r#"{
                "filename": "report.pdf",
                "title": "Annual Report 2018",
                "issuer_name": "ACME SA",
                "home_member_state": "LU",
                "identifier_id": 1,
                "identifier_value": "5299001XJ3Q2B6OXUL42",
                "subclass": "1.1",
                "financial_year": 2018,
                "subclassTag": "annual-financial-report"
            }"#,
        )
        .unwrap();

        assert_eq!(item.identifier_id, "1");
        assert_eq!(item.financial_year, "2018");
        assert_eq!(item.subclass_tag, "annual-financial-report");
        assert_eq!(item.document_language, "");
        assert!(item.url.is_none());
    }

    #[test]
    fn test_item_accepts_snake_case_tag() {
        let item: PublishItem =
            serde_json::from_str(r#"{"filename":"a.pdf","title":"A","subclass_tag":"tag"}"#).unwrap();
        assert_eq!(item.subclass_tag, "tag");
    }
}
