//! Post assembly for OAM publications.

use crate::config::{AppConfig, LedgerConfig};
use crate::post::permalink;
use crate::post::types::{Post, PostError, PostMetadata, PublishItem};

/// Builds ledger posts from uploaded items.
#[derive(Debug, Clone)]
pub struct PostGenerator {
    app_version: String,
    parent_permlink: String,
}

impl PostGenerator {
    pub fn new(app_version: impl Into<String>, parent_permlink: impl Into<String>) -> Self {
        Self {
            app_version: app_version.into(),
            parent_permlink: parent_permlink.into(),
        }
    }

    pub fn from_config(app: &AppConfig, ledger: &LedgerConfig) -> Self {
        Self::new(app.version.clone(), ledger.parent_permlink.clone())
    }

    /// Generate a post with a freshly drawn permalink token.
    pub fn generate(&self, author: &str, item: &PublishItem) -> Result<Post, PostError> {
        self.generate_with_token(author, item, &permalink::random_token())
    }

    /// Generate a post using the given permalink token.
    ///
    /// The item must already carry its `url` and `storage_date`.
    pub fn generate_with_token(
        &self,
        author: &str,
        item: &PublishItem,
        token: &str,
    ) -> Result<Post, PostError> {
        let url = item
            .url
            .as_deref()
            .ok_or_else(|| PostError::MissingUrl(item.filename.clone()))?;
        let storage_date = item
            .storage_date
            .as_deref()
            .ok_or_else(|| PostError::MissingStorageDate(item.filename.clone()))?;

        let permlink = permalink::permalink(token, &item.title);

        let metadata = PostMetadata {
            issuer_name: item.issuer_name.clone(),
            home_member_state: item.home_member_state.clone(),
            identifier_id: item.identifier_id.clone(),
            identifier_value: item.identifier_value.clone(),
            subclass: item.subclass.clone(),
            disclosure_date: item.disclosure_date.clone(),
            submission_date: item.submission_date.clone(),
            document_language: item.document_language.clone(),
            comment: item.title.clone(),
            financial_year: item.financial_year.clone(),
            type_submission: item.type_submission.clone(),
            tags: vec![
                item.subclass_tag.clone(),
                item.issuer_name.clone(),
                item.home_member_state.clone(),
                item.identifier_value.clone(),
            ],
            storage_date: storage_date.to_string(),
            permlink: permlink.clone(),
            app: self.app_version.clone(),
        };

        Ok(Post {
            parent_author: String::new(),
            parent_permlink: self.parent_permlink.clone(),
            author: author.to_string(),
            permlink,
            title: item.title.clone(),
            body: format!("[[pdf link]]({})", url),
            json_metadata: serde_json::to_string(&metadata)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploaded_item() -> PublishItem {
        PublishItem {
            filename: "report.pdf".into(),
            title: "Annual Financial Report 2018".into(),
            issuer_name: "ACME SA".into(),
            home_member_state: "LU".into(),
            identifier_id: "1".into(),
            identifier_value: "5299001XJ3Q2B6OXUL42".into(),
            subclass: "1.1".into(),
            disclosure_date: "2019-04-30".into(),
            submission_date: "2019-04-30".into(),
            document_language: "en".into(),
            financial_year: "2018".into(),
            type_submission: "original".into(),
            subclass_tag: "annual-financial-report".into(),
            url: Some("https://img.example.org/DQmXyz/report.pdf".into()),
            storage_date: Some("2019-05-01T10:00:00".into()),
        }
    }

    fn generator() -> PostGenerator {
        PostGenerator::new("oam-publisher/test", "oam")
    }

    #[test]
    fn test_post_fields() {
        let post = generator()
            .generate_with_token("acme", &uploaded_item(), "k3x9q1")
            .unwrap();

        assert_eq!(post.author, "acme");
        assert_eq!(post.parent_author, "");
        assert_eq!(post.parent_permlink, "oam");
        assert_eq!(post.permlink, "k3x9q1-annual-financial-report-2018");
        assert_eq!(post.title, "Annual Financial Report 2018");
        assert_eq!(post.body, "[[pdf link]](https://img.example.org/DQmXyz/report.pdf)");
    }

    #[test]
    fn test_metadata_blob() {
        let post = generator()
            .generate_with_token("acme", &uploaded_item(), "k3x9q1")
            .unwrap();
        let metadata: PostMetadata = serde_json::from_str(&post.json_metadata).unwrap();

        assert_eq!(metadata.comment, "Annual Financial Report 2018");
        assert_eq!(
            metadata.tags,
            vec!["annual-financial-report", "ACME SA", "LU", "5299001XJ3Q2B6OXUL42"]
        );
        assert_eq!(metadata.storage_date, "2019-05-01T10:00:00");
        assert_eq!(metadata.permlink, post.permlink);
        assert_eq!(metadata.app, "oam-publisher/test");
    }

    #[test]
    fn test_metadata_key_order() {
        let post = generator()
            .generate_with_token("acme", &uploaded_item(), "k3x9q1")
            .unwrap();
        assert!(post.json_metadata.starts_with(r#"{"issuer_name":"ACME SA","home_member_state":"LU""#));
        assert!(post.json_metadata.ends_with(r#""app":"oam-publisher/test"}"#));
    }

    #[test]
    fn test_body_contains_url_verbatim() {
        let mut item = uploaded_item();
        item.url = Some("https://img.example.org/a b/(weird)?x=1&y=2".into());
        let post = generator().generate("acme", &item).unwrap();
        assert!(post.body.contains("https://img.example.org/a b/(weird)?x=1&y=2"));
    }

    #[test]
    fn test_missing_url() {
        let mut item = uploaded_item();
        item.url = None;
        let err = generator().generate("acme", &item).unwrap_err();
        assert!(matches!(err, PostError::MissingUrl(ref f) if f == "report.pdf"));
    }

    #[test]
    fn test_missing_storage_date() {
        let mut item = uploaded_item();
        item.storage_date = None;
        let err = generator().generate("acme", &item).unwrap_err();
        assert!(matches!(err, PostError::MissingStorageDate(_)));
    }

    #[test]
    fn test_random_tokens_differ_between_posts() {
        let item = uploaded_item();
        let a = generator().generate("acme", &item).unwrap();
        let b = generator().generate("acme", &item).unwrap();
        assert!(a.permlink.ends_with("-annual-financial-report-2018"));
        // 36^6 possible tokens
        assert_ne!(a.permlink, b.permlink);
    }
}
