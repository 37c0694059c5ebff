//! Concurrent loading of the reference dictionaries.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

use crate::config::DictionaryConfig;
use crate::dictionary::types::{
    ClassEntry, ClassKind, DocClass, Dictionary, HomeMemberState,
};
use crate::observability::metrics;

/// Errors raised while fetching one dictionary resource.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{resource}: request failed: {source}")]
    Request {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{resource}: HTTP {status}")]
    Status { resource: &'static str, status: u16 },

    #[error("{resource}: invalid JSON: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Client for the static dictionary CDN.
#[derive(Debug, Clone)]
pub struct DictionaryClient {
    config: DictionaryConfig,
    http: reqwest::Client,
}

impl DictionaryClient {
    pub fn new(config: DictionaryConfig) -> Result<Self, DictionaryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(DictionaryError::Client)?;
        Ok(Self { config, http })
    }

    fn resource_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn fetch<T: DeserializeOwned>(&self, resource: &'static str, path: &str) -> Result<T, DictionaryError> {
        let url = self.resource_url(path);
        let result = async {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|source| DictionaryError::Request { resource, source })?;

            let status = response.status();
            if !status.is_success() {
                return Err(DictionaryError::Status {
                    resource,
                    status: status.as_u16(),
                });
            }

            let body = response
                .text()
                .await
                .map_err(|source| DictionaryError::Request { resource, source })?;
            serde_json::from_str(&body).map_err(|source| DictionaryError::Decode { resource, source })
        }
        .await;

        metrics::record_dictionary_fetch(resource, result.is_ok());
        match &result {
            Ok(_) => tracing::debug!(resource, url = %url, "Dictionary loaded"),
            Err(e) => tracing::warn!(resource, url = %url, error = %e, "Dictionary failed to load"),
        }
        result
    }

    /// Fetch all four resources concurrently.
    ///
    /// A failing resource leaves its slot empty and its error recorded;
    /// the others are unaffected.
    pub async fn load(&self) -> Dictionary {
        let (home_member_states, languages, identifiers, doc_classes) = tokio::join!(
            self.fetch::<Vec<HomeMemberState>>("home_member_states", &self.config.home_member_states),
            self.fetch::<Vec<Value>>("languages", &self.config.languages),
            self.fetch::<Map<String, Value>>("identifiers", &self.config.identifiers),
            self.fetch::<Vec<DocClass>>("doc_classes", &self.config.class_tree),
        );

        let mut dictionary = Dictionary::default();

        match home_member_states {
            Ok(mut states) => {
                label_home_member_states(&mut states);
                dictionary.home_member_states = states;
            }
            Err(e) => dictionary.errors.home_member_states = Some(e.to_string()),
        }

        match languages {
            Ok(languages) => dictionary.languages = languages,
            Err(e) => dictionary.errors.languages = Some(e.to_string()),
        }

        match identifiers {
            Ok(identifiers) => dictionary.identifiers = identifiers,
            Err(e) => dictionary.errors.identifiers = Some(e.to_string()),
        }

        match doc_classes {
            Ok(mut classes) => {
                index_class_tree(&mut classes, &mut dictionary);
                dictionary.doc_classes = classes;
            }
            Err(e) => dictionary.errors.doc_classes = Some(e.to_string()),
        }

        dictionary
    }
}

/// Set `label = "{code} - {country}"` on every entry.
pub fn label_home_member_states(states: &mut [HomeMemberState]) {
    for state in states {
        state.label = format!("{} - {}", state.code, state.country);
    }
}

/// Number and label the class tree, then fill the flattened list and the
/// subclass tag/label maps of `dictionary`.
///
/// Classes are numbered `"1."`, `"2."`, ...; subclasses `"1.1."`, `"1.2."`, ...
pub fn index_class_tree(classes: &mut [DocClass], dictionary: &mut Dictionary) {
    for (i, class) in classes.iter_mut().enumerate() {
        class.number = format!("{}.", i + 1);
        class.kind = ClassKind::Class;
        class.label = format!("{} {}", class.number, class.name);
        dictionary.class_entries.push(ClassEntry {
            id: class.id.clone(),
            name: class.name.clone(),
            number: class.number.clone(),
            kind: ClassKind::Class,
            label: class.label.clone(),
        });

        for (j, subclass) in class.subclass.iter_mut().enumerate() {
            subclass.number = format!("{}.{}.", i + 1, j + 1);
            subclass.kind = ClassKind::Subclass;
            subclass.label = format!("{} {}", subclass.number, subclass.name);
            dictionary.class_entries.push(ClassEntry {
                id: subclass.id.clone(),
                name: subclass.name.clone(),
                number: subclass.number.clone(),
                kind: ClassKind::Subclass,
                label: subclass.label.clone(),
            });

            dictionary
                .class_tags
                .insert(subclass.id.clone(), subclass.tag.clone());
            dictionary
                .class_labels
                .insert(subclass.id.clone(), subclass.label.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Vec<DocClass> {
        serde_json::from_str(
            r#"[
                {"id": 1, "name": "Periodic regulated information", "subclass": [
                    {"id": 11, "name": "Annual financial report", "tag": "annual-financial-report"},
                    {"id": 12, "name": "Half-yearly report", "tag": "half-yearly-report"}
                ]},
                {"id": 2, "name": "Ongoing regulated information", "subclass": [
                    {"id": "21", "name": "Inside information", "tag": "inside-information"}
                ]}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_index_class_tree_numbers_and_labels() {
        let mut classes = tree();
        let mut dictionary = Dictionary::default();
        index_class_tree(&mut classes, &mut dictionary);

        assert_eq!(classes[0].label, "1. Periodic regulated information");
        assert_eq!(classes[0].subclass[1].number, "1.2.");
        assert_eq!(classes[1].subclass[0].label, "2.1. Inside information");
        assert_eq!(classes[1].subclass[0].kind, ClassKind::Subclass);
    }

    #[test]
    fn test_index_class_tree_flattens_in_order() {
        let mut classes = tree();
        let mut dictionary = Dictionary::default();
        index_class_tree(&mut classes, &mut dictionary);

        let numbers: Vec<&str> = dictionary.class_entries.iter().map(|e| e.number.as_str()).collect();
        assert_eq!(numbers, vec!["1.", "1.1.", "1.2.", "2.", "2.1."]);
        assert_eq!(dictionary.class_entries[3].kind, ClassKind::Class);
    }

    #[test]
    fn test_index_class_tree_maps() {
        let mut classes = tree();
        let mut dictionary = Dictionary::default();
        index_class_tree(&mut classes, &mut dictionary);

        assert_eq!(dictionary.class_tags.len(), 3);
        assert_eq!(dictionary.class_tags["11"], "annual-financial-report");
        assert_eq!(dictionary.class_tags["21"], "inside-information");
        assert_eq!(dictionary.class_labels["12"], "1.2. Half-yearly report");
        assert!(!dictionary.class_tags.contains_key("1"));
    }

    #[test]
    fn test_label_home_member_states() {
        let mut states: Vec<HomeMemberState> = serde_json::from_str(
            r#"[{"code": "LU", "country": "Luxembourg"}, {"code": "FR", "country": "France", "eu": true}]"#,
        )
        .unwrap();
        label_home_member_states(&mut states);

        assert_eq!(states[0].label, "LU - Luxembourg");
        assert_eq!(states[1].label, "FR - France");
        assert_eq!(states[1].extra["eu"], true);
    }

    #[test]
    fn test_resource_url_joins_cleanly() {
        let client = DictionaryClient::new(DictionaryConfig {
            base_url: "https://cdn.example.org/dict/".into(),
            ..DictionaryConfig::default()
        })
        .unwrap();
        assert_eq!(client.resource_url("/lang.json"), "https://cdn.example.org/dict/lang.json");
    }

    #[tokio::test]
    async fn test_unreachable_cdn_fills_every_error_slot() {
        let client = DictionaryClient::new(DictionaryConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..DictionaryConfig::default()
        })
        .unwrap();

        let dictionary = client.load().await;
        assert_eq!(dictionary.errors.count(), 4);
        assert!(dictionary.home_member_states.is_empty());
        assert!(dictionary.class_entries.is_empty());
    }
}
