//! Reference dictionary types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::post::types::string_or_number;

/// A country entry of the home member state list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeMemberState {
    pub code: String,
    pub country: String,
    /// `"{code} - {country}"`, filled in after loading.
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Whether a class tree node is a top-level class or one of its subclasses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Subclass,
}

/// A document subclass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSubclass {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    /// Tag attached to posts filed under this subclass.
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub number: String,
    #[serde(default = "subclass_kind", rename = "type")]
    pub kind: ClassKind,
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn subclass_kind() -> ClassKind {
    ClassKind::Subclass
}

/// A document class with its subclasses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocClass {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subclass: Vec<DocSubclass>,
    #[serde(default)]
    pub number: String,
    #[serde(default, rename = "type")]
    pub kind: ClassKind,
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One row of the flattened class tree, as shown in a picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub id: String,
    pub name: String,
    pub number: String,
    #[serde(rename = "type")]
    pub kind: ClassKind,
    pub label: String,
}

/// Per-resource load failures. `None` means the resource loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryErrors {
    pub home_member_states: Option<String>,
    pub languages: Option<String>,
    pub identifiers: Option<String>,
    pub doc_classes: Option<String>,
}

impl DictionaryErrors {
    pub fn is_empty(&self) -> bool {
        self.home_member_states.is_none()
            && self.languages.is_none()
            && self.identifiers.is_none()
            && self.doc_classes.is_none()
    }

    pub fn count(&self) -> usize {
        [
            &self.home_member_states,
            &self.languages,
            &self.identifiers,
            &self.doc_classes,
        ]
        .iter()
        .filter(|slot| slot.is_some())
        .count()
    }
}

/// Everything the publication form needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dictionary {
    pub home_member_states: Vec<HomeMemberState>,
    pub languages: Vec<Value>,
    pub identifiers: Map<String, Value>,
    pub doc_classes: Vec<DocClass>,
    /// Classes each followed by their subclasses.
    pub class_entries: Vec<ClassEntry>,
    /// Subclass id → tag.
    pub class_tags: BTreeMap<String, String>,
    /// Subclass id → label.
    pub class_labels: BTreeMap<String, String>,
    pub errors: DictionaryErrors,
}
