//! Contact-related types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A contact record.
///
/// The same shape is used for reads, creations, partial updates and full
/// replacements. Fields left as `None` are omitted from request bodies, and
/// fields this type does not know about are collected in [`extra`](Self::extra)
/// and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Server-assigned identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Email addresses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,

    /// Phone entries as returned by the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_contacts: Option<Vec<Map<String, Value>>>,

    /// Organization the contact belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<Map<String, Value>>,

    /// Agent responsible for the contact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible: Option<Map<String, Value>>,

    /// Free-form tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Custom field entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomField>>,

    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Contact {
    /// Create an empty contact with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Replace the custom fields from key/value pairs.
    pub fn with_custom_fields<I, K>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.custom_fields = Some(CustomField::from_map(fields));
        self
    }

    /// Custom fields as a key to value map.
    ///
    /// Entries without a key are skipped and a repeated key keeps its last
    /// value. Returns an empty map when the contact has no custom fields.
    pub fn custom_fields_map(&self) -> Map<String, Value> {
        self.custom_fields
            .iter()
            .flatten()
            .filter_map(|field| {
                field
                    .key
                    .as_ref()
                    .map(|key| (key.clone(), field.value.clone().unwrap_or(Value::Null)))
            })
            .collect()
    }
}

/// One custom field entry, `{"key": ..., "value": ...}` on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    /// Field key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Field value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomField {
    /// Create an entry.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
            extra: Map::new(),
        }
    }

    /// Build entries from key/value pairs, keeping their order.
    pub fn from_map<I, K>(fields: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        fields
            .into_iter()
            .map(|(key, value)| Self::new(key, value))
            .collect()
    }
}

/// A contact listing as returned by `GET /contacts`.
///
/// The endpoint answers either with a bare array or with a page object
/// holding the records under `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContactList {
    /// Bare array of records
    Items(Vec<Contact>),
    /// Page object
    Page {
        /// Records on this page
        #[serde(default)]
        items: Vec<Contact>,
        /// Paging metadata and other page fields
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl ContactList {
    /// The records, whichever shape they came in.
    pub fn into_items(self) -> Vec<Contact> {
        match self {
            ContactList::Items(items) | ContactList::Page { items, .. } => items,
        }
    }
}
