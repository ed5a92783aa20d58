//! Media descriptor wire model (catalog JSON).
//!
//! The catalog is lenient about missing fields, so every scalar on
//! `Encoding` falls back to its zero value when absent. Wrong types are still
//! a decode failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Full catalog record for a content id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    /// Playable variants in catalog order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub encodings: Vec<Encoding>,
    /// Custom attributes keyed by attribute name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: BTreeMap<String, AttributeValue>,
}

/// One playable variant of a media item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encoding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub meta_id: String,
    #[serde(default)]
    pub encoding_profile_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drm_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drm_id: Option<String>,
    #[serde(default)]
    pub status: i64,
    /// Epoch timestamp.
    #[serde(default, rename = "created")]
    pub created_at: i64,
    /// Epoch timestamp.
    #[serde(default, rename = "updated")]
    pub updated_at: i64,
}

impl Encoding {
    pub fn drm_id(&self) -> Option<&str> {
        self.drm_id.as_deref()
    }
}

/// Attribute payload.
///
/// Scalars keep their JSON kind so a descriptor re-serializes to the same
/// JSON: signed and unsigned integers stay integers and `null` stays `null`.
/// Arrays and objects are carried as-is in `Structured`, so no attribute
/// shape fails the decode of the encodings next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
    Structured(serde_json::Value),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

fn null_as_default<'de, D, T>(de: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}
