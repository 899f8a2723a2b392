use crate::resource::Resource;
use crate::serde_helpers::{id_ref, id_string, one_or_many};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A crop, livestock, fishery or machine record.
///
/// The four content domains share one shape. Fields the client does not
/// interpret are kept in `extra` so an update round-trips them untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEntity {
    #[serde(alias = "_id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        alias = "image",
        alias = "imageUrls",
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub images: Vec<String>,
    /// Reference to the owning [`DomainType`].
    #[serde(
        default,
        alias = "cropType",
        alias = "livestockType",
        alias = "fisheryType",
        alias = "machineType",
        alias = "cropTypeId",
        alias = "machineTypeId",
        deserialize_with = "id_ref",
        skip_serializing_if = "Option::is_none"
    )]
    pub type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DomainEntity {
    /// Creates an entity with only identity and name set.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            images: Vec::new(),
            type_id: None,
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    /// Sets the type reference.
    #[must_use]
    pub fn with_type(mut self, type_id: impl Into<String>) -> Self {
        self.type_id = Some(type_id.into());
        self
    }

    /// Reads an uninterpreted field.
    pub fn get_extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

impl Resource for DomainEntity {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn foreign_key(&self) -> Option<&str> {
        self.type_id.as_deref()
    }
}

/// A grouping entity (e.g. crop type, machine type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainType {
    #[serde(alias = "_id", deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Denormalized number of entities referencing this type.
    #[serde(default, alias = "count", alias = "itemCount")]
    pub entity_count: u64,
}

impl DomainType {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            entity_count: 0,
        }
    }
}

impl Resource for DomainType {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
