use crate::error::{ModelError, ModelResult};
use crate::resource::Resource;
use crate::serde_helpers::{id_ref, id_string, one_or_many};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file-bearing document owned by a user.
///
/// A document hangs off at most one parent: either a [`crate::DomainEntity`]
/// or a [`crate::DomainType`]. Deleting the parent does not cascade here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEntity {
    #[serde(alias = "_id", deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
    /// Owning user id.
    #[serde(alias = "userId", deserialize_with = "id_string")]
    pub author: String,
    /// Ordered file references.
    #[serde(
        default,
        alias = "fileUrl",
        alias = "files",
        deserialize_with = "one_or_many"
    )]
    pub file_urls: Vec<String>,
    #[serde(
        default,
        alias = "cropId",
        alias = "livestockId",
        alias = "fisheryId",
        alias = "machineId",
        deserialize_with = "id_ref",
        skip_serializing_if = "Option::is_none"
    )]
    pub entity_id: Option<String>,
    #[serde(
        default,
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
}

/// What a document is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentParent<'a> {
    Entity(&'a str),
    Type(&'a str),
}

impl DocumentEntity {
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            file_urls: Vec::new(),
            entity_id: None,
            type_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns the parent this document is attached to, if any.
    ///
    /// Fails when both an entity and a type reference are present.
    pub fn parent(&self) -> ModelResult<Option<DocumentParent<'_>>> {
        match (&self.entity_id, &self.type_id) {
            (Some(_), Some(_)) => Err(ModelError::InvalidDocument {
                id: self.id.clone(),
                reason: "attached to both an entity and a type".to_string(),
            }),
            (Some(e), None) => Ok(Some(DocumentParent::Entity(e))),
            (None, Some(t)) => Ok(Some(DocumentParent::Type(t))),
            (None, None) => Ok(None),
        }
    }

    /// Returns true if `user_id` owns this document.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.author == user_id
    }
}

impl Resource for DocumentEntity {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn foreign_key(&self) -> Option<&str> {
        self.entity_id.as_deref().or(self.type_id.as_deref())
    }
}
