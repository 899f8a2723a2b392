use crate::resource::Resource;
use crate::serde_helpers::id_string;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a stored media resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Application,
    Article,
    #[serde(other)]
    Other,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Application => "application",
            MediaKind::Article => "article",
            MediaKind::Other => "other",
        }
    }
}

/// A promotional video, downloadable app or article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResource {
    #[serde(alias = "_id", deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default, alias = "fileUrl", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource for MediaResource {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn foreign_key(&self) -> Option<&str> {
        Some(self.kind.as_str())
    }
}
