//! Per-domain configuration of the provider engine.

use agrihub_api::ApiConfig;
use agrihub_model::Domain;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a domain's API expects a batched delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkDeleteRoute {
    /// `POST {base}/bulk-delete` with `{ "ids": [...] }`.
    #[default]
    PostBulkDelete,
    /// `DELETE {base}` with `{ "ids": [...] }`.
    DeleteWithBody,
}

/// Everything that distinguishes one domain's provider from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub domain: Domain,
    /// Singular noun used in notifications ("crop").
    pub label: String,
    /// Plural noun used in refresh summaries ("crops").
    pub plural_label: String,
    /// Collection endpoint, e.g. `/crop/crops`.
    pub base_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types_path: Option<String>,
    /// Query parameter scoping document lists to this domain.
    #[serde(default = "default_document_filter_param")]
    pub document_filter_param: String,
    /// Default value for [`Self::document_filter_param`]; `None` lists all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_filter_value: Option<String>,
    #[serde(default)]
    pub bulk_delete: BulkDeleteRoute,
}

fn default_document_filter_param() -> String {
    "domainType".to_string()
}

impl DomainConfig {
    /// A minimal configuration with only a collection endpoint.
    pub fn new(domain: Domain, label: &str, base_path: &str) -> Self {
        Self {
            domain,
            label: label.to_string(),
            plural_label: format!("{label}s"),
            base_path: base_path.to_string(),
            documents_path: None,
            types_path: None,
            document_filter_param: default_document_filter_param(),
            document_filter_value: None,
            bulk_delete: BulkDeleteRoute::default(),
        }
    }

    #[must_use]
    pub fn with_documents(mut self, path: &str, filter_value: Option<&str>) -> Self {
        self.documents_path = Some(path.to_string());
        self.document_filter_value = filter_value.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_types(mut self, path: &str) -> Self {
        self.types_path = Some(path.to_string());
        self
    }

    #[must_use]
    pub fn with_plural(mut self, plural: &str) -> Self {
        self.plural_label = plural.to_string();
        self
    }

    #[must_use]
    pub fn with_bulk_delete(mut self, route: BulkDeleteRoute) -> Self {
        self.bulk_delete = route;
        self
    }

    /// Built-in configuration for `domain`.
    pub fn for_domain(domain: Domain) -> Self {
        match domain {
            Domain::Crop => Self::new(domain, "crop", "/crop/crops")
                .with_documents("/crop/documents", Some("crop"))
                .with_types("/crop/types"),
            Domain::Livestock => Self::new(domain, "livestock", "/livestock/animals")
                .with_plural("livestock")
                .with_documents("/livestock/documents", Some("livestock"))
                .with_types("/livestock/types"),
            Domain::Fishery => Self::new(domain, "fishery", "/fishery/fisheries")
                .with_plural("fisheries")
                .with_documents("/fishery/documents", Some("fishery"))
                .with_types("/fishery/types"),
            Domain::Machine => Self::new(domain, "machine", "/machine/machines")
                .with_documents("/machine/documents", Some("machine"))
                .with_types("/machine/types"),
            Domain::Admin => Self::new(domain, "user", "/admin/users")
                .with_documents("/admin/documents", None)
                .with_bulk_delete(BulkDeleteRoute::DeleteWithBody),
            Domain::Media => Self::new(domain, "resource", "/media/resources"),
        }
    }

    /// `{base}/{id}`.
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.base_path.trim_end_matches('/'), id)
    }
}

/// Application-level configuration: API connection plus domain overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    /// Replaces the built-in configuration of the listed domains.
    pub domains: Vec<DomainConfig>,
}

impl AppConfig {
    /// Loads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> agrihub_api::ApiResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            agrihub_api::ApiError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.api.validate()?;
        Ok(config)
    }

    /// Configuration for `domain`, preferring an override.
    pub fn domain(&self, domain: Domain) -> DomainConfig {
        self.domains
            .iter()
            .find(|d| d.domain == domain)
            .cloned()
            .unwrap_or_else(|| DomainConfig::for_domain(domain))
    }
}
