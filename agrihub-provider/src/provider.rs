//! The generic domain resource provider.
//!
//! One [`ResourceProvider`] caches one domain's entities, documents and
//! types, and mediates every read and write through the [`ApiClient`].
//!
//! The cache is read-through, write-around: fetches replace collections
//! wholesale, and mutations touch the cache only after the server confirmed
//! them. A failed call therefore never leaves a half-applied change behind.
//! Concurrent mutations of the same entity resolve last-completion-wins.
//!
//! Every operation comes in two flavours:
//! - `try_*` returns the [`ApiResult`] so callers can inspect error kinds;
//! - the plain form swallows the error, records its message in
//!   [`ResourceProvider::error`] and, for mutations, emits exactly one
//!   notification.

use crate::config::{BulkDeleteRoute, DomainConfig};
use crate::notify::{Notification, Notifier};
use crate::orchestrator::{RefreshOrchestrator, RefreshReport, SubFetch, capitalize};
use crate::state::ProviderState;
use agrihub_api::{ApiClient, ApiError, ApiResult, FormPayload, ListFilter, RequestBody, envelope};
use agrihub_model::{DocumentEntity, DomainType, Resource};
use futures::FutureExt;
use serde_json::{Value, json};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Decrements an in-flight counter when dropped, so that a cancelled
/// request does not leave the provider flagged as busy.
struct InFlight<'a, E> {
    state: &'a RwLock<ProviderState<E>>,
    counter: fn(&mut ProviderState<E>) -> &mut usize,
}

impl<'a, E> InFlight<'a, E> {
    fn start(
        state: &'a RwLock<ProviderState<E>>,
        counter: fn(&mut ProviderState<E>) -> &mut usize,
    ) -> Self {
        let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
        *counter(&mut *guard) += 1;
        drop(guard);
        Self { state, counter }
    }
}

impl<E> Drop for InFlight<'_, E> {
    fn drop(&mut self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let count = (self.counter)(&mut *state);
        *count = count.saturating_sub(1);
    }
}

fn fetch_counter<E>(state: &mut ProviderState<E>) -> &mut usize {
    &mut state.fetches_in_flight
}

fn upload_counter<E>(state: &mut ProviderState<E>) -> &mut usize {
    &mut state.uploads_in_flight
}

/// Cache and mutation engine for one domain.
pub struct ResourceProvider<E: Resource> {
    config: DomainConfig,
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<ProviderState<E>>,
}

impl<E: Resource> ResourceProvider<E> {
    pub fn new(config: DomainConfig, api: Arc<ApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            api,
            notifier,
            state: RwLock::new(ProviderState::default()),
        }
    }

    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, ProviderState<E>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProviderState<E>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores or clears the error message according to `result`.
    fn record<T>(&self, action: &str, result: ApiResult<T>) -> ApiResult<T> {
        let mut state = self.write();
        match &result {
            Ok(_) => state.error = None,
            Err(e) => {
                warn!("Failed to {} {}: {}", action, self.config.plural_label, e);
                state.error = Some(e.user_message());
            }
        }
        result
    }

    /// Turns a mutation result into the boolean contract plus one notification.
    fn conclude<T>(&self, verb: &str, result: ApiResult<T>) -> bool {
        match result {
            Ok(_) => {
                self.notifier.notify(Notification::success(format!(
                    "{} {} successfully",
                    capitalize(&self.config.label),
                    verb
                )));
                true
            }
            Err(e) => {
                self.notifier.notify(Notification::failure(format!(
                    "Failed to {} {}: {}",
                    infinitive(verb),
                    self.config.label,
                    e.user_message()
                )));
                false
            }
        }
    }

    fn documents_path(&self) -> ApiResult<&str> {
        self.config.documents_path.as_deref().ok_or_else(|| {
            ApiError::Config(format!("{} has no documents endpoint", self.config.domain))
        })
    }

    // ── Reads ────────────────────────────────────────────────────

    /// `GET {base}`, replacing the cached collection.
    pub async fn try_fetch_all(&self) -> ApiResult<Vec<E>> {
        self.try_fetch_filtered(&ListFilter::new()).await
    }

    /// Fetches the whole collection. On failure the cache is left as it
    /// was, the error is recorded and an empty list is returned.
    pub async fn fetch_all(&self) -> Vec<E> {
        self.try_fetch_all().await.unwrap_or_default()
    }

    /// `GET {base}?type=..&isActive=..`, replacing the cached collection.
    pub async fn try_fetch_filtered(&self, filter: &ListFilter) -> ApiResult<Vec<E>> {
        let result = self.load_entities(filter).await;
        self.record("fetch", result)
    }

    pub async fn fetch_filtered(&self, filter: &ListFilter) -> Vec<E> {
        self.try_fetch_filtered(filter).await.unwrap_or_default()
    }

    /// `GET {documents}?{param}={filter}`, replacing the cached documents.
    /// `None` uses the domain's default filter.
    pub async fn try_fetch_documents(&self, filter: Option<&str>) -> ApiResult<Vec<DocumentEntity>> {
        let result = self.load_documents(filter).await;
        self.record("fetch documents for", result)
    }

    pub async fn fetch_documents(&self, filter: Option<&str>) -> Vec<DocumentEntity> {
        self.try_fetch_documents(filter).await.unwrap_or_default()
    }

    /// `GET {types}`, replacing the cached types.
    pub async fn try_fetch_types(&self) -> ApiResult<Vec<DomainType>> {
        let result = self.load_types().await;
        self.record("fetch types for", result)
    }

    pub async fn fetch_types(&self) -> Vec<DomainType> {
        self.try_fetch_types().await.unwrap_or_default()
    }

    /// Fetches entities, documents and types concurrently and emits one
    /// summary notification. Sub-resources the domain lacks are skipped.
    ///
    /// The error is settled once all sub-fetches are done: cleared when
    /// every one succeeded, otherwise set to the last failure in
    /// submission order.
    pub async fn refresh_all(&self) -> RefreshReport {
        let filter = ListFilter::new();
        let mut fetches = vec![SubFetch::new(
            "entities",
            self.load_entities(&filter).map(|r| r.map(|v| v.len())).boxed(),
        )];
        if self.config.documents_path.is_some() {
            fetches.push(SubFetch::new(
                "documents",
                self.load_documents(None).map(|r| r.map(|v| v.len())).boxed(),
            ));
        }
        if self.config.types_path.is_some() {
            fetches.push(SubFetch::new(
                "types",
                self.load_types().map(|r| r.map(|v| v.len())).boxed(),
            ));
        }

        let report = RefreshOrchestrator::new(self.notifier.clone())
            .run(&self.config.plural_label, fetches)
            .await;
        let last_failure = report
            .outcomes
            .iter()
            .rev()
            .find_map(|o| o.result.as_ref().err().cloned());
        self.write().error = last_failure;
        report
    }

    async fn load_entities(&self, filter: &ListFilter) -> ApiResult<Vec<E>> {
        let _loading = InFlight::start(&self.state, fetch_counter);
        let items = self
            .api
            .get_with_query(&self.config.base_path, filter.to_query())
            .await
            .and_then(envelope::decode::<Vec<E>>)?;
        self.write().entities.replace_all(items.clone());
        debug!("Fetched {} {}", items.len(), self.config.plural_label);
        Ok(items)
    }

    async fn load_documents(&self, filter: Option<&str>) -> ApiResult<Vec<DocumentEntity>> {
        let _loading = InFlight::start(&self.state, fetch_counter);
        let path = self.documents_path()?;
        let mut query = Vec::new();
        if let Some(value) = filter.or(self.config.document_filter_value.as_deref()) {
            query.push((self.config.document_filter_param.clone(), value.to_string()));
        }
        let docs = self
            .api
            .get_with_query(path, query)
            .await
            .and_then(envelope::decode::<Vec<DocumentEntity>>)?;
        self.write().documents.replace_all(docs.clone());
        debug!("Fetched {} {} documents", docs.len(), self.config.label);
        Ok(docs)
    }

    async fn load_types(&self) -> ApiResult<Vec<DomainType>> {
        let _loading = InFlight::start(&self.state, fetch_counter);
        let path = self.config.types_path.as_deref().ok_or_else(|| {
            ApiError::Config(format!("{} has no types endpoint", self.config.domain))
        })?;
        let types = self
            .api
            .get(path)
            .await
            .and_then(envelope::decode::<Vec<DomainType>>)?;
        self.write().types.replace_all(types.clone());
        Ok(types)
    }

    // ── Entity mutations ─────────────────────────────────────────

    /// `POST {base}` (multipart); prepends the created entity.
    pub async fn try_create(&self, form: FormPayload) -> ApiResult<E> {
        let _uploading = form
            .has_files()
            .then(|| InFlight::start(&self.state, upload_counter));
        let result = self
            .api
            .post(&self.config.base_path, RequestBody::Multipart(form))
            .await
            .and_then(envelope::decode::<E>)
            .map(|entity| {
                self.write().entities.prepend(entity.clone());
                info!("Created {} {}", self.config.label, entity.id());
                entity
            });
        self.record("create", result)
    }

    pub async fn create(&self, form: FormPayload) -> bool {
        let result = self.try_create(form).await;
        self.conclude("created", result)
    }

    /// `PUT {base}/{id}` (multipart); replaces the cached entity in place.
    pub async fn try_update(&self, id: &str, form: FormPayload) -> ApiResult<E> {
        let _uploading = form
            .has_files()
            .then(|| InFlight::start(&self.state, upload_counter));
        let result = self
            .api
            .put(&self.config.item_path(id), RequestBody::Multipart(form))
            .await
            .and_then(envelope::decode::<E>)
            .map(|entity| {
                if !self.write().entities.replace(entity.clone()) {
                    debug!("Updated {} {} was not cached", self.config.label, entity.id());
                }
                info!("Updated {} {}", self.config.label, entity.id());
                entity
            });
        self.record("update", result)
    }

    pub async fn update(&self, id: &str, form: FormPayload) -> bool {
        let result = self.try_update(id, form).await;
        self.conclude("updated", result)
    }

    /// `DELETE {base}/{id}`; removes the cached entity.
    pub async fn try_delete(&self, id: &str) -> ApiResult<()> {
        let result = self
            .api
            .delete(&self.config.item_path(id), None)
            .await
            .map(|_| {
                self.write().entities.remove(id);
                info!("Deleted {} {}", self.config.label, id);
            });
        self.record("delete", result)
    }

    pub async fn delete(&self, id: &str) -> bool {
        let result = self.try_delete(id).await;
        self.conclude("deleted", result)
    }

    /// Deletes several entities in one request. An empty list is refused
    /// before any request is sent. Returns how many cached entries went away.
    pub async fn try_bulk_delete(&self, ids: &[String]) -> ApiResult<usize> {
        let result = async {
            if ids.is_empty() {
                return Err(ApiError::Validation(format!(
                    "select at least one {} to delete",
                    self.config.label
                )));
            }
            let body = RequestBody::Json(json!({ "ids": ids }));
            match self.config.bulk_delete {
                BulkDeleteRoute::PostBulkDelete => {
                    let path = format!("{}/bulk-delete", self.config.base_path.trim_end_matches('/'));
                    self.api.post(&path, body).await?
                }
                BulkDeleteRoute::DeleteWithBody => {
                    self.api.delete(&self.config.base_path, Some(body)).await?
                }
            };
            let removed = self.write().entities.remove_many(ids);
            info!("Bulk-deleted {} {}", ids.len(), self.config.plural_label);
            Ok(removed)
        }
        .await;
        self.record("bulk-delete", result)
    }

    pub async fn bulk_delete(&self, ids: &[String]) -> bool {
        let result = self.try_bulk_delete(ids).await;
        match result {
            Ok(_) => {
                let noun = if ids.len() == 1 {
                    &self.config.label
                } else {
                    &self.config.plural_label
                };
                self.notifier.notify(Notification::success(format!(
                    "{} {} deleted successfully",
                    ids.len(),
                    noun
                )));
                true
            }
            Err(e) => {
                self.notifier.notify(Notification::failure(format!(
                    "Failed to delete {}: {}",
                    self.config.plural_label,
                    e.user_message()
                )));
                false
            }
        }
    }

    /// `POST {base}/{id}/set-active`. If the server answers with the entity,
    /// it replaces the cached copy; otherwise the cache is left alone.
    pub async fn try_set_active(&self, id: &str) -> ApiResult<Option<E>> {
        let path = format!("{}/set-active", self.config.item_path(id));
        let result = self
            .api
            .post(&path, json!({}))
            .await
            .map(|body| self.patch_from_response(body));
        self.record("activate", result)
    }

    pub async fn set_active(&self, id: &str) -> bool {
        let result = self.try_set_active(id).await;
        self.conclude("activated", result)
    }

    /// `PATCH {base}/{id}` with `{ "increment": field }` (view and download
    /// counters).
    pub async fn try_increment(&self, id: &str, field: &str) -> ApiResult<Option<E>> {
        let result = async {
            if field.trim().is_empty() {
                return Err(ApiError::Validation("counter field is required".to_string()));
            }
            let body = self
                .api
                .patch(&self.config.item_path(id), json!({ "increment": field }))
                .await?;
            Ok(self.patch_from_response(body))
        }
        .await;
        self.record("update counter of", result)
    }

    pub async fn increment(&self, id: &str, field: &str) -> bool {
        let result = self.try_increment(id, field).await;
        self.conclude("updated", result)
    }

    fn patch_from_response(&self, body: Value) -> Option<E> {
        let entity = envelope::decode::<E>(body).ok()?;
        self.write().entities.replace(entity.clone());
        Some(entity)
    }

    // ── Document mutations ───────────────────────────────────────

    /// `POST {documents}` (multipart); prepends the created document.
    pub async fn try_create_document(&self, form: FormPayload) -> ApiResult<DocumentEntity> {
        let _uploading = form
            .has_files()
            .then(|| InFlight::start(&self.state, upload_counter));
        let result = async {
            let path = self.documents_path()?;
            let doc = self
                .api
                .post(path, RequestBody::Multipart(form))
                .await
                .and_then(envelope::decode::<DocumentEntity>)?;
            self.write().documents.prepend(doc.clone());
            info!("Created {} document {}", self.config.label, doc.id);
            Ok(doc)
        }
        .await;
        self.record("create document for", result)
    }

    pub async fn create_document(&self, form: FormPayload) -> bool {
        let result = self.try_create_document(form).await;
        self.conclude_document("created", result)
    }

    /// `PUT {documents}/{id}` (multipart); replaces the cached document.
    pub async fn try_update_document(&self, id: &str, form: FormPayload) -> ApiResult<DocumentEntity> {
        let _uploading = form
            .has_files()
            .then(|| InFlight::start(&self.state, upload_counter));
        let result = async {
            let path = format!("{}/{}", self.documents_path()?, id);
            let doc = self
                .api
                .put(&path, RequestBody::Multipart(form))
                .await
                .and_then(envelope::decode::<DocumentEntity>)?;
            self.write().documents.replace(doc.clone());
            Ok(doc)
        }
        .await;
        self.record("update document for", result)
    }

    pub async fn update_document(&self, id: &str, form: FormPayload) -> bool {
        let result = self.try_update_document(id, form).await;
        self.conclude_document("updated", result)
    }

    /// `DELETE {documents}/{id}` with `{ "author": .. }` for the server's
    /// ownership check.
    pub async fn try_delete_document(&self, id: &str, author: &str) -> ApiResult<()> {
        let result = async {
            let path = format!("{}/{}", self.documents_path()?, id);
            self.api
                .delete(&path, Some(RequestBody::Json(json!({ "author": author }))))
                .await?;
            self.write().documents.remove(id);
            Ok(())
        }
        .await;
        self.record("delete document for", result)
    }

    pub async fn delete_document(&self, id: &str, author: &str) -> bool {
        let result = self.try_delete_document(id, author).await;
        self.conclude_document("deleted", result)
    }

    fn conclude_document<T>(&self, verb: &str, result: ApiResult<T>) -> bool {
        match result {
            Ok(_) => {
                self.notifier
                    .notify(Notification::success(format!("Document {verb} successfully")));
                true
            }
            Err(e) => {
                self.notifier.notify(Notification::failure(format!(
                    "Failed to {} document: {}",
                    infinitive(verb),
                    e.user_message()
                )));
                false
            }
        }
    }

    // ── Cache accessors (no I/O) ─────────────────────────────────

    pub fn get_by_id(&self, id: &str) -> Option<E> {
        self.read().entities.get(id).cloned()
    }

    /// Cached entities whose foreign key equals `key`.
    pub fn get_by_foreign_key(&self, key: &str) -> Vec<E> {
        self.read().entities.by_foreign_key(key).cloned().collect()
    }

    pub fn entities(&self) -> Vec<E> {
        self.read().entities.to_vec()
    }

    pub fn count(&self) -> usize {
        self.read().entities.len()
    }

    pub fn documents(&self) -> Vec<DocumentEntity> {
        self.read().documents.to_vec()
    }

    pub fn document_by_id(&self, id: &str) -> Option<DocumentEntity> {
        self.read().documents.get(id).cloned()
    }

    /// Cached documents attached to the entity or type `parent_id`.
    pub fn documents_for(&self, parent_id: &str) -> Vec<DocumentEntity> {
        self.read().documents.by_foreign_key(parent_id).cloned().collect()
    }

    pub fn count_documents(&self) -> usize {
        self.read().documents.len()
    }

    pub fn types(&self) -> Vec<DomainType> {
        self.read().types.to_vec()
    }

    pub fn type_by_id(&self, id: &str) -> Option<DomainType> {
        self.read().types.get(id).cloned()
    }

    pub fn types_count(&self) -> usize {
        self.read().types.len()
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading()
    }

    pub fn is_uploading_file(&self) -> bool {
        self.read().is_uploading_file()
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn clear_error(&self) {
        self.write().error = None;
    }

    /// A copy of the whole state, for rendering.
    pub fn snapshot(&self) -> ProviderState<E> {
        self.read().clone()
    }
}

fn infinitive(past: &str) -> &str {
    match past {
        "created" => "create",
        "updated" => "update",
        "deleted" => "delete",
        "activated" => "activate",
        other => other,
    }
}
