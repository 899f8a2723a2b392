//! Domain resource providers for the AgriHub client.
//!
//! Each content domain (crops, livestock, fisheries, machines, users, media)
//! gets a [`ResourceProvider`]: an in-memory cache of server-backed entities
//! with fetch/create/update/delete operations that only touch the cache after
//! the server has confirmed them.
//!
//! # Components
//!
//! - **Provider**: the generic engine, parameterized by entity shape and
//!   [`DomainConfig`]
//! - **Orchestrator**: runs a provider's sub-fetches concurrently and
//!   classifies the outcome as complete, partial or failed
//! - **Notifier**: where user-facing success/failure messages go
//! - **Context**: application-lifetime owner of the client and sink
//!
//! # Example
//!
//! ```no_run
//! use agrihub_api::MemoryTokenStore;
//! use agrihub_provider::{AppConfig, AppContext, TracingNotifier};
//! use std::sync::Arc;
//!
//! # async fn run() -> agrihub_api::ApiResult<()> {
//! let ctx = AppContext::init(
//!     AppConfig::default(),
//!     Arc::new(MemoryTokenStore::new()),
//!     Arc::new(TracingNotifier),
//! )?;
//! let crops = ctx.crop_provider();
//! let report = crops.refresh_all().await;
//! println!("{} crops, {:?}", crops.count(), report.summary);
//! # Ok(())
//! # }
//! ```

mod config;
mod context;
mod domains;
pub mod notify;
mod orchestrator;
mod provider;
pub mod state;

pub use config::{AppConfig, BulkDeleteRoute, DomainConfig};
pub use context::AppContext;
pub use domains::{
    AdminProvider, CropProvider, FisheryProvider, LivestockProvider, MachineProvider,
    MediaProvider,
};
pub use notify::{
    ChannelNotifier, Notification, NotificationLevel, Notifier, RecordingNotifier,
    TracingNotifier,
};
pub use orchestrator::{FetchOutcome, RefreshOrchestrator, RefreshReport, RefreshSummary, SubFetch};
pub use provider::ResourceProvider;
pub use state::{Collection, ProviderState};
