//! Application-lifetime context.
//!
//! Holds the objects that would otherwise be process globals (HTTP client,
//! token storage, notification sink) and hands them to the providers it
//! creates. Providers share the client but each owns its own cache.

use crate::config::AppConfig;
use crate::domains::{
    AdminProvider, CropProvider, FisheryProvider, LivestockProvider, MachineProvider,
    MediaProvider,
};
use crate::notify::Notifier;
use crate::provider::ResourceProvider;
use agrihub_api::{ApiClient, ApiResult, AuthClient, TokenStore};
use agrihub_model::{Domain, Resource};
use std::sync::Arc;
use tracing::info;

pub struct AppContext {
    config: AppConfig,
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
}

impl AppContext {
    /// Builds the shared HTTP client. Fails on an invalid API configuration.
    pub fn init(
        config: AppConfig,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> ApiResult<Self> {
        let api = Arc::new(ApiClient::new(config.api.clone(), tokens)?);
        info!("AgriHub client initialised against {}", config.api.base_url);
        Ok(Self {
            config,
            api,
            notifier,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.api.clone())
    }

    /// A fresh provider with an empty cache for `domain`.
    pub fn provider<E: Resource>(&self, domain: Domain) -> ResourceProvider<E> {
        ResourceProvider::new(
            self.config.domain(domain),
            self.api.clone(),
            self.notifier.clone(),
        )
    }

    pub fn crop_provider(&self) -> CropProvider {
        self.provider(Domain::Crop)
    }

    pub fn livestock_provider(&self) -> LivestockProvider {
        self.provider(Domain::Livestock)
    }

    pub fn fishery_provider(&self) -> FisheryProvider {
        self.provider(Domain::Fishery)
    }

    pub fn machine_provider(&self) -> MachineProvider {
        self.provider(Domain::Machine)
    }

    pub fn admin_provider(&self) -> AdminProvider {
        self.provider(Domain::Admin)
    }

    pub fn media_provider(&self) -> MediaProvider {
        self.provider(Domain::Media)
    }

    /// Ends the session: the stored token is cleared. Providers created from
    /// this context keep working but send unauthenticated requests.
    pub fn teardown(self) -> ApiResult<()> {
        self.api.tokens().clear()?;
        info!("AgriHub client shut down");
        Ok(())
    }
}
