//! Command-line front end for the AgriHub client.
//!
//! The binary in `main.rs` only parses arguments and installs logging; the
//! commands themselves live here so they can be driven from tests against a
//! mock server.

mod output;

use agrihub_api::{
    ApiConfig, FileTokenStore, MemoryTokenStore, RegisterRequest, TokenStore,
};
use agrihub_model::{Domain, DomainEntity, Resource};
use agrihub_provider::{AppConfig, AppContext, RefreshSummary, ResourceProvider, TracingNotifier};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use output::{render_show, render_table};

#[derive(Parser, Debug)]
#[command(name = "agrihub")]
#[command(about = "Browse and manage AgriHub content from the terminal")]
pub struct Cli {
    /// API base URL (overrides the config file)
    #[arg(long, env = "AGRIHUB_API_URL")]
    pub api_url: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Bearer token for this invocation only
    #[arg(long, env = "AGRIHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File where the session token is kept between invocations
    #[arg(long)]
    pub token_file: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Refresh a domain and list its entities
    List { domain: Domain },
    /// Print one entity as JSON
    Show { domain: Domain, id: String },
    /// Delete one or more entities
    Delete {
        domain: Domain,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List a domain's types
    Types { domain: Domain },
    /// List a domain's documents
    Documents {
        domain: Domain,
        /// Overrides the domain's default document filter
        #[arg(long)]
        filter: Option<String>,
    },
    /// Mark a media resource as the active one
    Activate { id: String },
    /// Create an account; an OTP is sent to the email address
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Confirm a registration OTP and sign in
    VerifyOtp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
    },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
}

impl Cli {
    /// Resolves the application configuration from the config file,
    /// the environment and command-line overrides, in that order.
    pub fn app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => AppConfig {
                api: ApiConfig::from_env().context("Invalid API settings in environment")?,
                ..Default::default()
            },
        };
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        Ok(config)
    }

    pub fn token_store(&self) -> Result<Arc<dyn TokenStore>> {
        if let Some(token) = &self.token {
            return Ok(Arc::new(MemoryTokenStore::with_token(token.clone())));
        }
        match &self.token_file {
            Some(path) => {
                let store = FileTokenStore::open(path)
                    .with_context(|| format!("Failed to open token file {}", path.display()))?;
                Ok(Arc::new(store))
            }
            None => Ok(Arc::new(MemoryTokenStore::new())),
        }
    }

    pub fn context(&self) -> Result<AppContext> {
        let config = self.app_config()?;
        let ctx = AppContext::init(config, self.token_store()?, Arc::new(TracingNotifier))
            .context("Failed to initialise API client")?;
        Ok(ctx)
    }
}

/// Runs `command`, writing its output to `out`.
pub async fn run(ctx: &AppContext, command: Command, out: &mut impl Write) -> Result<()> {
    debug!("Running {:?}", command);
    match command {
        Command::List { domain } => match domain {
            Domain::Admin => list(&ctx.admin_provider(), out).await,
            Domain::Media => list(&ctx.media_provider(), out).await,
            content => list(&ctx.provider::<DomainEntity>(content), out).await,
        },
        Command::Show { domain, id } => match domain {
            Domain::Admin => show(&ctx.admin_provider(), &id, out).await,
            Domain::Media => show(&ctx.media_provider(), &id, out).await,
            content => show(&ctx.provider::<DomainEntity>(content), &id, out).await,
        },
        Command::Delete { domain, ids } => match domain {
            Domain::Admin => delete(&ctx.admin_provider(), &ids, out).await,
            Domain::Media => delete(&ctx.media_provider(), &ids, out).await,
            content => delete(&ctx.provider::<DomainEntity>(content), &ids, out).await,
        },
        Command::Types { domain } => {
            let provider = ctx.provider::<DomainEntity>(domain);
            let types = provider
                .try_fetch_types()
                .await
                .with_context(|| format!("Failed to fetch {domain} types"))?;
            render_table(out, &types)?;
            Ok(())
        }
        Command::Documents { domain, filter } => {
            let provider = ctx.provider::<DomainEntity>(domain);
            let docs = provider
                .try_fetch_documents(filter.as_deref())
                .await
                .with_context(|| format!("Failed to fetch {domain} documents"))?;
            render_table(out, &docs)?;
            Ok(())
        }
        Command::Activate { id } => {
            let media = ctx.media_provider();
            if !media.set_active(&id).await {
                bail!("Failed to activate resource {id}: {}", error_of(&media));
            }
            writeln!(out, "Activated {id}")?;
            Ok(())
        }
        Command::Register {
            name,
            email,
            password,
            phone,
        } => {
            let request = RegisterRequest {
                name,
                email,
                password,
                phone,
            };
            let ack = ctx
                .auth()
                .register(&request)
                .await
                .context("Registration failed")?;
            let message = ack
                .message
                .unwrap_or_else(|| format!("An OTP was sent to {}", request.email));
            writeln!(out, "{message}")?;
            Ok(())
        }
        Command::VerifyOtp { email, otp } => {
            ctx.auth()
                .verify_otp(&email, &otp)
                .await
                .context("OTP verification failed")?;
            writeln!(out, "Verified {email}")?;
            Ok(())
        }
        Command::Login { email, password } => {
            let session = ctx
                .auth()
                .login(&email, &password)
                .await
                .context("Login failed")?;
            let who = session.user.map(|u| u.name).unwrap_or(email);
            writeln!(out, "Signed in as {who}")?;
            Ok(())
        }
        Command::Logout => {
            ctx.auth().logout().context("Failed to clear session")?;
            writeln!(out, "Signed out")?;
            Ok(())
        }
    }
}

async fn list<E: Resource>(provider: &ResourceProvider<E>, out: &mut impl Write) -> Result<()> {
    let report = provider.refresh_all().await;
    if let RefreshSummary::AllFailed { .. } = report.summary {
        bail!(
            "Failed to fetch {}: {}",
            provider.config().plural_label,
            error_of(provider)
        );
    }
    for failed in report.outcomes.iter().filter(|o| o.is_failure()) {
        warn!("Skipped {}: {:?}", failed.name, failed.result);
    }
    render_table(out, &provider.entities())?;
    info!("{} {} listed", provider.count(), provider.config().plural_label);
    Ok(())
}

async fn show<E: Resource>(
    provider: &ResourceProvider<E>,
    id: &str,
    out: &mut impl Write,
) -> Result<()> {
    provider
        .try_fetch_all()
        .await
        .with_context(|| format!("Failed to fetch {}", provider.config().plural_label))?;
    let Some(entity) = provider.get_by_id(id) else {
        bail!("No {} with id {id}", provider.config().label);
    };
    render_show(out, &entity)?;
    Ok(())
}

async fn delete<E: Resource>(
    provider: &ResourceProvider<E>,
    ids: &[String],
    out: &mut impl Write,
) -> Result<()> {
    let ok = match ids {
        [single] => provider.delete(single).await,
        many => provider.bulk_delete(many).await,
    };
    if !ok {
        bail!(
            "Failed to delete {}: {}",
            provider.config().plural_label,
            error_of(provider)
        );
    }
    writeln!(out, "Deleted {}", ids.join(", "))?;
    Ok(())
}

fn error_of<E: Resource>(provider: &ResourceProvider<E>) -> String {
    provider
        .error()
        .unwrap_or_else(|| "unknown error".to_string())
}
