//! Lists a developer's rate plan subscriptions with their current status.

use chrono::Utc;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use rateplan_subscriptions::adapters::{InMemoryListCache, MintHttpConfig, MintHttpTransport, RedisListCache};
use rateplan_subscriptions::application::{
    ListSubscriptionsHandler, ListSubscriptionsQuery, SubscriptionStatusView,
};
use rateplan_subscriptions::config::{AppConfig, CacheBackend, CacheConfig};
use rateplan_subscriptions::domain::foundation::{DeveloperId, DomainError};
use rateplan_subscriptions::ports::ListCache;

#[derive(Parser)]
#[command(name = "rateplan-subscriptions")]
#[command(about = "List a developer's rate plan subscriptions")]
struct Cli {
    /// Developer email/id or company id
    developer_id: String,

    /// Print one JSON object per subscription
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    config.logging.init()?;

    tracing::info!(
        base_url = %config.billing.base_url,
        org = %config.billing.org_name,
        cache = ?config.cache.backend,
        "Configuration loaded"
    );

    let transport = MintHttpTransport::new(
        MintHttpConfig::new(&config.billing.base_url, &config.billing.org_name)
            .with_timeout(config.billing.request_timeout()),
    )?;
    let cache = build_cache(&config.cache).await?;
    let handler = ListSubscriptionsHandler::new(Arc::new(transport), cache);

    let subscriptions = handler
        .handle(ListSubscriptionsQuery {
            developer_id: DeveloperId::new(cli.developer_id)?,
        })
        .await
        .map_err(DomainError::from)?;

    let now = Utc::now();
    for subscription in &subscriptions {
        let view = SubscriptionStatusView::from_subscription(subscription, now).map_err(DomainError::from)?;
        if cli.json {
            println!("{}", serde_json::to_string(&view)?);
        } else {
            println!(
                "{:<24} {:<8} {:<19} {}",
                view.subscription_id.as_deref().unwrap_or("-"),
                view.status.as_str(),
                view.start_date.as_deref().unwrap_or("-"),
                view.end_date.as_deref().unwrap_or("-"),
            );
        }
    }
    Ok(())
}

async fn build_cache(config: &CacheConfig) -> Result<Arc<dyn ListCache>, Box<dyn std::error::Error>> {
    match config.backend {
        CacheBackend::Memory => Ok(Arc::new(InMemoryListCache::new())),
        CacheBackend::Redis => {
            let url = config.redis_url.as_deref().unwrap_or_default();
            let mut cache = RedisListCache::connect(url)
                .await
                .map_err(DomainError::from)?;
            if let Some(ttl) = config.ttl_secs {
                cache = cache.with_ttl(ttl);
            }
            Ok(Arc::new(cache))
        }
    }
}
