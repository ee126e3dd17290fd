use anyhow::Result;

mod api;
mod auth;
mod config;
mod db;
mod error;
mod provider;
mod provision;
mod roster;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("subdomain_portal=info".parse()?),
        )
        .init();

    tracing::info!("Starting subdomain-portal v{}", env!("CARGO_PKG_VERSION"));

    let cfg = config::load()?;
    tracing::info!("Configuration loaded");

    let db_pool = db::init(&cfg).await?;

    let roster = roster::Roster::load(&cfg.roster.path)?;

    let provider = provider::ProviderClient::new(
        &cfg.provider.api_base,
        &cfg.provider.zone_id,
        &cfg.provider.api_token,
    )?;

    let portal = provision::Provisioner::new(
        db_pool,
        provider,
        roster,
        cfg.auth.clone(),
        cfg.domain.clone(),
    );

    api::serve(&cfg.api.bind, cfg.api.port, portal).await
}
