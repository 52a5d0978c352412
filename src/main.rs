use anyhow::{bail, Context, Result};
use redink_i18n::config::Config;
use redink_i18n::http::{self, AppState};
use redink_i18n::i18n::{Catalog, CatalogValidator, PromptLoader};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when not present)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("redink_i18n=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    // The default locale backs every fallback, so an incomplete catalog is fatal
    let report = CatalogValidator::validate(Catalog::get());
    for warning in &report.warnings {
        warn!("Message catalog: {}", warning);
    }
    for err in &report.errors {
        error!("Message catalog: {}", err);
    }
    if report.has_errors() {
        bail!("Message catalog failed validation with {} errors", report.errors.len());
    }

    info!(
        "Serving prompts from {} (cache capacity {})",
        config.prompts_dir.display(),
        config.template_cache_capacity
    );
    let loader = Arc::new(PromptLoader::from_config(&config));
    if PromptLoader::install(Arc::clone(&loader)).is_err() {
        bail!("Prompt loader was initialized before configuration was applied");
    }
    let app = http::router(AppState::new(loader));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
