/*
 * Responsibility
 * - Config → verifier → Router assembly
 * - Middleware ordering (bearer auth inside, HTTP plumbing and CORS outside)
 * - axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::services::auth::{TokenVerifier, VerifierOptions};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,quizsync_api=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so it gets noticed.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build process-level services. Fails when the signing secret is unusable,
/// so a broken verifier never serves traffic.
pub fn build_state(config: &Config) -> Result<AppState> {
    let options = VerifierOptions {
        audience: config.auth_audience.clone(),
        leeway_seconds: config.auth_leeway_seconds,
    };
    let verifier =
        TokenVerifier::with_options(&config.jwt_secret, options).context("JWT_SECRET")?;

    tracing::info!(?verifier, "token verifier ready");

    Ok(AppState::new(Arc::new(verifier)))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let api = middleware::auth::bearer::apply(api::routes(), state.clone());

    let router = Router::new().nest("/api", api).with_state(state);

    let router = middleware::http::apply(router, config);
    middleware::cors::apply(router, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_rejects_bad_secret() {
        let config = Config::from_vars(|key| match key {
            "JWT_SECRET" => Some("c2hvcnQ=".to_string()),
            _ => None,
        })
        .unwrap();

        let err = build_state(&config).unwrap_err();
        assert!(format!("{err:#}").contains("at least 32"));
    }
}
