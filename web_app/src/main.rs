#![recursion_limit = "256"]
//! # Pet Mood Web Application
//!
//! Main entry point for the pet mood tracker. Loads configuration, sets up
//! logging, probes the backend and runs the web server.

pub mod api;
pub mod backend;
pub mod config;
pub mod consts;
pub mod front;
pub mod i18n;
pub mod logger;
pub mod metric;
pub mod models;
pub mod utils;

use anyhow::Context;
use csrf::AesGcmCsrfProtection;
use envconfig::Envconfig;
use logfire::config::MetricsOptions;
use ntex::web;
use ntex_identity::{CookieIdentityPolicy, IdentityService};
use ntex_session::CookieSession;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};

use backend::supabase::{ConnectionStatus, SupabaseClient};

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::AppConfig::init_from_env().context("failed to load app config")?;

    // logfire when a token is configured, plain console logging otherwise
    let shutdown_handler = match &app_config.logfire_token {
        Some(token) => Some(
            logfire::configure()
                .install_panic_handler()
                .with_metrics(Some(MetricsOptions::default()))
                .send_to_logfire(logfire::config::SendToLogfire::Yes)
                .with_token(token)
                .finish()?,
        ),
        None => {
            logger::setup_simple_logger()?;
            None
        }
    };

    let runtime_config = config::RuntimeConfig::load_or_default(&app_config.runtime_config_path);
    check_backend_connection(&runtime_config).await;

    // cookies do not survive a restart: keys are random per process
    let csrf_key = utils::build_random_cookie_key()?;
    let session_key = utils::build_random_cookie_key()?;
    let identity_key = utils::build_random_cookie_key()?;

    configure_and_run_server(app_config, runtime_config, csrf_key, session_key, identity_key)
        .await?;

    if let Some(shutdown_handler) = shutdown_handler {
        shutdown_handler.shutdown()?;
    }

    Ok(())
}

/// Logs whether the backend answers with the configured key
async fn check_backend_connection(runtime_config: &config::RuntimeConfig) {
    let Some((url, anon_key)) = runtime_config.credentials() else {
        log::warn!(
            "backend not configured, every request will fail: run `scripts gen-runtime-config` with SUPABASE_URL and SUPABASE_ANON_KEY set"
        );
        return;
    };

    match SupabaseClient::new(url, anon_key, None)
        .check_connection()
        .await
    {
        ConnectionStatus::Reachable => log::info!("backend reachable at {url}"),
        ConnectionStatus::InvalidApiKey => log::error!("backend at {url} rejected the anon key"),
        ConnectionStatus::Unreachable(e) => log::warn!("backend at {url} unreachable: {e}"),
    }
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor(
    app_config: &config::AppConfig,
) -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server(
    app_config: config::AppConfig,
    runtime_config: config::RuntimeConfig,
    csrf_key: [u8; 32],
    session_key: [u8; 32],
    identity_key: [u8; 32],
) -> anyhow::Result<()> {
    let server_addr = app_config.bind_address();
    let is_prod = app_config.is_prod();
    let ssl_acceptor = if is_prod {
        Some(setup_ssl_acceptor(&app_config)?)
    } else {
        None
    };

    let server = web::server(move || {
        web::App::new()
            .wrap(
                CookieSession::private(&session_key)
                    .secure(is_prod)
                    .max_age(consts::MAX_AGE_COOKIES)
                    .name(consts::SESSION_COOKIE_NAME),
            )
            .wrap(IdentityService::new(
                CookieIdentityPolicy::new(&identity_key)
                    .name(consts::IDENTITY_COOKIE_NAME)
                    .max_age(consts::MAX_AGE_COOKIES)
                    .secure(is_prod),
            ))
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(front::AppState {
                csrf_protec: AesGcmCsrfProtection::from_key(csrf_key),
                app_config: app_config.clone(),
                runtime_config: runtime_config.clone(),
            })
            .configure(front::routes::app)
            .configure(front::routes::auth)
            .configure(front::routes::pets)
            .configure(front::routes::modals)
            .service(ntex_files::Files::new("/static", "web/static/"))
            .default_service(web::route().to(front::server::serve_not_found))
    });

    let bound_server = match ssl_acceptor {
        Some(ssl_acceptor) => server.bind_openssl(server_addr, ssl_acceptor)?,
        None => server.bind(server_addr)?,
    };

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
