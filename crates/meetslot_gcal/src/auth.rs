// File: crates/meetslot_gcal/src/auth.rs
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{
        read_application_secret, read_service_account_key, InstalledFlowAuthenticator,
        InstalledFlowReturnMethod, ServiceAccountAuthenticator,
    },
    CalendarHub,
};
use meetslot_config::GcalConfig;
use std::path::Path;
use tracing::info;

use crate::service::GcalServiceError;

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

pub const DEFAULT_CLIENT_SECRET_PATH: &str = "credentials.json";
pub const DEFAULT_TOKEN_CACHE_PATH: &str = "token.json";

fn auth_err(context: &str, err: impl std::fmt::Display) -> GcalServiceError {
    GcalServiceError::Auth(format!("{context}: {err}"))
}

/// Builds an authenticated hub.
///
/// A configured `key_path` selects service-account auth. Otherwise the
/// installed-app flow runs against `client_secret_path`, caching the token in
/// `token_cache_path` so later runs refresh it silently.
pub async fn create_calendar_hub(config: &GcalConfig) -> Result<HubType, GcalServiceError> {
    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| GcalServiceError::Transient(format!("loading native TLS roots: {e}")))?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    if let Some(key_path) = config.key_path.as_deref() {
        let sa_key = read_service_account_key(Path::new(key_path))
            .await
            .map_err(|e| auth_err(&format!("reading service account key {key_path}"), e))?;
        let auth = ServiceAccountAuthenticator::builder(sa_key)
            .build()
            .await
            .map_err(|e| auth_err("building service account authenticator", e))?;
        info!("Using service account credentials from {}", key_path);
        return Ok(CalendarHub::new(client, auth));
    }

    let secret_path = config
        .client_secret_path
        .as_deref()
        .unwrap_or(DEFAULT_CLIENT_SECRET_PATH);
    let token_path = config
        .token_cache_path
        .as_deref()
        .unwrap_or(DEFAULT_TOKEN_CACHE_PATH);

    let secret = read_application_secret(Path::new(secret_path))
        .await
        .map_err(|e| auth_err(&format!("reading client secret {secret_path}"), e))?;
    let auth = InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::HTTPRedirect)
        .persist_tokens_to_disk(token_path)
        .build()
        .await
        .map_err(|e| auth_err("building installed-flow authenticator", e))?;
    info!("Using installed-app credentials, token cache at {}", token_path);

    Ok(CalendarHub::new(client, auth))
}
