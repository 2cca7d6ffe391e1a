use std::{sync::Arc, time::Duration};

use authapi::{AuthApi, CachedAuthApi, InMemoryTokenCache};
use authapi_reqwest::ReqwestAuthApi;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Fetches a bearer token from an AuthApi authority")]
struct Opts {
    /// The AuthApi base URL, ending in `/`
    #[arg(long, env = "AUTH_API")]
    api: reqwest::Url,

    /// The username to log in with
    #[arg(short, long, env = "AUTH_USER")]
    user: String,

    /// The password to log in with
    #[arg(short, long, env = "AUTH_PASS", hide_env_values = true)]
    pass: String,

    /// Exchange the login token for a refreshed one
    #[arg(short, long)]
    refresh: bool,

    /// Request timeout, in seconds
    #[arg(long, env = "AUTH_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(opts.timeout_secs))
        .build()?;

    let auth_api = CachedAuthApi::new(
        ReqwestAuthApi::new(client, opts.api),
        InMemoryTokenCache::new(),
    );

    let token = auth_api
        .get_token(&opts.user, &opts.pass, opts.refresh)
        .await?;

    tracing::info!(
        token = format_args!("{:#?}", token.content()),
        lifetime = %token.lifetime(),
        "obtained access token"
    );

    let again = auth_api
        .get_token(&opts.user, &opts.pass, opts.refresh)
        .await?;

    if Arc::ptr_eq(&token, &again) {
        tracing::info!("second request was served from the cache");
    } else {
        tracing::warn!("second request went back to the AuthApi");
    }

    Ok(())
}
