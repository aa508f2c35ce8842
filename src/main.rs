mod api;
mod auth;
mod config;
mod db;
mod extractor;
mod middleware;

use std::sync::Arc;

use config::Config;
use db::SupabaseClient;
use poem::{listener::TcpListener, Server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 可选, 部署时直接读环境变量
    dotenvy::dotenv().ok();

    if std::env::var_os("RUST_LOG").is_none() {
        unsafe {
            std::env::set_var("RUST_LOG", "INFO");
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let client = Arc::new(SupabaseClient::new(&config)?);

    let app = api::build_app(client, config.session_cookie_name());

    info!(
        "listening on {}, auth project {}",
        config.addr,
        config.project_ref()
    );

    Server::new(TcpListener::bind(config.addr.as_str()))
        .run(app)
        .await?;

    Ok(())
}
