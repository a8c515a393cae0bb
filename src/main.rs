use dotenvy::dotenv;
use snafu::ResultExt;
use tokio::net::TcpListener;

use leetcard::api;
use leetcard::config::Config;
use leetcard::database::Database;
use leetcard::error::{ApplicationError, BindAddressSnafu, LeetCodeClientSnafu, WebServerSnafu};
use leetcard::leetcode::LeetCode;
use leetcard::logger;
use leetcard::stats::StatsProvider;

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = Config::from_env()?;

    let _guard = logger::init(&config)?;

    let database = Database::new(config.database.clone());
    let leetcode = LeetCode::connect(&config.leetcode).context(LeetCodeClientSnafu)?;
    let app = api::create_router(StatsProvider::new(database, leetcode));

    let listener = TcpListener::bind(config.host)
        .await
        .context(BindAddressSnafu { address: config.host })?;

    tracing::info!(address = %config.host, "serving leetcode cards");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(WebServerSnafu)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "cannot listen for the shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("shutdown signal received, exiting");
}
