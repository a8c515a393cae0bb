use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use snafu::ResultExt as _;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::leetcode::StatsSource;
use crate::model::{StatRecord, Username};
use crate::stats::StatsProvider;

pub use error::*;

mod error;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Build the HTTP surface: `GET /api?username=...` for cards and `GET /health` for liveness.
///
/// Every response carries permissive CORS headers, error responses included.
pub fn create_router<S>(provider: StatsProvider<S>) -> Router
where
    S: StatsSource + Send + Sync + 'static,
{
    Router::new()
        .route("/api", get(card::<S>))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors())
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static(ALLOWED_METHODS),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static(ALLOWED_HEADERS),
                )),
        )
        .with_state(provider)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardQuery {
    pub username: Option<String>,
}

#[instrument(skip(provider))]
pub async fn card<S>(
    State(provider): State<StatsProvider<S>>, Query(query): Query<CardQuery>,
) -> Result<Json<StatRecord>>
where
    S: StatsSource + Send + Sync + 'static,
{
    let username: Username = query
        .username
        .unwrap_or_default()
        .try_into()
        .context(InvalidUsernameSnafu)?;

    let record = provider
        .card(&username)
        .await
        .context(GenerateCardSnafu)?;

    Ok(Json(record))
}

pub async fn health() -> &'static str {
    "OK"
}
