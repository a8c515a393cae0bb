use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use snafu::{Location, Snafu};

use crate::model::ParseUsername;
use crate::stats::StatsError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum ApiError {
    #[snafu(display("Username is required"))]
    InvalidUsername {
        source: ParseUsername,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Error generating card"))]
    GenerateCard {
        source: StatsError,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidUsername { .. } => StatusCode::BAD_REQUEST,
            ApiError::GenerateCard { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::InvalidUsername { .. } => None,
            ApiError::GenerateCard { source, location } => {
                tracing::error!(
                    kind = ?source.kind(),
                    username = %source.username(),
                    %location,
                    "failed to generate card: {}",
                    source
                );
                Some(source.to_string())
            }
        };

        let content = ErrorResponse {
            error: self.to_string(),
            message,
        };

        (self.status(), Json(content)).into_response()
    }
}
