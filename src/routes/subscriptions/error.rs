use crate::{repository::RepositoryError, routes::ErrorBody};
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

#[derive(Debug, thiserror::Error)]
pub(super) enum SubscriptionsError {
    #[error("{0}")]
    Validation(String),
    #[error("Subscription not found")]
    NotFound,
    #[error("end_date must not be before start_date")]
    DateOrder(#[source] RepositoryError),
    #[error("Internal error")]
    UnexpectedError(#[from] anyhow::Error),
}

impl From<RepositoryError> for SubscriptionsError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(_) => Self::NotFound,
            e if e.is_date_order_violation() => Self::DateOrder(e),
            e => Self::UnexpectedError(e.into()),
        }
    }
}

impl From<JsonRejection> for SubscriptionsError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for SubscriptionsError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for SubscriptionsError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::DateOrder(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error.cause_chain = ?self, error.message = %self, "Request failed");
        } else {
            tracing::info!(error.message = %self, "Request rejected");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
