mod create;
mod delete;
mod error;
mod get;
mod list;
mod total;
mod update;

use crate::app_state::AppState;
use axum::{routing::get, Router};
use create::create_subscription;
use delete::delete_subscription;
use error::SubscriptionsError;
use get::get_subscription;
use list::list_subscriptions;
use total::total_cost;
use update::update_subscription;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route("/subscriptions/total", get(total_cost))
        .route(
            "/subscriptions/:id",
            get(get_subscription)
                .patch(update_subscription)
                .delete(delete_subscription),
        )
}

fn parse_id(raw: &str) -> Result<Uuid, SubscriptionsError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| SubscriptionsError::Validation(format!("`{raw}` is not a valid id")))
}

/// Blank query parameters count as absent.
fn parse_optional<T>(
    value: Option<String>,
    parse: impl FnOnce(String) -> Result<T, String>,
) -> Result<Option<T>, String> {
    match value {
        Some(value) if !value.trim().is_empty() => parse(value).map(Some),
        _ => Ok(None),
    }
}
