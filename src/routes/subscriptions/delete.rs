use super::{parse_id, SubscriptionsError};
use crate::repository::SubscriptionRepository;
use axum::{
    extract::{Path, State},
    http::StatusCode,
};

#[tracing::instrument(name = "Deleting a subscription", skip(repository))]
pub(super) async fn delete_subscription(
    State(repository): State<SubscriptionRepository>,
    Path(id): Path<String>,
) -> Result<StatusCode, SubscriptionsError> {
    let id = parse_id(&id)?;
    repository.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
