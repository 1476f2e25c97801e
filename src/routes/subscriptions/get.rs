use super::{parse_id, SubscriptionsError};
use crate::{domain::Subscription, repository::SubscriptionRepository};
use axum::{
    extract::{Path, State},
    Json,
};

#[tracing::instrument(name = "Fetching a subscription", skip(repository))]
pub(super) async fn get_subscription(
    State(repository): State<SubscriptionRepository>,
    Path(id): Path<String>,
) -> Result<Json<Subscription>, SubscriptionsError> {
    let id = parse_id(&id)?;
    let subscription = repository.get(id).await?;

    Ok(Json(subscription))
}
