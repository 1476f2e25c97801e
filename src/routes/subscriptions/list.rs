use super::{parse_optional, SubscriptionsError};
use crate::{
    domain::{ServiceName, Subscription, UserId},
    repository::{ListFilter, Pagination, SubscriptionRepository},
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

#[tracing::instrument(name = "Listing subscriptions", skip(repository, parameters))]
pub(super) async fn list_subscriptions(
    State(repository): State<SubscriptionRepository>,
    parameters: Result<Query<ListParameters>, QueryRejection>,
) -> Result<Json<Vec<Subscription>>, SubscriptionsError> {
    let Query(parameters) = parameters?;
    let filter = ListFilter::try_from(parameters).map_err(SubscriptionsError::Validation)?;

    let subscriptions = repository.list(&filter).await?;

    Ok(Json(subscriptions))
}

#[derive(Debug, Deserialize)]
pub(super) struct ListParameters {
    user_id: Option<String>,
    service_name: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl TryFrom<ListParameters> for ListFilter {
    type Error = String;

    fn try_from(parameters: ListParameters) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: parse_optional(parameters.user_id, UserId::parse)?,
            service_name: parse_optional(parameters.service_name, ServiceName::parse)?,
            pagination: Pagination::new(parameters.limit, parameters.offset),
        })
    }
}
