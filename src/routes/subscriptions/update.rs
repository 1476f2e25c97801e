use super::{parse_id, SubscriptionsError};
use crate::{
    domain::{FieldPatch, Month, Price, ServiceName, Subscription, SubscriptionPatch, UserId},
    repository::SubscriptionRepository,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;

#[tracing::instrument(name = "Updating a subscription", skip(repository, payload))]
pub(super) async fn update_subscription(
    State(repository): State<SubscriptionRepository>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSubscriptionBody>, JsonRejection>,
) -> Result<Json<Subscription>, SubscriptionsError> {
    let id = parse_id(&id)?;
    let Json(body) = payload?;
    let patch = SubscriptionPatch::try_from(body).map_err(SubscriptionsError::Validation)?;

    let subscription = repository.update(id, patch).await?;

    Ok(Json(subscription))
}

/// Every key is optional. `end_date: null` clears the end date, while a
/// missing `end_date` key leaves it untouched.
#[derive(Deserialize)]
pub(super) struct UpdateSubscriptionBody {
    service_name: Option<String>,
    price: Option<i64>,
    user_id: Option<String>,
    start_date: Option<String>,
    #[serde(default)]
    end_date: FieldPatch<String>,
}

impl TryFrom<UpdateSubscriptionBody> for SubscriptionPatch {
    type Error = String;

    fn try_from(body: UpdateSubscriptionBody) -> Result<Self, Self::Error> {
        let patch = SubscriptionPatch {
            service_name: body.service_name.map(ServiceName::parse).transpose()?,
            price: body.price.map(Price::parse).transpose()?,
            user_id: body.user_id.map(UserId::parse).transpose()?,
            start_date: body.start_date.map(|s| Month::parse(&s)).transpose()?,
            end_date: body.end_date.try_map(|s| Month::parse(&s))?,
        };

        if let (Some(start_date), FieldPatch::Set(end_date)) = (patch.start_date, &patch.end_date) {
            if *end_date < start_date {
                return Err("end_date must not be before start_date".into());
            }
        }

        Ok(patch)
    }
}
