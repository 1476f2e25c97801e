use super::SubscriptionsError;
use crate::{
    domain::{Month, NewSubscription, Price, ServiceName, Subscription, UserId},
    repository::SubscriptionRepository,
};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Deserialize;

#[tracing::instrument(name = "Adding a new subscription", skip(repository, payload))]
pub(super) async fn create_subscription(
    State(repository): State<SubscriptionRepository>,
    payload: Result<Json<CreateSubscriptionBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Subscription>), SubscriptionsError> {
    let Json(body) = payload?;
    let new_subscription =
        NewSubscription::try_from(body).map_err(SubscriptionsError::Validation)?;

    let subscription = repository.create(&new_subscription).await?;
    tracing::info!(subscription_id = %subscription.id, "Subscription created");

    Ok((StatusCode::CREATED, Json(subscription)))
}

#[derive(Deserialize)]
pub(super) struct CreateSubscriptionBody {
    service_name: String,
    price: i64,
    user_id: String,
    start_date: String,
    end_date: Option<String>,
}

impl TryFrom<CreateSubscriptionBody> for NewSubscription {
    type Error = String;

    fn try_from(body: CreateSubscriptionBody) -> Result<Self, Self::Error> {
        let service_name = ServiceName::parse(body.service_name)?;
        let price = Price::parse(body.price)?;
        let user_id = UserId::parse(body.user_id)?;
        let start_date = Month::parse(&body.start_date)?;
        let end_date = body.end_date.map(|s| Month::parse(&s)).transpose()?;

        if end_date.is_some_and(|end_date| end_date < start_date) {
            return Err("end_date must not be before start_date".into());
        }

        Ok(Self {
            service_name,
            price,
            user_id,
            start_date,
            end_date,
        })
    }
}
