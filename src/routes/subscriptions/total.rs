use super::{parse_optional, SubscriptionsError};
use crate::{
    domain::{Month, ServiceName, UserId},
    repository::SubscriptionRepository,
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

#[tracing::instrument(name = "Computing total cost", skip(repository, parameters))]
pub(super) async fn total_cost(
    State(repository): State<SubscriptionRepository>,
    parameters: Result<Query<TotalCostParameters>, QueryRejection>,
) -> Result<Json<TotalCost>, SubscriptionsError> {
    let Query(parameters) = parameters?;
    let query = TotalCostQuery::try_from(parameters).map_err(SubscriptionsError::Validation)?;

    let total = repository
        .total_cost(
            query.from,
            query.to,
            query.user_id.as_ref(),
            query.service_name.as_ref(),
        )
        .await?;

    Ok(Json(TotalCost { total }))
}

#[derive(Debug, Deserialize)]
pub(super) struct TotalCostParameters {
    from: Option<String>,
    to: Option<String>,
    user_id: Option<String>,
    service_name: Option<String>,
}

#[derive(Serialize)]
pub(super) struct TotalCost {
    total: i64,
}

#[derive(Debug)]
struct TotalCostQuery {
    from: Month,
    to: Month,
    user_id: Option<UserId>,
    service_name: Option<ServiceName>,
}

impl TryFrom<TotalCostParameters> for TotalCostQuery {
    type Error = String;

    fn try_from(parameters: TotalCostParameters) -> Result<Self, Self::Error> {
        let (Some(from), Some(to)) = (
            parameters.from.filter(|s| !s.trim().is_empty()),
            parameters.to.filter(|s| !s.trim().is_empty()),
        ) else {
            return Err("from and to are required (MM-YYYY)".into());
        };

        let from = Month::parse(&from)?;
        let to = Month::parse(&to)?;
        if from > to {
            return Err("from must not be after to".into());
        }

        Ok(Self {
            from,
            to,
            user_id: parse_optional(parameters.user_id, UserId::parse)?,
            service_name: parse_optional(parameters.service_name, ServiceName::parse)?,
        })
    }
}
