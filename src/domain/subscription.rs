use super::{Month, Price, ServiceName, UserId};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, FromRow, Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub service_name: ServiceName,
    pub price: Price,
    pub user_id: UserId,
    pub start_date: Month,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Month>,
}
