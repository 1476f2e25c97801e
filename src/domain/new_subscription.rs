use super::{Month, Price, ServiceName, UserId};

#[derive(Debug)]
pub struct NewSubscription {
    pub service_name: ServiceName,
    pub price: Price,
    pub user_id: UserId,
    pub start_date: Month,
    pub end_date: Option<Month>,
}
