use super::{FieldPatch, Month, Price, ServiceName, UserId};

/// Sparse update of a subscription. `None` / [`FieldPatch::Unchanged`] fields
/// are left as they are.
#[derive(Debug, Default)]
pub struct SubscriptionPatch {
    pub service_name: Option<ServiceName>,
    pub price: Option<Price>,
    pub user_id: Option<UserId>,
    pub start_date: Option<Month>,
    pub end_date: FieldPatch<Month>,
}

impl SubscriptionPatch {
    pub fn is_empty(&self) -> bool {
        self.service_name.is_none()
            && self.price.is_none()
            && self.user_id.is_none()
            && self.start_date.is_none()
            && self.end_date.is_unchanged()
    }
}
