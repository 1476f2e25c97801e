mod field_patch;
mod month;
mod new_subscription;
mod price;
mod service_name;
mod subscription;
mod subscription_patch;
mod user_id;

pub use field_patch::FieldPatch;
pub use month::{Month, MonthRange};
pub use new_subscription::NewSubscription;
pub use price::Price;
pub use service_name::ServiceName;
pub use subscription::Subscription;
pub use subscription_patch::SubscriptionPatch;
pub use user_id::UserId;
