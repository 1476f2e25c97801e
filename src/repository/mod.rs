mod error;
mod filter;
mod subscriptions;
mod total_cost;

pub use error::RepositoryError;
pub use filter::{ListFilter, Pagination, DEFAULT_LIMIT, MAX_LIMIT};
pub use subscriptions::SubscriptionRepository;
