use uuid::Uuid;

const DATE_ORDER_CONSTRAINT: &str = "subscriptions_end_after_start";

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Subscription `{0}` does not exist")]
    NotFound(Uuid),
    #[error("Failed to access subscription storage")]
    Storage(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Whether the store rejected the write because it would leave
    /// `end_date` before `start_date`, e.g. a patch that moves `start_date`
    /// past the stored `end_date`.
    pub fn is_date_order_violation(&self) -> bool {
        match self {
            Self::Storage(sqlx::Error::Database(e)) => e.constraint() == Some(DATE_ORDER_CONSTRAINT),
            _ => false,
        }
    }
}
