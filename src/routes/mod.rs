pub mod health_check;
pub mod subscriptions;

use serde::Serialize;

/// JSON body of every error response.
#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}
