use crate::domain::{ServiceName, UserId};
use sqlx::{Postgres, QueryBuilder};

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;

/// Page window for listing. Out-of-range values are clamped, never rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    limit: i64,
    offset: i64,
}

impl Pagination {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = match limit {
            Some(limit) if limit > 0 && limit <= MAX_LIMIT => limit,
            _ => DEFAULT_LIMIT,
        };
        let offset = offset.unwrap_or(0).max(0);

        Self { limit, offset }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Default)]
pub struct ListFilter {
    pub user_id: Option<UserId>,
    pub service_name: Option<ServiceName>,
    pub pagination: Pagination,
}

/// Appends equality predicates for whichever filters are present.
pub(super) fn push_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    user_id: Option<&UserId>,
    service_name: Option<&ServiceName>,
) {
    let mut keyword = " WHERE ";

    if let Some(user_id) = user_id {
        query
            .push(keyword)
            .push("user_id = ")
            .push_bind(user_id.as_ref().to_owned());
        keyword = " AND ";
    }
    if let Some(service_name) = service_name {
        query
            .push(keyword)
            .push("service_name = ")
            .push_bind(service_name.as_ref().to_owned());
    }
}
