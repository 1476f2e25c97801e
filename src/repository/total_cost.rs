use super::{filter::push_filters, RepositoryError, SubscriptionRepository};
use crate::domain::{Month, ServiceName, UserId};
use sqlx::{Postgres, QueryBuilder};
use time::Date;

impl SubscriptionRepository {
    /// Total billed cost over the inclusive month range `[from, to]`.
    ///
    /// A subscription contributes its price once for every month of the
    /// range in which it is active, so one active for three of the queried
    /// months counts three times. A reversed range is empty and yields 0.
    #[tracing::instrument(name = "Computing total cost", skip(self, user_id, service_name), fields(
        from = %from,
        to = %to,
        user_id = user_id.map(|id| id.as_ref()),
        service_name = service_name.map(|name| name.as_ref()),
    ))]
    pub async fn total_cost(
        &self,
        from: Month,
        to: Month,
        user_id: Option<&UserId>,
        service_name: Option<&ServiceName>,
    ) -> Result<i64, RepositoryError> {
        let months: Vec<Date> = from.through(to).map(|month| month.first_day()).collect();

        let (total,) = total_cost_query(months, user_id, service_name)
            .build_query_as::<(i64,)>()
            .fetch_one(&self.db_pool)
            .await?;

        Ok(total)
    }
}

/// Joins every queried month with the subscriptions active in it and sums
/// the prices of the resulting (month, subscription) pairs.
fn total_cost_query(
    months: Vec<Date>,
    user_id: Option<&UserId>,
    service_name: Option<&ServiceName>,
) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT COALESCE(SUM(price), 0)::BIGINT FROM UNNEST(");
    query.push_bind(months).push(
        "::DATE[]) AS months(month) \
        JOIN subscriptions \
        ON start_date <= months.month \
        AND (end_date IS NULL OR end_date >= months.month)",
    );

    push_filters(&mut query, user_id, service_name);
    query
}
