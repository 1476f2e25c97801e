use super::{
    filter::{push_filters, ListFilter},
    RepositoryError,
};
use crate::domain::{NewSubscription, Subscription, SubscriptionPatch};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const RETURNING_COLUMNS: &str =
    " RETURNING id, service_name, price, user_id, start_date, end_date";

/// Storage of [`Subscription`] records.
///
/// Owns a handle to the connection pool it was built with. Every call checks
/// out its own connection, so one repository is shared freely between
/// requests.
#[derive(Clone)]
pub struct SubscriptionRepository {
    pub(super) db_pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    #[tracing::instrument(
        name = "Saving new subscription",
        skip(self, new_subscription),
        fields(
            service_name = %new_subscription.service_name.as_ref(),
            user_id = %new_subscription.user_id.as_ref(),
        )
    )]
    pub async fn create(
        &self,
        new_subscription: &NewSubscription,
    ) -> Result<Subscription, RepositoryError> {
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (id, service_name, price, user_id, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, service_name, price, user_id, start_date, end_date
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_subscription.service_name.as_ref())
        .bind(new_subscription.price.value())
        .bind(new_subscription.user_id.as_ref())
        .bind(new_subscription.start_date)
        .bind(new_subscription.end_date)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(subscription)
    }

    #[tracing::instrument(name = "Fetching subscription", skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Subscription, RepositoryError> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, service_name, price, user_id, start_date, end_date
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(RepositoryError::NotFound(id))
    }

    #[tracing::instrument(name = "Deleting subscription", skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        Ok(())
    }

    /// Applies the fields present in `patch` in a single `UPDATE` statement.
    /// An empty patch reads the record back unchanged.
    #[tracing::instrument(name = "Updating subscription", skip(self, patch))]
    pub async fn update(
        &self,
        id: Uuid,
        patch: SubscriptionPatch,
    ) -> Result<Subscription, RepositoryError> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        update_query(id, patch)
            .build_query_as::<Subscription>()
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(RepositoryError::NotFound(id))
    }

    #[tracing::instrument(name = "Listing subscriptions", skip(self))]
    pub async fn list(&self, filter: &ListFilter) -> Result<Vec<Subscription>, RepositoryError> {
        let subscriptions = list_query(filter)
            .build_query_as::<Subscription>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(subscriptions)
    }
}

fn update_query(id: Uuid, patch: SubscriptionPatch) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("UPDATE subscriptions SET ");

    {
        let mut assignments = query.separated(", ");
        if let Some(service_name) = patch.service_name {
            assignments
                .push("service_name = ")
                .push_bind_unseparated(service_name.as_ref().to_owned());
        }
        if let Some(price) = patch.price {
            assignments
                .push("price = ")
                .push_bind_unseparated(price.value());
        }
        if let Some(user_id) = patch.user_id {
            assignments
                .push("user_id = ")
                .push_bind_unseparated(user_id.as_ref().to_owned());
        }
        if let Some(start_date) = patch.start_date {
            assignments
                .push("start_date = ")
                .push_bind_unseparated(start_date);
        }
        if let Some(end_date) = patch.end_date.into_update() {
            assignments
                .push("end_date = ")
                .push_bind_unseparated(end_date);
        }
    }

    query
        .push(" WHERE id = ")
        .push_bind(id)
        .push(RETURNING_COLUMNS);
    query
}

fn list_query(filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(
        "SELECT id, service_name, price, user_id, start_date, end_date FROM subscriptions",
    );

    push_filters(
        &mut query,
        filter.user_id.as_ref(),
        filter.service_name.as_ref(),
    );

    query
        .push(" ORDER BY start_date DESC LIMIT ")
        .push_bind(filter.pagination.limit())
        .push(" OFFSET ")
        .push_bind(filter.pagination.offset());
    query
}
