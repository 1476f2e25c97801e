use crate::helpers::TestApp;
use claims::{assert_err, assert_matches, assert_ok};
use subtrack::{
    domain::{FieldPatch, Month, NewSubscription, Price, ServiceName, SubscriptionPatch, UserId},
    repository::{ListFilter, Pagination, RepositoryError},
};
use uuid::Uuid;

fn month(year: i32, month: u8) -> Month {
    Month::new(year, month).unwrap()
}

fn new_subscription(service_name: &str, price: i64, start: Month, end: Option<Month>) -> NewSubscription {
    NewSubscription {
        service_name: ServiceName::parse(service_name.into()).unwrap(),
        price: Price::parse(price).unwrap(),
        user_id: UserId::parse("user-1".into()).unwrap(),
        start_date: start,
        end_date: end,
    }
}

#[tokio::test]
async fn create_echoes_every_field() {
    // given
    let app = TestApp::spawn().await;
    let repository = app.repository();
    let input = new_subscription("Netflix", 999, month(2024, 1), Some(month(2024, 6)));

    // when
    let created = assert_ok!(repository.create(&input).await);

    // then
    assert_eq!(created.service_name, input.service_name);
    assert_eq!(created.price, input.price);
    assert_eq!(created.user_id, input.user_id);
    assert_eq!(created.start_date, input.start_date);
    assert_eq!(created.end_date, input.end_date);
    assert!(!created.id.is_nil());
}

#[tokio::test]
async fn unknown_ids_yield_not_found_for_every_operation() {
    // given
    let app = TestApp::spawn().await;
    let repository = app.repository();
    let id = Uuid::new_v4();
    let patch = SubscriptionPatch {
        price: Some(Price::parse(5).unwrap()),
        ..Default::default()
    };

    // then
    assert_matches!(repository.get(id).await, Err(RepositoryError::NotFound(missing)) if missing == id);
    assert_matches!(repository.delete(id).await, Err(RepositoryError::NotFound(_)));
    assert_matches!(repository.update(id, patch).await, Err(RepositoryError::NotFound(_)));
    assert_matches!(
        repository.update(id, SubscriptionPatch::default()).await,
        Err(RepositoryError::NotFound(_))
    );
}

#[tokio::test]
async fn clearing_end_date_is_visible_to_get() {
    // given
    let app = TestApp::spawn().await;
    let repository = app.repository();
    let created = repository
        .create(&new_subscription("Netflix", 999, month(2024, 1), Some(month(2024, 6))))
        .await
        .unwrap();
    let patch = SubscriptionPatch {
        end_date: FieldPatch::Clear,
        ..Default::default()
    };

    // when
    repository.update(created.id, patch).await.unwrap();

    // then
    let fetched = repository.get(created.id).await.unwrap();
    assert_eq!(fetched.end_date, None);
    assert_eq!(fetched.price, created.price);
}

#[tokio::test]
async fn concurrent_deletes_succeed_at_most_once() {
    // given
    let app = TestApp::spawn().await;
    let repository = app.repository();
    let created = repository
        .create(&new_subscription("Netflix", 999, month(2024, 1), None))
        .await
        .unwrap();

    // when
    let (first, second) = tokio::join!(repository.delete(created.id), repository.delete(created.id));

    // then
    let successes = [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn months_read_back_truncated_to_the_first_day() {
    // given
    let app = TestApp::spawn().await;
    let repository = app.repository();
    let created = repository
        .create(&new_subscription("Netflix", 999, month(2024, 1), None))
        .await
        .unwrap();
    sqlx::query("UPDATE subscriptions SET start_date = '2024-01-17' WHERE id = $1")
        .bind(created.id)
        .execute(&app.db_pool)
        .await
        .unwrap();

    // when
    let fetched = repository.get(created.id).await.unwrap();

    // then
    assert_eq!(fetched.start_date, month(2024, 1));
}

#[tokio::test]
async fn total_cost_sums_price_per_active_month() {
    // given
    let app = TestApp::spawn().await;
    let repository = app.repository();
    repository
        .create(&new_subscription("A", 100, month(2024, 1), Some(month(2024, 3))))
        .await
        .unwrap();
    repository
        .create(&new_subscription("B", 200, month(2024, 2), None))
        .await
        .unwrap();
    let other_user = UserId::parse("user-2".into()).unwrap();

    // when
    let quarter = repository
        .total_cost(month(2024, 1), month(2024, 3), None, None)
        .await
        .unwrap();
    let february = repository
        .total_cost(month(2024, 2), month(2024, 2), None, None)
        .await
        .unwrap();
    let excluded = repository
        .total_cost(month(2024, 1), month(2024, 3), Some(&other_user), None)
        .await
        .unwrap();
    let reversed = repository
        .total_cost(month(2024, 3), month(2024, 1), None, None)
        .await
        .unwrap();

    // then
    assert_eq!(quarter, 700);
    assert_eq!(february, 300);
    assert_eq!(excluded, 0);
    assert_eq!(reversed, 0);
}

#[tokio::test]
async fn list_limit_boundaries() {
    // given
    let app = TestApp::spawn().await;
    let repository = app.repository();
    for _ in 0..3 {
        repository
            .create(&new_subscription("Netflix", 1, month(2024, 1), None))
            .await
            .unwrap();
    }
    let filter = |limit| ListFilter {
        pagination: Pagination::new(Some(limit), None),
        ..Default::default()
    };

    // when
    let two = repository.list(&filter(2)).await.unwrap();
    let clamped = repository.list(&filter(201)).await.unwrap();

    // then
    assert_eq!(two.len(), 2);
    assert_eq!(clamped.len(), 3);
}

#[tokio::test]
async fn stored_rows_are_read_back_as_they_are() {
    // given
    let app = TestApp::spawn().await;
    let repository = app.repository();
    let id = Uuid::new_v4();
    let long_name = "x".repeat(300);
    sqlx::query(
        r#"
        INSERT INTO subscriptions (id, service_name, price, user_id, start_date)
        VALUES ($1, $2, 100, ' user-1 ', '2024-01-01')
        "#,
    )
    .bind(id)
    .bind(&long_name)
    .execute(&app.db_pool)
    .await
    .unwrap();

    // when
    let listed = assert_ok!(repository.list(&ListFilter::default()).await);
    let fetched = assert_ok!(repository.get(id).await);

    // then
    assert_eq!(listed.len(), 1);
    assert_eq!(fetched.service_name.as_ref(), long_name);
    assert_eq!(fetched.user_id.as_ref(), " user-1 ");
}

#[tokio::test]
async fn only_the_date_order_check_is_reported_as_such() {
    // given
    let app = TestApp::spawn().await;
    let repository = app.repository();
    let created = repository
        .create(&new_subscription("Netflix", 999, month(2024, 1), Some(month(2024, 3))))
        .await
        .unwrap();
    let patch = SubscriptionPatch {
        start_date: Some(month(2024, 6)),
        ..Default::default()
    };

    // when
    let date_order = repository.update(created.id, patch).await;
    let zero_price = sqlx::query("UPDATE subscriptions SET price = 0 WHERE id = $1")
        .bind(created.id)
        .execute(&app.db_pool)
        .await
        .map_err(RepositoryError::from);

    // then
    assert!(assert_err!(date_order).is_date_order_violation());
    assert!(!assert_err!(zero_price).is_date_order_violation());
}
