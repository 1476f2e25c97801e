use once_cell::sync::Lazy;
use reqwest::{Client, Response};
use serde_json::Value;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::SocketAddr;
use subtrack::{
    configuration::{get_configuration, DatabaseSettings, Settings},
    repository::SubscriptionRepository,
    startup::{get_connection_pool, Application},
    telemetry::{get_subscriber, init_subscriber},
};
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    let name = "test";
    let default_env_filter = "info";
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::stdout);
        init_subscriber(subscriber).expect("Failed to initialize tracing");
    } else {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::sink);
        init_subscriber(subscriber).expect("Failed to initialize tracing");
    }
});

static FAILED_TO_EXECUTE_REQUEST: &str = "Failed to execute request";

pub struct TestApp {
    pub address: SocketAddr,
    pub db_pool: PgPool,
    client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let mut config = test_configuration();
        config.application.port = 0;

        create_database(&config.database).await;
        let db_pool = get_connection_pool(&config.database)
            .await
            .expect("Failed to connect to Postgres");

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let address = app.local_addr().expect("Failed to get local address");

        tokio::spawn(app.run_until_stopped());

        Self {
            address,
            db_pool,
            client: Client::new(),
        }
    }

    pub fn repository(&self) -> SubscriptionRepository {
        SubscriptionRepository::new(self.db_pool.clone())
    }

    pub async fn get_health_check(&self) -> Response {
        self.client
            .get(self.url("/health_check"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_subscriptions(&self, body: &Value) -> Response {
        self.client
            .post(self.url("/subscriptions"))
            .json(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_raw_subscriptions(&self, body: &'static str) -> Response {
        self.client
            .post(self.url("/subscriptions"))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    /// Creates a subscription and returns its JSON representation.
    pub async fn create_subscription(&self, body: Value) -> Value {
        let response = self.post_subscriptions(&body).await;
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.expect("Failed to parse response body")
    }

    pub async fn get_subscription(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/subscriptions/{id}")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn patch_subscription(&self, id: &str, body: &Value) -> Response {
        self.client
            .patch(self.url(&format!("/subscriptions/{id}")))
            .json(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn delete_subscription(&self, id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/subscriptions/{id}")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn list_subscriptions(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(self.url("/subscriptions"))
            .query(query)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_total_cost(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(self.url("/subscriptions/total"))
            .query(query)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("http://{}{endpoint}", self.address)
    }
}

/// Configuration pointing at a fresh, uniquely named database.
pub fn test_configuration() -> Settings {
    Lazy::force(&TRACING);

    let mut config = get_configuration().expect("Failed to read configuration");
    config.database.database_name = Uuid::new_v4().to_string();
    config
}

pub async fn create_database(configuration: &DatabaseSettings) {
    let mut conn = PgConnection::connect_with(&configuration.without_db())
        .await
        .expect("Failed to connect to Postgres");

    conn.execute(format!(r#"CREATE DATABASE "{}";"#, configuration.database_name).as_str())
        .await
        .expect("Failed to create database");
}

/// Creates an empty database and returns a pool connected to it.
pub async fn empty_database() -> PgPool {
    let config = test_configuration();
    create_database(&config.database).await;

    get_connection_pool(&config.database)
        .await
        .expect("Failed to connect to Postgres")
}

pub fn subscription_body(service_name: &str, price: i64, user_id: &str, start: &str) -> Value {
    serde_json::json!({
        "service_name": service_name,
        "price": price,
        "user_id": user_id,
        "start_date": start,
    })
}
