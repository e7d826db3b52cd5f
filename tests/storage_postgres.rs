//! Store contract tests against PostgreSQL.
//!
//! Run with: cargo test --test storage_postgres --features postgres -- --nocapture
//!
//! Needs a Docker daemon: a throwaway `postgres:16` container is started,
//! migrated, and shared by every contract test in this file.

mod storage;

use std::time::Duration;

use murmur::storage::sql::postgres;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    GenericImage, ImageExt,
};

/// Container handle (keep it alive) and its connection URI.
async fn start_postgres() -> (testcontainers::ContainerAsync<GenericImage>, String) {
    // The readiness line is printed once during init and again when the
    // server is actually up, so a short sleep follows the wait.
    let image = GenericImage::new("postgres", "16")
        .with_exposed_port(5432.tcp())
        .with_wait_for(WaitFor::message_on_stdout(
            "database system is ready to accept connections",
        ));

    let container = image
        .with_env_var("POSTGRES_USER", "murmur")
        .with_env_var("POSTGRES_PASSWORD", "murmur")
        .with_env_var("POSTGRES_DB", "murmur")
        .with_startup_timeout(Duration::from_secs(60))
        .start()
        .await
        .expect("Failed to start postgres container");

    tokio::time::sleep(Duration::from_secs(1)).await;

    let host_port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get mapped port");

    let host = container
        .get_host()
        .await
        .expect("Failed to get container host");

    let connection_string = format!("postgres://murmur:murmur@{}:{}/murmur", host, host_port);

    println!("PostgreSQL available at: {}", connection_string);

    (container, connection_string)
}

async fn connect_and_migrate(connection_string: &str) -> sqlx::PgPool {
    let pool = sqlx::PgPool::connect(connection_string)
        .await
        .expect("Failed to connect to PostgreSQL");

    sqlx::migrate!("migrations/postgres")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

#[tokio::test]
async fn test_postgres_stores() {
    println!("=== PostgreSQL store tests ===");
    println!("Starting PostgreSQL container...");

    let (_container, connection_string) = start_postgres().await;
    let stores = postgres::stores(connect_and_migrate(&connection_string).await);

    println!("--- keyset scans ---");
    {
        run_keyset_tests!(&stores);
    }

    println!("--- write paths ---");
    {
        run_write_tests!(&stores);
    }

    println!("=== All PostgreSQL store tests PASSED ===");
}
