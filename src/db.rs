use anyhow::{Context, Result};
use sqlx::MySqlPool;
use strum::IntoEnumIterator;
use tracing::info;

use crate::model::attendance::MealType;

pub async fn init_db(database_url: &str) -> Result<MySqlPool> {
    MySqlPool::connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Create the users table and one attendance table per meal type.
/// The (email, date) unique key is what keeps attendance to one row per user per day.
/// Keys compare byte for byte so MySQL agrees with the memory store on what a duplicate is.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            email VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
            name VARCHAR(255) NOT NULL,
            password VARCHAR(255) NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE KEY uq_users_email (email)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create users table")?;

    for meal in MealType::iter() {
        let table = meal.table();
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
                email VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
                name VARCHAR(255) NOT NULL,
                date VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
                status VARCHAR(8) NOT NULL,
                count INT UNSIGNED NOT NULL DEFAULT 0,
                updated_at DATETIME NOT NULL,
                UNIQUE KEY uq_{table}_email_date (email, date),
                KEY idx_{table}_date (date)
            )
            "#
        );

        sqlx::query(&ddl)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create {table} table"))?;
    }

    info!("Database schema ready");
    Ok(())
}
