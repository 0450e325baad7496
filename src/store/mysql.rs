use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, MySqlPool};

use super::{AttendanceStore, StoreError, UserStore};
use crate::model::attendance::{AttendanceRecord, AttendanceWrite, MealType};
use crate::model::user::{NewUser, User};

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AttendanceRow {
    email: String,
    name: String,
    date: String,
    status: String,
    count: u32,
    updated_at: NaiveDateTime,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|_| StoreError::Backend(format!("unexpected status '{}'", row.status)))?;

        Ok(AttendanceRecord {
            email: row.email,
            name: row.name,
            date: row.date,
            status,
            count: row.count,
            updated_at: row.updated_at.and_utc(),
        })
    }
}

fn select_sql(meal: MealType) -> String {
    format!(
        "SELECT email, name, date, status, count, updated_at FROM {} WHERE email = ? AND date = ?",
        meal.table()
    )
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn find(
        &self,
        meal: MealType,
        email: &str,
        date: &str,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let sql = select_sql(meal);
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(email)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;

        row.map(AttendanceRecord::try_from).transpose()
    }

    async fn upsert(
        &self,
        meal: MealType,
        write: AttendanceWrite,
    ) -> Result<AttendanceRecord, StoreError> {
        let upsert = format!(
            r#"
            INSERT INTO {} (email, name, date, status, count, updated_at)
            VALUES (?, ?, ?, ?, ?, UTC_TIMESTAMP())
            ON DUPLICATE KEY UPDATE
                name = VALUES(name),
                status = VALUES(status),
                count = VALUES(count),
                updated_at = VALUES(updated_at)
            "#,
            meal.table()
        );
        let select = select_sql(meal);

        // Read back inside the same transaction so the caller sees its own write
        let mut tx = self.pool.begin().await?;

        sqlx::query(&upsert)
            .bind(&write.email)
            .bind(&write.name)
            .bind(&write.date)
            .bind(write.status.as_ref())
            .bind(write.count)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, AttendanceRow>(&select)
            .bind(&write.email)
            .bind(&write.date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        row.try_into()
    }

    async fn list(
        &self,
        meal: MealType,
        date: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let base = format!(
            "SELECT email, name, date, status, count, updated_at FROM {}",
            meal.table()
        );

        let rows = match date {
            Some(date) => {
                let sql = format!("{base} WHERE date = ? ORDER BY date DESC, email ASC");
                sqlx::query_as::<_, AttendanceRow>(&sql)
                    .bind(date)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{base} ORDER BY date DESC, email ASC");
                sqlx::query_as::<_, AttendanceRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(AttendanceRecord::try_from).collect()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserStore for MySqlStore {
    async fn find_user(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> Result<(), StoreError> {
        sqlx::query(r#"INSERT INTO users (email, name, password) VALUES (?, ?, ?)"#)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.password_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
