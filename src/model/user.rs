use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub password: String,
    pub created_at: NaiveDateTime,
}

pub struct NewUser {
    pub email: String,
    pub name: String,
    /// argon2 PHC string, never the raw password
    pub password_hash: String,
}
