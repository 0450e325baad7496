//! Persistence seam. Handlers and the attendance service only see the traits
//! here; `main` picks the backend once at startup and closes it at shutdown.

use async_trait::async_trait;
use derive_more::Display;

use crate::model::attendance::{AttendanceRecord, AttendanceWrite, MealType};
use crate::model::user::{NewUser, User};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Display)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[display(fmt = "duplicate key")]
    Conflict,
    #[display(fmt = "store failure: {}", _0)]
    Backend(String),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        // SQLSTATE 23000 also covers NOT NULL and foreign key failures, only
        // duplicate keys are conflicts
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return StoreError::Conflict;
            }
        }
        StoreError::Backend(e.to_string())
    }
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn find(
        &self,
        meal: MealType,
        email: &str,
        date: &str,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Atomically update the record for (email, date) or insert it, and
    /// return the stored result.
    async fn upsert(
        &self,
        meal: MealType,
        write: AttendanceWrite,
    ) -> Result<AttendanceRecord, StoreError>;

    /// All records for the meal, optionally for one date, newest date first.
    async fn list(
        &self,
        meal: MealType,
        date: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn close(&self);
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with `StoreError::Conflict` when the email is already registered.
    async fn insert_user(&self, user: NewUser) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::fmt;

    #[derive(Debug)]
    struct FakeDbError {
        unique: bool,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message())
        }
    }

    impl std::error::Error for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            if self.unique {
                "Duplicate entry 'a@x.io-2026-01-01' for key 'uq_lunch_attendance_email_date'"
            } else {
                "Column 'name' cannot be null"
            }
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23000"))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::NotNullViolation
            }
        }
    }

    #[test]
    fn duplicate_key_becomes_conflict() {
        let err = sqlx::Error::Database(Box::new(FakeDbError { unique: true }));
        assert!(matches!(StoreError::from(err), StoreError::Conflict));
    }

    #[test]
    fn other_integrity_errors_stay_backend_failures() {
        let err = sqlx::Error::Database(Box::new(FakeDbError { unique: false }));
        assert!(matches!(StoreError::from(err), StoreError::Backend(_)));
    }
}
