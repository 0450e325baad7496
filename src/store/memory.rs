use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{AttendanceStore, StoreError, UserStore};
use crate::model::attendance::{AttendanceRecord, AttendanceWrite, MealType};
use crate::model::user::{NewUser, User};

type AttendanceKey = (MealType, String, String);

#[derive(Default)]
struct Inner {
    attendance: HashMap<AttendanceKey, AttendanceRecord>,
    users: HashMap<String, User>,
    next_user_id: u64,
}

/// Process-local store. Every operation takes the lock once, so an upsert is a
/// single atomic step just like the MySQL `ON DUPLICATE KEY UPDATE`.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("memory store poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("memory store poisoned".into()))
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn find(
        &self,
        meal: MealType,
        email: &str,
        date: &str,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let key = (meal, email.to_string(), date.to_string());
        Ok(self.read()?.attendance.get(&key).cloned())
    }

    async fn upsert(
        &self,
        meal: MealType,
        write: AttendanceWrite,
    ) -> Result<AttendanceRecord, StoreError> {
        let key = (meal, write.email.clone(), write.date.clone());
        let record = AttendanceRecord {
            email: write.email,
            name: write.name,
            date: write.date,
            status: write.status,
            count: write.count,
            updated_at: Utc::now(),
        };

        self.write()?.attendance.insert(key, record.clone());
        Ok(record)
    }

    async fn list(
        &self,
        meal: MealType,
        date: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut records: Vec<AttendanceRecord> = self
            .read()?
            .attendance
            .iter()
            .filter(|((m, _, d), _)| *m == meal && date.is_none_or(|want| want == d))
            .map(|(_, record)| record.clone())
            .collect();

        records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.email.cmp(&b.email)));
        Ok(records)
    }

    async fn close(&self) {}
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.get(email).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if inner.users.contains_key(&user.email) {
            return Err(StoreError::Conflict);
        }

        inner.next_user_id += 1;
        let id = inner.next_user_id;
        inner.users.insert(
            user.email.clone(),
            User {
                id,
                email: user.email,
                name: user.name,
                password: user.password_hash,
                created_at: Utc::now().naive_utc(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;

    fn write(email: &str, date: &str, status: AttendanceStatus, count: u32) -> AttendanceWrite {
        AttendanceWrite {
            email: email.into(),
            name: "Test User".into(),
            date: date.into(),
            status,
            count,
        }
    }

    #[actix_web::test]
    async fn upsert_overwrites_same_key() {
        let store = MemoryStore::new();
        store
            .upsert(MealType::Lunch, write("a@x.io", "2026-01-01", AttendanceStatus::Yes, 3))
            .await
            .unwrap();
        store
            .upsert(MealType::Lunch, write("a@x.io", "2026-01-01", AttendanceStatus::No, 0))
            .await
            .unwrap();

        let all = store.list(MealType::Lunch, None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, AttendanceStatus::No);
        assert_eq!(all[0].count, 0);
    }

    #[actix_web::test]
    async fn meals_are_kept_apart() {
        let store = MemoryStore::new();
        store
            .upsert(MealType::Lunch, write("a@x.io", "2026-01-01", AttendanceStatus::Yes, 1))
            .await
            .unwrap();

        assert!(store.find(MealType::Dinner, "a@x.io", "2026-01-01").await.unwrap().is_none());
        assert!(store.find(MealType::Lunch, "a@x.io", "2026-01-01").await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn duplicate_user_is_a_conflict() {
        let store = MemoryStore::new();
        let new_user = || NewUser {
            email: "a@x.io".into(),
            name: "A".into(),
            password_hash: "hash".into(),
        };

        store.insert_user(new_user()).await.unwrap();
        assert!(matches!(store.insert_user(new_user()).await, Err(StoreError::Conflict)));
        assert_eq!(store.find_user("a@x.io").await.unwrap().unwrap().id, 1);
    }
}
