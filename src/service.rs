use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceWrite, MealType};
use crate::models::SubmitAttendance;
use crate::store::AttendanceStore;

/// Longest date string accepted on submit; the store column holds 255.
pub const MAX_DATE_LEN: usize = 64;

/// Absent, empty and whitespace-only values all count as missing.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Read, submit and report attendance for any meal type. Both meals share the
/// same atomic upsert path, so there is never more than one record per
/// (email, date) even when submissions race.
pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn AttendanceStore>) -> Self {
        Self { store }
    }

    /// `Ok(None)` means the user has not submitted for that date yet.
    pub async fn get(
        &self,
        meal: MealType,
        user: &AuthUser,
        date: Option<&str>,
    ) -> Result<Option<AttendanceRecord>, ApiError> {
        let Some(date) = present(date) else {
            warn!(%meal, email = %user.email, "Date missing in query");
            return Err(ApiError::validation("Date is required"));
        };

        debug!(%meal, email = %user.email, date, "Looking up attendance");
        let record = self.store.find(meal, &user.email, date).await?;

        info!(
            %meal,
            email = %user.email,
            date,
            found = record.is_some(),
            "Attendance lookup finished"
        );
        Ok(record)
    }

    pub async fn submit(
        &self,
        meal: MealType,
        user: &AuthUser,
        req: SubmitAttendance,
    ) -> Result<AttendanceRecord, ApiError> {
        let (Some(date), Some(status)) = (present(req.date.as_deref()), present(req.status.as_deref()))
        else {
            warn!(%meal, email = %user.email, date = ?req.date, status = ?req.status, "Missing required fields");
            return Err(ApiError::validation("Date and status are required"));
        };

        if date.chars().count() > MAX_DATE_LEN {
            warn!(%meal, email = %user.email, len = date.len(), "Date too long");
            return Err(ApiError::validation(format!(
                "Date must be at most {MAX_DATE_LEN} characters"
            )));
        }

        let status: AttendanceStatus = status
            .parse()
            .map_err(|_| ApiError::validation("Status must be 'yes' or 'no'"))?;

        let write = AttendanceWrite {
            email: user.email.clone(),
            name: user.name.clone(),
            date: date.to_string(),
            status,
            count: status.effective_count(req.count),
        };

        debug!(%meal, email = %user.email, date, %status, count = write.count, "Upserting attendance");
        let record = self.store.upsert(meal, write).await.inspect_err(|e| {
            warn!(%meal, email = %user.email, date, error = %e, "Attendance upsert failed");
        })?;

        info!(%meal, email = %user.email, date, "Attendance saved");
        Ok(record)
    }

    pub async fn report(
        &self,
        meal: MealType,
        date: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        let date = present(date);
        debug!(%meal, date = date.unwrap_or("ALL"), "Fetching report");

        let records = self.store.list(meal, date).await?;

        info!(%meal, count = records.len(), "Report fetched");
        Ok(records)
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}
