use actix_web::{HttpResponse, web};
use tracing::instrument;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::attendance::{AttendanceRecord, MealType};
use crate::models::{DateQuery, SubmitAttendance, SubmitResponse};
use crate::service::AttendanceService;

/// Logged-in user's attendance for one date. Responds with `null` when
/// nothing has been submitted yet.
#[utoipa::path(
    get,
    path = "/{meal}",
    params(
        ("meal" = String, Path, description = "lunch or dinner"),
        DateQuery
    ),
    responses(
        (status = 200, description = "The caller's record, or null", body = AttendanceRecord),
        (status = 400, description = "Date is required"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip_all, fields(meal = %meal.get_ref(), email = %auth.email))]
pub async fn get_attendance(
    auth: AuthUser,
    meal: web::Data<MealType>,
    service: web::Data<AttendanceService>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, ApiError> {
    let record = service
        .get(*meal.get_ref(), &auth, query.date.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(record))
}

/// Submit or update the caller's attendance for a date.
#[utoipa::path(
    post,
    path = "/{meal}",
    params(("meal" = String, Path, description = "lunch or dinner")),
    request_body = SubmitAttendance,
    responses(
        (status = 200, description = "Attendance saved", body = SubmitResponse),
        (status = 400, description = "Date and status are required"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Attendance already exists for this date"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip_all, fields(meal = %meal.get_ref(), email = %auth.email))]
pub async fn submit_attendance(
    auth: AuthUser,
    meal: web::Data<MealType>,
    service: web::Data<AttendanceService>,
    body: web::Json<SubmitAttendance>,
) -> Result<HttpResponse, ApiError> {
    let meal = *meal.get_ref();
    let attendance = service.submit(meal, &auth, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(SubmitResponse {
        success: true,
        message: format!("{} attendance saved", meal.label()),
        attendance,
    }))
}

/// Every user's attendance for the meal, newest date first. Open to
/// unauthenticated callers.
#[utoipa::path(
    get,
    path = "/{meal}/report",
    params(
        ("meal" = String, Path, description = "lunch or dinner"),
        DateQuery
    ),
    responses(
        (status = 200, description = "Attendance records", body = Vec<AttendanceRecord>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
#[instrument(skip_all, fields(meal = %meal.get_ref()))]
pub async fn report(
    meal: web::Data<MealType>,
    service: web::Data<AttendanceService>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, ApiError> {
    let records = service
        .report(*meal.get_ref(), query.date.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(records))
}
