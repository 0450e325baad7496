use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::attendance::AttendanceRecord;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "jane@company.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "jane@company.com")]
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct UserInfo {
    pub email: String,
    pub name: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// user email
    pub sub: String,
    pub name: String,
    pub exp: usize,
    pub jti: String,
}

/// Body of `POST /<meal>`. Fields are optional here so that missing values
/// get the service's own validation message instead of a serde error.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubmitAttendance {
    #[schema(example = "2026-01-15")]
    pub date: Option<String>,
    #[schema(example = "yes")]
    pub status: Option<String>,
    #[schema(example = 2)]
    pub count: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateQuery {
    /// Calendar date, e.g. 2026-01-15
    pub date: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SubmitResponse {
    pub success: bool,
    #[schema(example = "Lunch attendance saved")]
    pub message: String,
    pub attendance: AttendanceRecord,
}
