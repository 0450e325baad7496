use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::models::{LoginReqDto, LoginResponse, RegisterReq, SubmitAttendance, SubmitResponse, UserInfo};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Meal Attendance API",
        version = "0.1.0",
        description = r#"
## Meal Attendance

Records who is coming to **lunch** and **dinner** on a given day.

- `GET /{meal}?date=` returns the caller's own record for the date, or `null`
- `POST /{meal}` submits or updates it; a repeated submission overwrites
- `GET /{meal}/report` lists everyone's records, newest date first (no auth)

`{meal}` is `lunch` or `dinner`. Obtain a bearer token from `/auth/login`.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,

        crate::api::attendance::get_attendance,
        crate::api::attendance::submit_attendance,
        crate::api::attendance::report
    ),
    components(
        schemas(
            AttendanceRecord,
            AttendanceStatus,
            SubmitAttendance,
            SubmitResponse,
            RegisterReq,
            LoginReqDto,
            LoginResponse,
            UserInfo
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Attendance", description = "Lunch and dinner attendance"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_meal_and_auth_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        for expected in ["/auth/login", "/auth/register", "/{meal}", "/{meal}/report"] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}");
        }
    }
}
