use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::{debug, error, info, instrument};

use crate::{
    auth::{
        jwt::generate_access_token,
        password::{hash_password, verify_password},
    },
    config::Config,
    error::ApiError,
    model::user::NewUser,
    models::{LoginReqDto, LoginResponse, RegisterReq, UserInfo},
    store::{StoreError, UserStore},
};

/// Width of the email and name columns.
const MAX_FIELD_LEN: usize = 255;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User registration handler
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User registered", body = Object, example = json!({
            "success": true,
            "message": "User registered successfully"
        })),
        (status = 400, description = "Missing or overlong email, name or password"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_register", skip(users, user), fields(email = %user.email))]
pub async fn register(
    user: web::Json<RegisterReq>,
    users: web::Data<dyn UserStore>,
) -> Result<HttpResponse, ApiError> {
    let user = user.into_inner();
    let email = normalize_email(&user.email);
    let name = user.name.trim();

    if email.is_empty() || name.is_empty() || user.password.is_empty() {
        info!("Validation failed: empty email, name or password");
        return Err(ApiError::validation("Email, name and password are required"));
    }

    if email.chars().count() > MAX_FIELD_LEN || name.chars().count() > MAX_FIELD_LEN {
        info!("Validation failed: email or name too long");
        return Err(ApiError::validation(format!(
            "Email and name must be at most {MAX_FIELD_LEN} characters"
        )));
    }

    let password_hash = hash_password(&user.password).map_err(|e| {
        error!(error = %e, "Password hashing failed");
        ApiError::Internal
    })?;

    let new_user = NewUser {
        email,
        name: name.to_string(),
        password_hash,
    };

    match users.insert_user(new_user).await {
        Ok(()) => {
            info!("User registered");
            Ok(HttpResponse::Created().json(json!({
                "success": true,
                "message": "User registered successfully"
            })))
        }
        Err(StoreError::Conflict) => {
            info!("Email already registered");
            Err(ApiError::Conflict("Email already registered".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(users, config, user), fields(email = %user.email))]
pub async fn login(
    user: web::Json<LoginReqDto>,
    users: web::Data<dyn UserStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    let email = normalize_email(&user.email);
    if email.is_empty() || user.password.is_empty() {
        info!("Validation failed: empty email or password");
        return Err(ApiError::validation("Email and password are required"));
    }

    debug!("Fetching user");
    let Some(db_user) = users.find_user(&email).await? else {
        info!("Invalid credentials: user not found");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if let Err(e) = verify_password(&user.password, &db_user.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    debug!(user_id = db_user.id, "Password verified, generating access token");
    let token = generate_access_token(
        &db_user.email,
        &db_user.name,
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| {
        error!(error = %e, "Token generation failed");
        ApiError::Internal
    })?;

    info!("Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        token,
        user: UserInfo {
            email: db_user.email,
            name: db_user.name,
        },
    }))
}
