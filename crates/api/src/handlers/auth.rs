//! Handlers for registration, login, and the current-user endpoint.

use ausverity_core::error::CoreError;
use ausverity_core::roles::{is_firm_owner_role, is_lawyer_role, validate_role, ROLE_ADMIN};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use ausverity_db::models::firm::CreateFirmProfile;
use ausverity_db::models::lawyer::CreateLawyerProfile;
use ausverity_db::models::user::{CreateUser, UserResponse};
use ausverity_db::repositories::{FirmRepo, LawyerRepo, UserRepo};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Minimum password length enforced on registration.
const MIN_PASSWORD_LENGTH: usize = 12;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    pub role: String,
    /// Public name for the lawyer or firm profile created with the account.
    /// Defaults to `full_name` for lawyer profiles; required for firms.
    pub profile_name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for successful registration and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account plus the profile rows its role implies: a draft lawyer
/// profile for lawyer roles, a draft firm for firm-owner roles, both for the
/// dual role.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    validate_role(&input.role).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    if input.role == ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot self-register as admin".into(),
        )));
    }

    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    if is_firm_owner_role(&input.role) && input.profile_name.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Firm name (profile_name) is required for firm owner accounts".into(),
        )));
    }

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            password_hash: hashed,
            full_name: input.full_name.clone(),
            role: input.role.clone(),
        },
    )
    .await?;

    if is_lawyer_role(&user.role) {
        let display_name = input
            .profile_name
            .clone()
            .unwrap_or_else(|| input.full_name.clone());
        LawyerRepo::create(
            &state.pool,
            &CreateLawyerProfile {
                user_id: user.id,
                display_name,
            },
        )
        .await?;
    }
    if is_firm_owner_role(&user.role) {
        // Presence checked above.
        let name = input.profile_name.clone().unwrap_or_default();
        FirmRepo::create(
            &state.pool,
            &CreateFirmProfile {
                owner_user_id: user.id,
                name,
            },
        )
        .await?;
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse::from(&user),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Exchange email + password for an access token. Missing accounts and bad
/// passwords both answer 401 so callers cannot probe for registered emails.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))?;

    let verified = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !verified {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// GET /api/v1/auth/me
///
/// The authenticated user's own account record.
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}
