// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        json::AppJson,
        rbac::{FieldWorkers, RequireRole},
    },
    models::auth::{AuthResponse, AvailabilityPayload, LoginUserPayload, RegisterUserPayload, User},
    services::dashboard_service,
};

fn auth_response(token: String, user: User) -> AuthResponse {
    AuthResponse {
        token,
        dashboard: dashboard_service::select(&user),
        user,
    }
}

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Conta criada (papel user)", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já existe")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<RegisterUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let (token, user) = app_state
        .auth_service
        .register_user(&payload.name, &payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(auth_response(token, user))))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<LoginUserPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let (token, user) = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(auth_response(token, user)))
}

// POST /api/auth/admin/login
#[utoipa::path(
    post,
    path = "/api/auth/admin/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login administrativo realizado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas"),
        (status = 403, description = "Conta sem acesso administrativo")
    )
)]
pub async fn admin_login(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<LoginUserPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let (token, user) = app_state
        .auth_service
        .admin_login(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(auth_response(token, user)))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário autenticado", body = User),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

// PUT /api/users/me/availability
#[utoipa::path(
    put,
    path = "/api/users/me/availability",
    tag = "Users",
    request_body = AvailabilityPayload,
    responses(
        (status = 200, description = "Disponibilidade atualizada", body = User),
        (status = 403, description = "Papel sem disponibilidade")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_availability(
    State(app_state): State<AppState>,
    locale: Locale,
    gate: RequireRole<FieldWorkers>,
    AppJson(payload): AppJson<AvailabilityPayload>,
) -> Result<Json<User>, ApiError> {
    let user = app_state
        .auth_service
        .set_availability(gate.user.id, payload.available)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(user))
}
