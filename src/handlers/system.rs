// src/handlers/system.rs

use axum::{extract::State, http::StatusCode, Json};
use utoipa::OpenApi;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    docs::ApiDoc,
    middleware::i18n::Locale,
};

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "System",
    responses(
        (status = 200, description = "Serviço no ar"),
        (status = 503, description = "Banco de dados indisponível")
    )
)]
pub async fn health(State(app_state): State<AppState>, locale: Locale) -> Result<&'static str, ApiError> {
    if let Some(pool) = &app_state.db_pool {
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;
    }
    Ok("OK")
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

// Qualquer rota desconhecida
pub async fn not_found(State(app_state): State<AppState>, locale: Locale) -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        error: app_state.i18n_store.translate(&locale.0, "errors.route_not_found", &[]),
        details: None,
    }
}
