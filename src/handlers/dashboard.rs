// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{RequireRole, SuperAdminOnly},
    },
    models::dashboard::{Dashboard, DashboardFilter},
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    params(DashboardFilter),
    responses(
        (status = 200, description = "Painel do papel do usuário", body = Dashboard),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filter): Query<DashboardFilter>,
) -> Result<Json<Dashboard>, ApiError> {
    let dashboard = app_state
        .dashboard_service
        .build(&user, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dashboard))
}

// GET /api/admin/dashboard
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = "Dashboard",
    params(DashboardFilter),
    responses(
        (status = 200, description = "Painel administrativo", body = Dashboard),
        (status = 403, description = "Só superAdmin")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_admin_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    gate: RequireRole<SuperAdminOnly>,
    Query(filter): Query<DashboardFilter>,
) -> Result<Json<Dashboard>, ApiError> {
    let dashboard = app_state
        .dashboard_service
        .build(&gate.user, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dashboard))
}
