// src/handlers/complaints.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        json::AppJson,
        rbac::{AdminTier, Citizens, RequireRole},
    },
    models::{
        complaint::{
            Assignment, Category, CategoryInfo, Complaint, ComplaintChanges, NewComplaint, StatusUpdatePayload,
            Team,
        },
        dashboard::ComplaintView,
    },
    services::authorization,
};

// GET /api/complaints
#[utoipa::path(
    get,
    path = "/api/complaints",
    tag = "Complaints",
    responses(
        (status = 200, description = "Reclamações visíveis para o usuário", body = Vec<Complaint>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_complaints(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<Complaint>>, ApiError> {
    let complaints = app_state
        .complaint_service
        .list_visible(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(complaints))
}

// GET /api/complaints/mine
#[utoipa::path(
    get,
    path = "/api/complaints/mine",
    tag = "Complaints",
    responses(
        (status = 200, description = "Reclamações enviadas pelo usuário", body = Vec<Complaint>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_complaints(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<Complaint>>, ApiError> {
    let complaints = app_state
        .complaint_service
        .list_for_user(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(complaints))
}

// POST /api/complaints
#[utoipa::path(
    post,
    path = "/api/complaints",
    tag = "Complaints",
    request_body = NewComplaint,
    responses(
        (status = 201, description = "Reclamação registrada", body = Complaint),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Só cidadãos enviam reclamações")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_complaint(
    State(app_state): State<AppState>,
    locale: Locale,
    gate: RequireRole<Citizens>,
    AppJson(payload): AppJson<NewComplaint>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let complaint = app_state
        .complaint_service
        .submit(&gate.user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(complaint)))
}

// GET /api/complaints/categories
#[utoipa::path(
    get,
    path = "/api/complaints/categories",
    tag = "Complaints",
    responses(
        (status = 200, description = "Categorias aceitas", body = Vec<CategoryInfo>)
    )
)]
pub async fn list_categories() -> Json<Vec<CategoryInfo>> {
    Json(
        Category::ALL
            .into_iter()
            .map(|value| CategoryInfo {
                value,
                label: value.label().to_string(),
            })
            .collect(),
    )
}

// GET /api/teams
#[utoipa::path(
    get,
    path = "/api/teams",
    tag = "Complaints",
    responses(
        (status = 200, description = "Equipes disponíveis para atribuição", body = Vec<Team>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_teams(_user: AuthenticatedUser) -> Json<Vec<Team>> {
    Json(Team::ALL.to_vec())
}

// GET /api/complaints/{id}
#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    responses(
        (status = 200, description = "Detalhes e permissões do usuário", body = ComplaintView),
        (status = 403, description = "Sem acesso"),
        (status = 404, description = "Reclamação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_complaint(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ComplaintView>, ApiError> {
    let complaint = app_state
        .complaint_service
        .get(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ComplaintView {
        permissions: authorization::permissions_for(&user, &complaint),
        complaint,
    }))
}

// PATCH /api/complaints/{id}
#[utoipa::path(
    patch,
    path = "/api/complaints/{id}",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    request_body = ComplaintChanges,
    responses(
        (status = 200, description = "Reclamação editada", body = Complaint),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Sem permissão de edição"),
        (status = 404, description = "Reclamação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_complaint(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<ComplaintChanges>,
) -> Result<Json<Complaint>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let complaint = app_state
        .complaint_service
        .update_details(&user, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(complaint))
}

// DELETE /api/complaints/{id}
#[utoipa::path(
    delete,
    path = "/api/complaints/{id}",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    responses(
        (status = 204, description = "Reclamação excluída (ou já inexistente)"),
        (status = 403, description = "Sem permissão de exclusão")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_complaint(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .complaint_service
        .delete(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/complaints/{id}/status
#[utoipa::path(
    patch,
    path = "/api/complaints/{id}/status",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    request_body = StatusUpdatePayload,
    responses(
        (status = 200, description = "Status atualizado", body = Complaint),
        (status = 400, description = "Notas de conclusão ausentes"),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Reclamação não encontrada"),
        (status = 409, description = "Transição de status inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<StatusUpdatePayload>,
) -> Result<Json<Complaint>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let complaint = app_state
        .complaint_service
        .update_status(&user, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(complaint))
}

// PUT /api/complaints/{id}/assignment
#[utoipa::path(
    put,
    path = "/api/complaints/{id}/assignment",
    tag = "Complaints",
    params(("id" = Uuid, Path, description = "ID da reclamação")),
    request_body = Assignment,
    responses(
        (status = 200, description = "Reclamação atribuída", body = Complaint),
        (status = 400, description = "Equipe ou prestador obrigatório"),
        (status = 403, description = "Só administradores atribuem"),
        (status = 404, description = "Reclamação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_complaint(
    State(app_state): State<AppState>,
    locale: Locale,
    gate: RequireRole<AdminTier>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<Assignment>,
) -> Result<Json<Complaint>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let complaint = app_state
        .complaint_service
        .assign(&gate.user, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(complaint))
}
