// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- System ---
        handlers::system::health,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::admin_login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::set_availability,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
        handlers::dashboard::get_admin_dashboard,

        // --- Complaints ---
        handlers::complaints::list_complaints,
        handlers::complaints::list_my_complaints,
        handlers::complaints::create_complaint,
        handlers::complaints::list_categories,
        handlers::complaints::list_teams,
        handlers::complaints::get_complaint,
        handlers::complaints::update_complaint,
        handlers::complaints::delete_complaint,
        handlers::complaints::update_status,
        handlers::complaints::assign_complaint,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::Department,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AvailabilityPayload,
            models::auth::AuthResponse,

            // --- Complaints ---
            models::complaint::Category,
            models::complaint::ComplaintStatus,
            models::complaint::Team,
            models::complaint::Location,
            models::complaint::Complaint,
            models::complaint::NewComplaint,
            models::complaint::ComplaintChanges,
            models::complaint::StatusUpdatePayload,
            models::complaint::Assignment,
            models::complaint::CategoryInfo,

            // --- Dashboard ---
            models::dashboard::DashboardVariant,
            models::dashboard::DashboardStats,
            models::dashboard::ComplaintPermissions,
            models::dashboard::ComplaintView,
            models::dashboard::Dashboard,
        )
    ),
    tags(
        (name = "System", description = "Saúde do serviço"),
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Disponibilidade"),
        (name = "Dashboard", description = "Painéis por papel"),
        (name = "Complaints", description = "Registro, triagem e atribuição de reclamações")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
