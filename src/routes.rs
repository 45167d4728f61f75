// src/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::AppState, handlers, middleware::auth::auth_guard, models::complaint::MAX_REQUEST_BYTES};

pub fn create_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/admin/login", post(handlers::auth::admin_login));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/availability", put(handlers::auth::set_availability))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let complaint_routes = Router::new()
        .route("/"
               ,get(handlers::complaints::list_complaints)
               .post(handlers::complaints::create_complaint)
        )
        .route("/mine", get(handlers::complaints::list_my_complaints))
        .route("/{id}"
               ,get(handlers::complaints::get_complaint)
               .patch(handlers::complaints::update_complaint)
               .delete(handlers::complaints::delete_complaint)
        )
        .route("/{id}/status", patch(handlers::complaints::update_status))
        .route("/{id}/assignment", put(handlers::complaints::assign_complaint))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/admin/dashboard", get(handlers::dashboard::get_admin_dashboard))
        .route("/teams", get(handlers::complaints::list_teams))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(handlers::system::health))
        .route("/api/docs/openapi.json", get(handlers::system::openapi_json))
        .route("/api/complaints/categories", get(handlers::complaints::list_categories))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/complaints", complaint_routes)
        .nest("/api", dashboard_routes)
        .fallback(handlers::system::not_found)
        // O padrão do axum (2 MB) barraria fotos dentro do limite
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
