// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{Role, User},
};

/// 1. O Trait que define quais papéis passam pelo portão
pub trait RoleGate: Send + Sync + 'static {
    fn name() -> &'static str;
    fn allows(role: Role) -> bool;
}

/// 2. O Extractor (Guardião). Entrega o usuário já autorizado.
pub struct RequireRole<T> {
    pub user: User,
    _gate: PhantomData<T>,
}

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleGate,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // A. Extrai Usuário
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        // B. Confere o papel
        if !T::allows(user.role) {
            let app_state = AppState::from_ref(state);
            let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();

            tracing::warn!(user_id = %user.id, role = ?user.role, gate = T::name(), "Acesso negado pelo papel");
            return Err(AppError::Forbidden.to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequireRole {
            user,
            _gate: PhantomData,
        })
    }
}

// ---
// DEFINIÇÃO DOS PORTÕES (TIPOS)
// ---

pub struct SuperAdminOnly;
impl RoleGate for SuperAdminOnly {
    fn name() -> &'static str { "super_admin" }
    fn allows(role: Role) -> bool { role == Role::SuperAdmin }
}

pub struct AdminTier;
impl RoleGate for AdminTier {
    fn name() -> &'static str { "admin_tier" }
    fn allows(role: Role) -> bool { matches!(role, Role::SuperAdmin | Role::DepartmentAdmin) }
}

// Quem tem o flag de disponibilidade
pub struct FieldWorkers;
impl RoleGate for FieldWorkers {
    fn name() -> &'static str { "field_workers" }
    fn allows(role: Role) -> bool { role.uses_availability() }
}

pub struct Citizens;
impl RoleGate for Citizens {
    fn name() -> &'static str { "citizens" }
    fn allows(role: Role) -> bool { role == Role::User }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gates_match_their_roles() {
        assert!(SuperAdminOnly::allows(Role::SuperAdmin));
        assert!(!SuperAdminOnly::allows(Role::DepartmentAdmin));
        assert!(AdminTier::allows(Role::DepartmentAdmin));
        assert!(!AdminTier::allows(Role::FieldAgent));
        assert!(FieldWorkers::allows(Role::FieldAgent));
        assert!(FieldWorkers::allows(Role::ServiceProvider));
        assert!(!FieldWorkers::allows(Role::User));
        assert!(Citizens::allows(Role::User));
        assert!(!Citizens::allows(Role::SuperAdmin));
    }
}
