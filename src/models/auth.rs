// src/models/auth.rs

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::complaint::Category;
use crate::models::dashboard::DashboardVariant;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    User,
    SuperAdmin,
    DepartmentAdmin,
    FieldAgent,
    ServiceProvider,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::User,
        Role::SuperAdmin,
        Role::DepartmentAdmin,
        Role::FieldAgent,
        Role::ServiceProvider,
    ];

    // Mesmo texto do JSON (camelCase)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::SuperAdmin => "superAdmin",
            Role::DepartmentAdmin => "departmentAdmin",
            Role::FieldAgent => "fieldAgent",
            Role::ServiceProvider => "serviceProvider",
        }
    }

    pub fn uses_department(&self) -> bool {
        matches!(self, Role::DepartmentAdmin | Role::ServiceProvider)
    }

    pub fn uses_availability(&self) -> bool {
        matches!(self, Role::FieldAgent | Role::ServiceProvider)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| AppError::InternalServerError(anyhow::anyhow!("Papel desconhecido: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Electrical,
    Sanitation,
    Roads,
    Water,
    Parks,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::Electrical,
        Department::Sanitation,
        Department::Roads,
        Department::Water,
        Department::Parks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Electrical => "electrical",
            Department::Sanitation => "sanitation",
            Department::Roads => "roads",
            Department::Water => "water",
            Department::Parks => "parks",
        }
    }

    /// Categoria atendida pelo departamento.
    ///
    /// `Parks` não tem categoria: a visibilidade por categoria dele é vazia.
    pub fn category(&self) -> Option<Category> {
        match self {
            Department::Electrical => Some(Category::Streetlight),
            Department::Sanitation => Some(Category::Garbage),
            Department::Roads => Some(Category::Pothole),
            Department::Water => Some(Category::Water),
            Department::Parks => None,
        }
    }

    // "water" -> "Water"
    pub fn display_name(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl FromStr for Department {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL.into_iter().find(|d| d.as_str() == s).ok_or(())
    }
}

// --- ENTIDADE ---

// Identidade de quem está usando o sistema
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "John Doe")]
    pub name: String,
    pub role: Role,

    // Só existe para departmentAdmin / serviceProvider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,

    // Só existe para fieldAgent / serviceProvider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<bool>,
}

impl User {
    /// Monta um usuário respeitando a regra de campos por papel:
    /// departamento e disponibilidade são descartados quando o papel não os usa,
    /// e a disponibilidade começa em `true` para quem a usa.
    pub fn new(
        id: Uuid,
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        department: Option<Department>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            name: name.into(),
            role,
            department: department.filter(|_| role.uses_department()),
            availability: role.uses_availability().then_some(true),
        }
    }

    pub fn citizen(id: Uuid, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, email, name, Role::User, None)
    }

    pub fn set_availability(&mut self, available: bool) -> bool {
        if !self.role.uses_availability() {
            return false;
        }
        self.availability = Some(available);
        true
    }

    // Atribuições guardam o nome ou o id como texto livre
    pub fn matches_assignee(&self, assignee: &str) -> bool {
        assignee == self.name || assignee == self.id.to_string()
    }
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Maria Silva")]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// No login só exigimos a presença da senha
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AvailabilityPayload {
    pub available: bool,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    pub dashboard: DashboardVariant,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
