// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, Department, Role, User},
};

const DEMO_DOMAIN: &str = "@example.com";

/// Id estável de uma identidade de demonstração: o mesmo e-mail sempre gera o
/// mesmo usuário, então as reclamações continuam sendo dele entre logins.
pub fn demo_user_id(email: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, email.trim().to_lowercase().as_bytes())
}

/// Identidades reservadas do mapa de demonstração.
/// Devolve `None` para qualquer e-mail fora do mapa.
pub fn demo_identity(email: &str) -> Option<User> {
    let email = email.trim().to_lowercase();
    let local = email.strip_suffix(DEMO_DOMAIN)?;
    let id = demo_user_id(&email);

    let user = match local {
        "admin" => User::new(id, &email, "Super Admin", Role::SuperAdmin, None),
        "agent" => User::new(id, &email, "Field Agent", Role::FieldAgent, None),
        "user" => User::citizen(id, &email, "John Doe"),
        _ => {
            let (department, kind) = local.split_once('.')?;
            let department: Department = department.parse().ok()?;
            let (role, suffix) = match kind {
                "admin" => (Role::DepartmentAdmin, "Admin"),
                "provider" => (Role::ServiceProvider, "Provider"),
                _ => return None,
            };
            let name = format!("{} {}", department.display_name(), suffix);
            User::new(id, &email, name, role, Some(department))
        }
    };

    Some(user)
}

// Qualquer outro e-mail entra como cidadão, com o nome tirado do e-mail
fn guest_identity(email: &str) -> User {
    let email = email.trim().to_lowercase();
    let name = email.split('@').next().unwrap_or_default().to_string();
    User::citizen(demo_user_id(&email), &email, name)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt_secret: String, token_ttl: Duration) -> Self {
        Self {
            user_repo,
            jwt_secret,
            token_ttl,
        }
    }

    // Deixa as contas de demonstração prontas no diretório
    pub async fn seed_demo_users(&self) -> Result<(), AppError> {
        let mut emails = vec![
            "admin@example.com".to_string(),
            "agent@example.com".to_string(),
            "user@example.com".to_string(),
        ];
        for department in Department::ALL {
            emails.push(format!("{}.admin{}", department.as_str(), DEMO_DOMAIN));
            emails.push(format!("{}.provider{}", department.as_str(), DEMO_DOMAIN));
        }

        for email in emails {
            if let Some(user) = demo_identity(&email) {
                self.user_repo.upsert_demo_user(user).await?;
            }
        }
        Ok(())
    }

    pub async fn register_user(&self, name: &str, email: &str, password: &str) -> Result<(String, User), AppError> {
        let email = email.trim().to_lowercase();
        if demo_identity(&email).is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        // 1. Hashing fora do runtime async
        let password_clone = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // 2. Cria o usuário (e-mail duplicado vira conflito)
        let user = User::citizen(Uuid::new_v4(), email, name.trim());
        let user = self.user_repo.create_user(user, hashed_password).await?;

        tracing::info!(user_id = %user.id, "Novo usuário registrado");

        let token = self.create_token(user.id)?;
        Ok((token, user))
    }

    /// Login de contas registradas (senha conferida com bcrypt) ou de
    /// identidades de demonstração (basta a senha estar presente).
    pub async fn login_user(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        if password.is_empty() {
            return Err(AppError::InvalidCredentials);
        }

        let user = match self.user_repo.find_by_email(email.trim()).await? {
            Some(stored) => match stored.password_hash {
                Some(password_hash) => {
                    let password_clone = password.to_owned();

                    // Executa a verificação em um thread separado
                    let is_password_valid =
                        tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash))
                            .await
                            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

                    if !is_password_valid {
                        tracing::warn!(user_id = %stored.user.id, "Senha incorreta");
                        return Err(AppError::InvalidCredentials);
                    }
                    stored.user
                }
                None => stored.user,
            },
            None => {
                let identity = demo_identity(email).unwrap_or_else(|| guest_identity(email));
                self.user_repo.upsert_demo_user(identity).await?
            }
        };

        tracing::info!(user_id = %user.id, role = ?user.role, "Login realizado");

        let token = self.create_token(user.id)?;
        Ok((token, user))
    }

    // Login do painel administrativo: só superAdmin passa
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        let (token, user) = self.login_user(email, password).await?;
        if user.role != Role::SuperAdmin {
            tracing::warn!(user_id = %user.id, "Login administrativo negado");
            return Err(AppError::Forbidden);
        }
        Ok((token, user))
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn set_availability(&self, user_id: Uuid, available: bool) -> Result<User, AppError> {
        let user = self.user_repo.set_availability(user_id, available).await?;
        tracing::info!(user_id = %user.id, available, "Disponibilidade atualizada");
        Ok(user)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
