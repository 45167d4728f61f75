// src/db/user_repo.rs

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::User};

// Usuário + hash da senha (só contas registradas têm hash)
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: Option<String>,
}

// O diretório de usuários. Fica no mesmo backend das reclamações.
#[async_trait]
pub trait UserRepository: Send + Sync {
    // Busca um usuário pelo seu e-mail (sem diferenciar maiúsculas)
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, AppError>;

    // Busca um usuário pelo seu ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    // Cria uma conta registrada; e-mail duplicado vira conflito
    async fn create_user(&self, user: User, password_hash: String) -> Result<User, AppError>;

    /// Registra (ou reaproveita) uma identidade de demonstração.
    /// Se já existir, devolve a versão guardada para não perder a disponibilidade.
    async fn upsert_demo_user(&self, user: User) -> Result<User, AppError>;

    async fn set_availability(&self, id: Uuid, available: bool) -> Result<User, AppError>;
}

// Backend em memória (sem DATABASE_URL)
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, StoredUser>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|stored| stored.user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).map(|stored| stored.user.clone()))
    }

    async fn create_user(&self, user: User, password_hash: String) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|stored| stored.user.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::EmailAlreadyExists);
        }

        users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: Some(password_hash),
            },
        );
        Ok(user)
    }

    async fn upsert_demo_user(&self, user: User) -> Result<User, AppError> {
        Ok(self
            .users
            .write()
            .await
            .entry(user.id)
            .or_insert(StoredUser {
                user,
                password_hash: None,
            })
            .user
            .clone())
    }

    async fn set_availability(&self, id: Uuid, available: bool) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        let stored = users.get_mut(&id).ok_or(AppError::UserNotFound)?;

        if !stored.user.set_availability(available) {
            return Err(AppError::Forbidden);
        }
        Ok(stored.user.clone())
    }
}
