// src/db/complaint_repo.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{common::error::AppError, models::complaint::Complaint};

/// Alteração aplicada sobre uma reclamação dentro da "transação" do repositório.
/// Se devolver erro, nada é gravado.
pub type Mutation = Box<dyn FnOnce(&mut Complaint) -> Result<(), AppError> + Send>;

// A coleção canônica de reclamações. As visões por usuário são
// sempre derivadas dela na hora da consulta.
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    // Insere no topo da lista (mais recente primeiro)
    async fn insert(&self, complaint: Complaint) -> Result<Complaint, AppError>;

    async fn list_all(&self) -> Result<Vec<Complaint>, AppError>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Complaint>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Complaint>, AppError>;

    /// Aplica `mutation` de forma atômica por reclamação.
    /// `Ok(None)` quando o id não existe.
    async fn update(&self, id: Uuid, mutation: Mutation) -> Result<Option<Complaint>, AppError>;

    // `false` quando o id não existia (não é erro)
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
