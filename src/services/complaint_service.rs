// src/services/complaint_service.rs

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ComplaintRepository,
    models::{
        auth::{Role, User},
        complaint::{Assignment, Complaint, ComplaintChanges, ComplaintStatus, NewComplaint, StatusUpdatePayload},
    },
    services::authorization,
};

#[derive(Clone)]
pub struct ComplaintService {
    repo: Arc<dyn ComplaintRepository>,
    latency: Duration,
}

impl ComplaintService {
    pub fn new(repo: Arc<dyn ComplaintRepository>, latency: Duration) -> Self {
        Self { repo, latency }
    }

    // Atraso artificial configurável (SIMULATED_LATENCY_MS)
    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    pub async fn submit(&self, actor: &User, payload: NewComplaint) -> Result<Complaint, AppError> {
        if !authorization::can_submit(actor) {
            return Err(AppError::Forbidden);
        }
        self.simulate_latency().await;

        let complaint = self.repo.insert(Complaint::new(payload, actor.id, Utc::now())).await?;

        tracing::info!(
            complaint_id = %complaint.id,
            user_id = %actor.id,
            category = complaint.category.as_str(),
            "Reclamação registrada"
        );
        Ok(complaint)
    }

    pub async fn list_all(&self) -> Result<Vec<Complaint>, AppError> {
        self.simulate_latency().await;
        self.repo.list_all().await
    }

    // O que o usuário enxerga, mais recente primeiro
    pub async fn list_visible(&self, actor: &User) -> Result<Vec<Complaint>, AppError> {
        let all = self.list_all().await?;
        Ok(authorization::visible_complaints(actor, all))
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Complaint>, AppError> {
        self.simulate_latency().await;
        self.repo.list_for_user(user_id).await
    }

    pub async fn get(&self, actor: &User, id: Uuid) -> Result<Complaint, AppError> {
        self.simulate_latency().await;
        let complaint = self.repo.find_by_id(id).await?.ok_or(AppError::ComplaintNotFound)?;

        if !authorization::can_view(actor, &complaint) {
            return Err(AppError::Forbidden);
        }
        Ok(complaint)
    }

    pub async fn update_details(&self, actor: &User, id: Uuid, changes: ComplaintChanges) -> Result<Complaint, AppError> {
        self.simulate_latency().await;

        // A checagem roda dentro da mutação, sobre o registro travado
        let editor = actor.clone();
        let complaint = self
            .repo
            .update(
                id,
                Box::new(move |c: &mut Complaint| {
                    if !authorization::can_edit(&editor, c) {
                        return Err(AppError::Forbidden);
                    }
                    c.apply_changes(changes);
                    Ok(())
                }),
            )
            .await?
            .ok_or(AppError::ComplaintNotFound)?;

        tracing::info!(complaint_id = %id, user_id = %actor.id, "Reclamação editada");
        Ok(complaint)
    }

    /// Move a reclamação para `payload.status` seguindo a tabela de transições.
    ///
    /// Prestadores de serviço precisam informar as notas de conclusão ao resolver.
    pub async fn update_status(
        &self,
        actor: &User,
        id: Uuid,
        payload: StatusUpdatePayload,
    ) -> Result<Complaint, AppError> {
        self.simulate_latency().await;

        let target = payload.status;
        let notes = payload.notes;
        let editor = actor.clone();

        let complaint = self
            .repo
            .update(
                id,
                Box::new(move |c: &mut Complaint| {
                    if !authorization::can_change_status(&editor, c) {
                        return Err(AppError::Forbidden);
                    }

                    let has_notes = notes.as_deref().is_some_and(|n| !n.trim().is_empty());
                    if editor.role == Role::ServiceProvider
                        && target == ComplaintStatus::Resolved
                        && c.status != ComplaintStatus::Resolved
                        && !has_notes
                    {
                        return Err(AppError::CompletionNotesRequired);
                    }

                    c.transition_to(target, notes)
                }),
            )
            .await?
            .ok_or(AppError::ComplaintNotFound)?;

        tracing::info!(
            complaint_id = %id,
            user_id = %actor.id,
            status = %complaint.status,
            "Status da reclamação atualizado"
        );
        Ok(complaint)
    }

    pub async fn assign(&self, actor: &User, id: Uuid, assignment: Assignment) -> Result<Complaint, AppError> {
        if !authorization::can_assign(actor) {
            return Err(AppError::Forbidden);
        }
        self.simulate_latency().await;

        let complaint = self
            .repo
            .update(
                id,
                Box::new(move |c: &mut Complaint| {
                    c.assign(&assignment);
                    Ok(())
                }),
            )
            .await?
            .ok_or(AppError::ComplaintNotFound)?;

        tracing::info!(
            complaint_id = %id,
            user_id = %actor.id,
            assigned_to = complaint.assigned_to.as_deref().unwrap_or("-"),
            assigned_provider = complaint.assigned_provider.as_deref().unwrap_or("-"),
            "Reclamação atribuída"
        );
        Ok(complaint)
    }

    // Apagar um id inexistente não é erro
    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        self.simulate_latency().await;

        let Some(complaint) = self.repo.find_by_id(id).await? else {
            tracing::debug!(complaint_id = %id, "Exclusão de reclamação inexistente ignorada");
            return Ok(());
        };

        if !authorization::can_delete(actor, &complaint) {
            return Err(AppError::Forbidden);
        }

        if self.repo.delete(id).await? {
            tracing::info!(complaint_id = %id, user_id = %actor.id, "Reclamação excluída");
        }
        Ok(())
    }
}
