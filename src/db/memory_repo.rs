// src/db/memory_repo.rs

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::complaint_repo::{ComplaintRepository, Mutation},
    models::complaint::Complaint,
};

// Backend padrão: tudo em memória, mais recente primeiro
#[derive(Default)]
pub struct MemoryComplaintRepository {
    complaints: RwLock<Vec<Complaint>>,
}

impl MemoryComplaintRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // Os registros chegam já na ordem da lista (mais recente primeiro)
    pub fn with_complaints(complaints: Vec<Complaint>) -> Self {
        Self {
            complaints: RwLock::new(complaints),
        }
    }
}

#[async_trait]
impl ComplaintRepository for MemoryComplaintRepository {
    async fn insert(&self, complaint: Complaint) -> Result<Complaint, AppError> {
        self.complaints.write().await.insert(0, complaint.clone());
        Ok(complaint)
    }

    async fn list_all(&self) -> Result<Vec<Complaint>, AppError> {
        Ok(self.complaints.read().await.clone())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Complaint>, AppError> {
        Ok(self
            .complaints
            .read()
            .await
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Complaint>, AppError> {
        Ok(self.complaints.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn update(&self, id: Uuid, mutation: Mutation) -> Result<Option<Complaint>, AppError> {
        // O lock de escrita faz o papel da transação
        let mut complaints = self.complaints.write().await;
        let Some(slot) = complaints.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        // Trabalha numa cópia: se a mutação falhar, o registro fica intacto
        let mut updated = slot.clone();
        mutation(&mut updated)?;
        *slot = updated.clone();

        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut complaints = self.complaints.write().await;
        let before = complaints.len();
        complaints.retain(|c| c.id != id);
        Ok(complaints.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::complaint::{Category, ComplaintStatus, Location, NewComplaint};
    use chrono::Utc;

    fn complaint(owner: Uuid, title: &str) -> Complaint {
        Complaint::new(
            NewComplaint {
                title: title.into(),
                description: "desc".into(),
                category: Category::Garbage,
                location: Location { lat: 1.0, lng: 2.0, address: "Somewhere".into() },
                image_url: None,
            },
            owner,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_prepends_and_user_view_is_a_subset() {
        let repo = MemoryComplaintRepository::new();
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
        let first = repo.insert(complaint(u1, "first")).await.unwrap();
        let second = repo.insert(complaint(u2, "second")).await.unwrap();
        let third = repo.insert(complaint(u1, "third")).await.unwrap();

        let all = repo.list_all().await.unwrap();
        let ids: Vec<_> = all.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let mine = repo.list_for_user(u1).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|c| c.user_id == u1 && all.contains(c)));
    }

    #[tokio::test]
    async fn failed_mutation_is_not_persisted() {
        let repo = MemoryComplaintRepository::new();
        let c = repo.insert(complaint(Uuid::new_v4(), "x")).await.unwrap();

        let result = repo
            .update(c.id, Box::new(|c: &mut Complaint| c.transition_to(ComplaintStatus::Resolved, None)))
            .await;
        assert!(matches!(result, Err(AppError::InvalidStatusTransition { .. })));
        assert_eq!(repo.find_by_id(c.id).await.unwrap(), Some(c));
    }

    #[tokio::test]
    async fn unknown_ids_are_noops() {
        let repo = MemoryComplaintRepository::new();
        repo.insert(complaint(Uuid::new_v4(), "x")).await.unwrap();

        let updated = repo.update(Uuid::new_v4(), Box::new(|_: &mut Complaint| Ok(()))).await.unwrap();
        assert!(updated.is_none());
        assert!(!repo.delete(Uuid::new_v4()).await.unwrap());
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }
}
