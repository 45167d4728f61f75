// src/db/pg_complaint_repo.rs

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Executor, PgPool, Postgres, Row};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::complaint_repo::{ComplaintRepository, Mutation},
    models::complaint::{Complaint, Location},
};

const COLUMNS: &str = r#"
    id, title, description, category, status, lat, lng, address, image_url,
    user_id, assigned_to, assigned_provider, resolution_notes, created_at, updated_at
"#;

// Backend Postgres (ativado por DATABASE_URL)
#[derive(Clone)]
pub struct PgComplaintRepository {
    pool: PgPool,
}

impl PgComplaintRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Categoria e status ficam como TEXT, convertidos aqui
    fn from_row(row: &PgRow) -> Result<Complaint, AppError> {
        let category: String = row.try_get("category")?;
        let status: String = row.try_get("status")?;

        Ok(Complaint {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            category: category.parse()?,
            status: status.parse()?,
            location: Location {
                lat: row.try_get("lat")?,
                lng: row.try_get("lng")?,
                address: row.try_get("address")?,
            },
            image_url: row.try_get("image_url")?,
            user_id: row.try_get("user_id")?,
            assigned_to: row.try_get("assigned_to")?,
            assigned_provider: row.try_get("assigned_provider")?,
            resolution_notes: row.try_get("resolution_notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn write<'e, E>(executor: E, complaint: &Complaint) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE complaints
            SET title = $2, description = $3, category = $4, status = $5,
                lat = $6, lng = $7, address = $8, image_url = $9,
                assigned_to = $10, assigned_provider = $11, resolution_notes = $12,
                updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(complaint.id)
        .bind(&complaint.title)
        .bind(&complaint.description)
        .bind(complaint.category.as_str())
        .bind(complaint.status.as_str())
        .bind(complaint.location.lat)
        .bind(complaint.location.lng)
        .bind(&complaint.location.address)
        .bind(&complaint.image_url)
        .bind(&complaint.assigned_to)
        .bind(&complaint.assigned_provider)
        .bind(&complaint.resolution_notes)
        .bind(complaint.updated_at)
        .execute(executor)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ComplaintRepository for PgComplaintRepository {
    async fn insert(&self, complaint: Complaint) -> Result<Complaint, AppError> {
        sqlx::query(
            r#"
            INSERT INTO complaints (
                id, title, description, category, status, lat, lng, address, image_url,
                user_id, assigned_to, assigned_provider, resolution_notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(complaint.id)
        .bind(&complaint.title)
        .bind(&complaint.description)
        .bind(complaint.category.as_str())
        .bind(complaint.status.as_str())
        .bind(complaint.location.lat)
        .bind(complaint.location.lng)
        .bind(&complaint.location.address)
        .bind(&complaint.image_url)
        .bind(complaint.user_id)
        .bind(&complaint.assigned_to)
        .bind(&complaint.assigned_provider)
        .bind(&complaint.resolution_notes)
        .bind(complaint.created_at)
        .bind(complaint.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(complaint)
    }

    async fn list_all(&self) -> Result<Vec<Complaint>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM complaints ORDER BY created_at DESC, id",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Complaint>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM complaints WHERE user_id = $1 ORDER BY created_at DESC, id",
            COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Complaint>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM complaints WHERE id = $1", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn update(&self, id: Uuid, mutation: Mutation) -> Result<Option<Complaint>, AppError> {
        // 1. Inicia Transação e trava a linha da reclamação
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "SELECT {} FROM complaints WHERE id = $1 FOR UPDATE",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        // 2. Aplica a regra de negócio (se falhar, o drop do tx faz rollback)
        let mut complaint = Self::from_row(&row)?;
        mutation(&mut complaint)?;

        // 3. Grava e commita
        Self::write(&mut *tx, &complaint).await?;
        tx.commit().await?;

        Ok(Some(complaint))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM complaints WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
