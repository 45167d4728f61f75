// src/db/pg_user_repo.rs

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::user_repo::{StoredUser, UserRepository},
    models::auth::{Department, Role, User},
};

const COLUMNS: &str = "id, email, name, role, department, availability, password_hash";

// Usuários no Postgres: contas registradas sobrevivem a reinícios
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn from_row(row: &PgRow) -> Result<StoredUser, AppError> {
        let role: Role = row.try_get::<String, _>("role")?.parse()?;
        let department = row
            .try_get::<Option<String>, _>("department")?
            .map(|raw| {
                raw.parse::<Department>().map_err(|_| {
                    AppError::InternalServerError(anyhow::anyhow!("Departamento desconhecido: {}", raw))
                })
            })
            .transpose()?;

        let mut user = User::new(
            row.try_get("id")?,
            row.try_get::<String, _>("email")?,
            row.try_get::<String, _>("name")?,
            role,
            department,
        );
        if let Some(available) = row.try_get::<Option<bool>, _>("availability")? {
            user.set_availability(available);
        }

        Ok(StoredUser {
            user,
            password_hash: row.try_get("password_hash")?,
        })
    }

    async fn insert(&self, user: &User, password_hash: Option<&str>, on_conflict: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, email, name, role, department, availability, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            {}
            "#,
            on_conflict
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.department.map(|d| d.as_str()))
        .bind(user.availability)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE LOWER(email) = LOWER($1)", COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(Self::from_row).transpose()?.map(|stored| stored.user))
    }

    async fn create_user(&self, user: User, password_hash: String) -> Result<User, AppError> {
        match self.insert(&user, Some(&password_hash), "").await {
            Ok(_) => Ok(user),
            // Índice único em LOWER(email)
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(AppError::EmailAlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    async fn upsert_demo_user(&self, user: User) -> Result<User, AppError> {
        self.insert(&user, None, "ON CONFLICT DO NOTHING").await?;

        // Devolve o que está gravado (disponibilidade inclusa)
        self.find_by_id(user.id).await?.ok_or(AppError::EmailAlreadyExists)
    }

    async fn set_availability(&self, id: Uuid, available: bool) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1 FOR UPDATE", COLUMNS))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let mut user = row.as_ref().map(Self::from_row).transpose()?.ok_or(AppError::UserNotFound)?.user;

        if !user.set_availability(available) {
            return Err(AppError::Forbidden);
        }

        sqlx::query("UPDATE users SET availability = $2 WHERE id = $1")
            .bind(id)
            .bind(user.availability)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Precisa de um Postgres: DATABASE_URL=... cargo test -- --ignored
    #[sqlx::test]
    #[ignore]
    async fn registered_accounts_survive_a_new_repository(pool: PgPool) {
        let first = PgUserRepository::new(pool.clone());
        let user = User::citizen(Uuid::new_v4(), "ana@city.org", "Ana");
        first.create_user(user.clone(), "hash".into()).await.unwrap();

        let second = PgUserRepository::new(pool);
        let stored = second.find_by_email("ANA@city.org").await.unwrap().unwrap();
        assert_eq!(stored.user, user);
        assert_eq!(stored.password_hash.as_deref(), Some("hash"));

        let again = User::citizen(Uuid::new_v4(), "ana@city.org", "Ana 2");
        assert!(matches!(second.create_user(again, "h".into()).await, Err(AppError::EmailAlreadyExists)));
    }

    #[sqlx::test]
    #[ignore]
    async fn availability_is_stored(pool: PgPool) {
        let repo = PgUserRepository::new(pool);
        let id = Uuid::new_v4();
        let provider = User::new(id, "roads.provider@example.com", "Roads Provider", Role::ServiceProvider, Some(Department::Roads));
        repo.upsert_demo_user(provider.clone()).await.unwrap();

        assert_eq!(repo.set_availability(id, false).await.unwrap().availability, Some(false));
        assert_eq!(repo.upsert_demo_user(provider).await.unwrap().availability, Some(false));
    }
}
