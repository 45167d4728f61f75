// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        seed, ComplaintRepository, MemoryComplaintRepository, MemoryUserRepository, PgComplaintRepository,
        PgUserRepository, UserRepository,
    },
    services::{
        auth::{demo_user_id, AuthService},
        complaint_service::ComplaintService,
        dashboard_service::DashboardService,
    },
};

// Configuração lida do ambiente (.env incluso)
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_addr: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub simulated_latency_ms: u64,
    pub seed_demo_data: bool,
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválida ({}): {}", name, raw, e)),
        _ => Ok(default),
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            app_addr: env::var("APP_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            token_ttl_hours: parse_var("TOKEN_TTL_HOURS", 168)?,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            simulated_latency_ms: parse_var("SIMULATED_LATENCY_MS", 0)?,
            seed_demo_data: parse_var("SEED_DEMO_DATA", true)?,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: Option<PgPool>,
    pub i18n_store: I18nStore,
    pub auth_service: AuthService,
    pub complaint_service: ComplaintService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let i18n_store = I18nStore::load()?;
        tracing::info!("🌐 Idiomas carregados: {:?}", i18n_store.languages());

        // Dono das reclamações de demonstração
        let demo_owner = demo_user_id("user@example.com");

        // Reclamações e usuários ficam sempre no mesmo backend
        let (db_pool, repo, user_repo): (Option<PgPool>, Arc<dyn ComplaintRepository>, Arc<dyn UserRepository>) =
            match &settings.database_url {
                Some(database_url) => {
                    let pool = PgPoolOptions::new()
                        .max_connections(settings.database_max_connections)
                        .acquire_timeout(Duration::from_secs(3))
                        .connect(database_url)
                        .await
                        .context("Falha ao conectar ao banco de dados")?;
                    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                    sqlx::migrate!()
                        .run(&pool)
                        .await
                        .context("Falha ao rodar as migrações do banco de dados")?;
                    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                    let repo = PgComplaintRepository::new(pool.clone());
                    if settings.seed_demo_data && repo.list_all().await?.is_empty() {
                        for complaint in seed::demo_complaints(demo_owner) {
                            repo.insert(complaint).await?;
                        }
                        tracing::info!("🌱 Reclamações de demonstração inseridas");
                    }
                    let repo: Arc<dyn ComplaintRepository> = Arc::new(repo);
                    let user_repo: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
                    (Some(pool), repo, user_repo)
                }
                None => {
                    tracing::info!("💾 DATABASE_URL ausente: usando armazenamento em memória");
                    let complaints = if settings.seed_demo_data {
                        seed::demo_complaints(demo_owner)
                    } else {
                        Vec::new()
                    };
                    let repo: Arc<dyn ComplaintRepository> =
                        Arc::new(MemoryComplaintRepository::with_complaints(complaints));
                    let user_repo: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::new());
                    (None, repo, user_repo)
                }
            };

        // --- Monta o gráfico de dependências ---
        let auth_service = AuthService::new(
            user_repo,
            settings.jwt_secret.clone(),
            chrono::Duration::hours(settings.token_ttl_hours),
        );
        if settings.seed_demo_data {
            auth_service.seed_demo_users().await?;
        }

        let complaint_service =
            ComplaintService::new(repo, Duration::from_millis(settings.simulated_latency_ms));
        let dashboard_service = DashboardService::new(complaint_service.clone());

        Ok(Self {
            db_pool,
            i18n_store,
            auth_service,
            complaint_service,
            dashboard_service,
        })
    }
}
