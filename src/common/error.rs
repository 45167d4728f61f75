// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    models::complaint::ComplaintStatus,
};

// Erros de domínio e de infraestrutura. Viram `ApiError` na borda HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    // Corpo que não é JSON ou não bate com o formato esperado
    #[error("Corpo inválido em '{field}': {message}")]
    InvalidBody { field: String, message: String },

    #[error("Corpo da requisição grande demais")]
    PayloadTooLarge,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Reclamação não encontrada")]
    ComplaintNotFound,

    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidStatusTransition {
        from: ComplaintStatus,
        to: ComplaintStatus,
    },

    #[error("Notas de conclusão obrigatórias")]
    CompletionNotesRequired,

    // Falha transitória do armazenamento: a operação não foi aplicada
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O corpo de erro que sai para o cliente
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidBody { .. } | AppError::CompletionNotesRequired => {
                StatusCode::BAD_REQUEST
            }
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::UserNotFound => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::ComplaintNotFound => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists | AppError::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
            AppError::DatabaseError(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalServerError(_) | AppError::BcryptError(_) | AppError::JwtError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "errors.validation",
            AppError::InvalidBody { .. } => "errors.invalid_body",
            AppError::PayloadTooLarge => "errors.payload_too_large",
            AppError::EmailAlreadyExists => "errors.email_already_exists",
            AppError::InvalidCredentials => "errors.invalid_credentials",
            AppError::InvalidToken => "errors.invalid_token",
            AppError::UserNotFound => "errors.user_not_found",
            AppError::Forbidden => "errors.forbidden",
            AppError::ComplaintNotFound => "errors.complaint_not_found",
            AppError::InvalidStatusTransition { .. } => "errors.invalid_status_transition",
            AppError::CompletionNotesRequired => "errors.completion_notes_required",
            AppError::DatabaseError(_) => "errors.transient",
            _ => "errors.internal",
        }
    }

    /// Converte para a resposta HTTP, traduzindo a mensagem para o idioma pedido.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        } else if status == StatusCode::SERVICE_UNAVAILABLE {
            tracing::warn!("Falha transitória: {}", self);
        } else {
            tracing::debug!("Requisição rejeitada: {}", self);
        }

        let error = match &self {
            AppError::InvalidStatusTransition { from, to } => store.translate(
                &locale.0,
                self.message_key(),
                &[("from", from.as_str()), ("to", to.as_str())],
            ),
            _ => store.translate(&locale.0, self.message_key(), &[]),
        };

        let details = match self {
            AppError::ValidationError(errors) => Some(json!(validation_details(&errors))),
            AppError::InvalidBody { field, message } => Some(json!({ field: [message] })),
            _ => None,
        };

        ApiError { status, error, details }
    }
}

/// Achata os erros do `validator` em `campo -> mensagens`,
/// com caminho para structs aninhadas (`location.lat`).
pub fn validation_details(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    collect_errors("", errors, &mut out);
    out
}

fn collect_errors(prefix: &str, errors: &ValidationErrors, out: &mut BTreeMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        let path = if *field == "__all__" {
            prefix.trim_end_matches('.').to_string()
        } else {
            format!("{}{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect::<Vec<_>>();
                out.entry(path).or_default().extend(messages);
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_errors(&format!("{}.", path), nested, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_errors(&format!("{}[{}].", path, index), nested, out);
                }
            }
        }
    }
}
