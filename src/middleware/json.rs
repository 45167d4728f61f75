// src/middleware/json.rs

use axum::{
    body::Bytes,
    extract::{FromRef, FromRequest, FromRequestParts, Request},
    http::{header, HeaderMap, StatusCode},
};
use serde::de::DeserializeOwned;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

/// Corpo JSON com rejeição no formato de erro da API.
///
/// O `Json` do axum responde texto puro e sem tradução; aqui o cliente recebe
/// `{ error, details }` apontando o campo que não pôde ser lido.
#[derive(Debug, Clone)]
pub struct AppJson<T>(pub T);

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}

// Desserializa guardando o caminho do campo com problema ("location.lat")
pub fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);

    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        AppError::InvalidBody {
            field: if path == "." { "body".to_string() } else { path },
            message: err.into_inner().to_string(),
        }
    })?;

    // Lixo depois do documento também é corpo inválido
    deserializer.end().map_err(|err| AppError::InvalidBody {
        field: "body".to_string(),
        message: err.to_string(),
    })?;

    Ok(value)
}

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = request.into_parts();
        let locale = Locale::from_request_parts(&mut parts, state).await.unwrap_or_default();
        let app_state = AppState::from_ref(state);
        let reject = |err: AppError| err.to_api_error(&locale, &app_state.i18n_store);

        if !is_json_content_type(&parts.headers) {
            return Err(reject(AppError::InvalidBody {
                field: "content-type".to_string(),
                message: "Expected request with `Content-Type: application/json`".to_string(),
            }));
        }

        // O limite de tamanho (DefaultBodyLimit) é aplicado na leitura dos bytes
        let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(|rejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    reject(AppError::PayloadTooLarge)
                } else {
                    reject(AppError::InvalidBody {
                        field: "body".to_string(),
                        message: rejection.body_text(),
                    })
                }
            })?;

        parse_body(&bytes).map(AppJson).map_err(reject)
    }
}
