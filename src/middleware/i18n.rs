// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::DEFAULT_LANG;

// Idiomas com catálogo em `locales/`
pub const SUPPORTED_LANGS: [&str; 2] = ["en", "pt"];

// Extrator de idioma (Accept-Language)
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Locale {
    /// Escolhe o primeiro idioma suportado na ordem de preferência do cliente.
    /// "pt-BR" conta como "pt".
    pub fn negotiate(header_value: &str) -> Self {
        let lang = accept_language::parse(header_value)
            .into_iter()
            .filter_map(|tag| tag.split('-').next().map(|primary| primary.to_lowercase()))
            .find(|primary| SUPPORTED_LANGS.contains(&primary.as_str()))
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Locale(lang)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(Locale::negotiate)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_supported_language() {
        assert_eq!(Locale::negotiate("pt-BR,pt;q=0.9,en;q=0.8").0, "pt");
        assert_eq!(Locale::negotiate("de-DE,en;q=0.5").0, "en");
        assert_eq!(Locale::negotiate("fr").0, "en");
    }
}
