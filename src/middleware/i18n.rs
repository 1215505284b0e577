// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::{DEFAULT_LANG, SUPPORTED_LANGS};

// Extrator de idioma
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl Locale {
    /// Primeiro idioma suportado do cabeçalho Accept-Language ("pt-BR" vira "pt").
    pub fn from_header(value: &str) -> Self {
        accept_language::parse(value)
            .iter()
            .filter_map(|tag| tag.split('-').next())
            .map(|primary| primary.to_ascii_lowercase())
            .find(|primary| SUPPORTED_LANGS.contains(&primary.as_str()))
            .map(Locale)
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        Ok(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_supported_language() {
        assert_eq!(Locale::from_header("de-DE,pt-BR;q=0.8,en;q=0.5").0, "pt");
        assert_eq!(Locale::from_header("ru").0, "ru");
        assert_eq!(Locale::from_header("fr").0, "en");
    }
}
