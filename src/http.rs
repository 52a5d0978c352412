//! HTTP binding: locale extraction from requests and the localization API.

use crate::i18n::{resolve_locale, t, translate, Locale, PromptLoader, TemplateError, DEFAULT_LOCALE};
use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

/// The locale a request prefers, resolved from its `Accept-Language` header.
///
/// A missing or non-ASCII header resolves to the default locale; extraction
/// never rejects a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptLanguage(pub Locale);

#[async_trait]
impl<S> FromRequestParts<S> for AcceptLanguage
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());
        Ok(Self(resolve_locale(header)))
    }
}

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub loader: Arc<PromptLoader>,
}

impl AppState {
    pub fn new(loader: Arc<PromptLoader>) -> Self {
        Self { loader }
    }
}

#[derive(Debug, Serialize)]
struct LocaleInfo {
    tag: &'static str,
    fs_name: &'static str,
    name: &'static str,
}

#[derive(Debug, Serialize)]
struct LocalesResponse {
    default: Locale,
    current: Locale,
    locales: Vec<LocaleInfo>,
}

/// Build the localization API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/locales", get(locales))
        .route("/api/messages/:id", get(message))
        .route("/api/prompts/:name", get(prompt))
        .route("/api/metrics/templates", get(template_metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health(AcceptLanguage(locale): AcceptLanguage) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": t("service_healthy", Some(locale.tag())),
    }))
}

async fn locales(AcceptLanguage(locale): AcceptLanguage) -> impl IntoResponse {
    Json(LocalesResponse {
        default: DEFAULT_LOCALE,
        current: locale,
        locales: Locale::ALL
            .into_iter()
            .map(|locale| LocaleInfo {
                tag: locale.tag(),
                fs_name: locale.fs_name(),
                name: locale.display_name(),
            })
            .collect(),
    })
}

async fn message(
    AcceptLanguage(locale): AcceptLanguage,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let params: Vec<(&str, &str)> = query
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();

    Json(json!({
        "success": true,
        "message": translate(&id, Some(locale.tag()), &params),
    }))
}

async fn prompt(
    State(state): State<AppState>,
    AcceptLanguage(locale): AcceptLanguage,
    Path(name): Path<String>,
) -> Response {
    match state.loader.load(&name, Some(locale.tag())) {
        Ok(content) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            content.to_string(),
        )
            .into_response(),
        Err(e @ TemplateError::NotFound { .. }) => error_response(StatusCode::NOT_FOUND, &e),
        Err(e @ TemplateError::Read { .. }) => {
            error!("{}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e)
        }
    }
}

async fn template_metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.loader.metrics().report())
}

fn error_response(status: StatusCode, e: &TemplateError) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "error": e.to_string(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Locale {
        let mut builder = Request::builder().uri("/api/health");
        if let Some(value) = header {
            builder = builder.header(header::ACCEPT_LANGUAGE, value);
        }
        let (mut parts, _body) = builder.body(()).unwrap().into_parts();

        let AcceptLanguage(locale) = AcceptLanguage::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        locale
    }

    // ==================== Extractor Tests ====================

    #[tokio::test]
    async fn test_extract_missing_header() {
        assert_eq!(extract(None).await, DEFAULT_LOCALE);
    }

    #[tokio::test]
    async fn test_extract_browser_header() {
        assert_eq!(
            extract(Some("en-US,en;q=0.9,zh-CN;q=0.8")).await,
            Locale::English
        );
        assert_eq!(
            extract(Some("zh-TW,zh;q=0.9")).await,
            Locale::TraditionalChinese
        );
    }

    #[tokio::test]
    async fn test_extract_unsupported_language() {
        assert_eq!(extract(Some("fr-FR,fr;q=0.9")).await, DEFAULT_LOCALE);
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_locales_response_serialization() {
        let response = LocalesResponse {
            default: DEFAULT_LOCALE,
            current: Locale::English,
            locales: vec![LocaleInfo {
                tag: "en-US",
                fs_name: "en_US",
                name: "English",
            }],
        };

        let json = serde_json::to_value(&response).expect("Should serialize");
        assert_eq!(json["default"], "zh-CN");
        assert_eq!(json["current"], "en-US");
        assert_eq!(json["locales"][0]["fs_name"], "en_US");
    }
}
