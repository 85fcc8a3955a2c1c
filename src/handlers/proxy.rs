// src/handlers/proxy.rs

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::config::AppState;

// ANY /proxy/resellers
pub async fn forward_root(
    State(app_state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward(&app_state, "", method, query, &headers, body).await
}

// ANY /proxy/resellers/{*path}
pub async fn forward_path(
    State(app_state): State<AppState>,
    Path(path): Path<String>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward(&app_state, &path, method, query, &headers, body).await
}

/// Repassa método, query, corpo e content-type ao serviço de revendedores
/// e devolve status, corpo e content-type sem alterações.
async fn forward(
    app_state: &AppState,
    path: &str,
    method: Method,
    query: Option<String>,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    let client = &app_state.reseller_client;
    let suffix = match path.trim_start_matches('/') {
        "" => String::new(),
        p => format!("/{p}"),
    };
    let query = query.map(|q| format!("?{q}")).unwrap_or_default();
    let url = format!("{}{}{}", client.base_url(), suffix, query);

    let mut request = client.http().request(method.clone(), &url);
    if let Some(content_type) = headers.get(CONTENT_TYPE) {
        request = request.header(CONTENT_TYPE, content_type.clone());
    }
    if method != Method::GET && method != Method::HEAD {
        request = request.body(body);
    }

    let upstream = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Proxy de revendedores falhou em {} {}: {}", method, url, e);
            return upstream_failed();
        }
    };

    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    match upstream.bytes().await {
        Ok(bytes) => (status, [(CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(e) => {
            tracing::warn!("Proxy de revendedores não conseguiu ler a resposta de {}: {}", url, e);
            upstream_failed()
        }
    }
}

fn upstream_failed() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": "Upstream fetch failed" })),
    )
        .into_response()
}
