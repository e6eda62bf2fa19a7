// File: src/dispatch.rs
// Purpose: Fallback handler dispatching by extension to endpoints or pages

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use folio::{EndpointResult, FolioError, PageOutcome, QueryParams, RouteKind, RouteRequest};
use serde_json::{json, Map, Value as JsonValue};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, error, info};

use crate::app::AppState;

/// Entry point for every request not claimed by a static directory
pub async fn handle(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let pathname = decode_path(uri.path());
    info!("{} {}", method, pathname);

    let body = parse_body(&headers, &body);
    let request = RouteRequest::new(method, pathname, QueryParams::new(query), body, headers);

    match request.kind(&state.config) {
        RouteKind::Endpoint => {
            match state.site.invoker().invoke(request.to_endpoint_request()).await {
                Ok(result) => json_response(result),
                Err(e) => {
                    log_failure(&request, e);
                    json_response(
                        EndpointResult::ok(json!({ "error": "Internal Server Error" }))
                            .with_status(500),
                    )
                }
            }
        }
        RouteKind::Page => match state.site.render_page(&request.pathname).await {
            Ok(PageOutcome::Rendered(html)) => Html(html).into_response(),
            Ok(PageOutcome::NotFound) => error_page(StatusCode::NOT_FOUND, "Not Found"),
            Err(e) => {
                log_failure(&request, e);
                error_page(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        },
        RouteKind::Static | RouteKind::Unroutable => {
            debug!("{} is not routable", request.pathname);
            error_page(StatusCode::NOT_FOUND, "Not Found")
        }
    }
}

/// Percent-decode a request path; undecodable paths are used as sent
pub fn decode_path(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Request body as JSON
///
/// JSON bodies are parsed as-is and urlencoded forms become an object of
/// strings. Anything else, or anything that fails to parse, is `{}`.
pub fn parse_body(headers: &HeaderMap, body: &[u8]) -> JsonValue {
    let empty = || JsonValue::Object(Map::new());
    if body.is_empty() {
        return empty();
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.contains("application/json") {
        serde_json::from_slice(body).unwrap_or_else(|_| empty())
    } else if content_type.contains("application/x-www-form-urlencoded") {
        let form = String::from_utf8_lossy(body);
        let fields = form
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (decode_form(k), JsonValue::String(decode_form(v))))
            .collect();
        JsonValue::Object(fields)
    } else {
        empty()
    }
}

fn decode_form(part: &str) -> String {
    let spaced = part.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(Cow::into_owned)
        .unwrap_or(spaced)
}

/// Render a handler result as an `application/json` response
pub fn json_response(result: EndpointResult) -> Response {
    let status = StatusCode::from_u16(result.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in &result.headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => debug!("Skipping invalid header {:?}: {:?}", name, value),
        }
    }

    (status, headers, result.body.to_string()).into_response()
}

/// Minimal HTML page for 404 and 500 responses
pub fn error_page(status: StatusCode, title: &str) -> Response {
    let markup = maud::html! {
        (maud::DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
            }
            body {
                h1 { (status.as_u16()) " " (title) }
                a href="/" { "Go Home" }
            }
        }
    };
    (status, Html(markup.into_string())).into_response()
}

fn log_failure(request: &RouteRequest, e: FolioError) {
    let e = anyhow::Error::from(e);
    error!("{} {} failed: {:#}", request.method, request.pathname, e);
}
