//! `FolioApi` against an in-process backend.

mod common;

use std::collections::HashMap;
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::{Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use folio_client::api::{ClientError, FolioApi, ListQuery};
use folio_core::credentials::BearerToken;
use folio_core::types::{FileKind, ResourceKind};

use common::spawn_server;

async fn journal(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    match id.as_str() {
        "42" => Ok(Json(json!({
            "success": true,
            "journal": {
                "_id": "42",
                "title": "Journal Title",
                "pdfUrl": "https://cdn.example/doc.pdf"
            }
        }))),
        "7" => Ok(Json(json!({ "_id": "7", "title": "Bare Record" }))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn journals(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let search = params.get("search").cloned().unwrap_or_default();
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    Json(json!({
        "journals": [{ "_id": "1", "title": format!("match:{search}") }],
        "total": 11,
        "page": page,
        "pages": 3
    }))
}

async fn submissions(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    match headers.get(header::AUTHORIZATION) {
        Some(v) if v.as_bytes() == b"Bearer admin-token-9999" => {
            Ok(Json(json!([{ "id": 3, "title": "S" }])))
        }
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

fn app() -> Router {
    Router::new()
        .route("/api/journals", get(journals))
        .route("/api/journals/{id}", get(journal))
        .route("/api/submissions", get(submissions))
}

fn api(base: &str, token: Option<&str>) -> FolioApi {
    FolioApi::new(base, Duration::from_secs(5), token.and_then(BearerToken::new)).unwrap()
}

#[tokio::test]
async fn wrapped_detail_yields_hint() {
    let base = spawn_server(app()).await;
    let doc = api(&base, None)
        .get_entity(ResourceKind::Journals, "42")
        .await
        .unwrap();

    assert_eq!(doc.title, "Journal Title");
    let request = doc.to_request(ResourceKind::Journals, FileKind::Pdf);
    assert_eq!(
        request.direct_url_hint.as_deref(),
        Some("https://cdn.example/doc.pdf")
    );
}

#[tokio::test]
async fn bare_detail_is_accepted() {
    let base = spawn_server(app()).await;
    let doc = api(&base, None)
        .get_entity(ResourceKind::Journals, "7")
        .await
        .unwrap();
    assert_eq!(doc.title, "Bare Record");
    assert_eq!(doc.known_url(FileKind::Docx), None);
}

#[tokio::test]
async fn missing_detail_is_api_error() {
    let base = spawn_server(app()).await;
    let err = api(&base, None)
        .get_entity(ResourceKind::Journals, "404")
        .await
        .unwrap_err();
    assert_matches!(err, ClientError::ApiError { status: 404, .. });
}

#[tokio::test]
async fn list_forwards_query_and_normalizes_envelope() {
    let base = spawn_server(app()).await;
    let query = ListQuery {
        search: Some("biology".into()),
        page: Some(2),
        limit: Some(10),
    };
    let page = api(&base, None)
        .list_entities(ResourceKind::Journals, &query)
        .await
        .unwrap();

    assert_eq!(page.items[0].title, "match:biology");
    assert_eq!((page.total, page.page, page.pages), (11, 2, 3));
}

#[tokio::test]
async fn list_sends_bearer_token() {
    let base = spawn_server(app()).await;

    let page = api(&base, Some("admin-token-9999"))
        .list_entities(ResourceKind::Submissions, &ListQuery::default())
        .await
        .unwrap();
    assert_eq!(page.items[0].id, "3");

    let err = api(&base, None)
        .list_entities(ResourceKind::Submissions, &ListQuery::default())
        .await
        .unwrap_err();
    assert_matches!(err, ClientError::ApiError { status: 401, .. });
}
