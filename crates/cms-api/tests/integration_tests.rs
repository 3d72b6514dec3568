//! # Integration Tests for cms-api
//!
//! Drives the full router over a temporary content root: schema listing,
//! validated page writes, blog entry creation and listing, schema reload,
//! uploads, and health probes.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use cms_api::state::AppState;

const HOME_SCHEMA: &str = r#"
- id: title
  type: string
  label: Título
- id: price
  type: number
  label: Precio
- id: cta
  type: url
  label: Enlace
"#;

const NEWS_SCHEMA: &str = r#"
- id: meta
  type: object
  label: Meta
  fields:
    - { id: slug, type: string, label: Slug }
    - { id: date, type: string, label: Fecha }
- id: body
  type: richtext
  label: Contenido
"#;

/// Helper: content root with one page and one blog schema.
fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let cms = dir.path().join("cms");
    std::fs::create_dir_all(&cms).unwrap();
    std::fs::write(cms.join("page.home.yaml"), HOME_SCHEMA).unwrap();
    std::fs::write(cms.join("blog.news.yaml"), NEWS_SCHEMA).unwrap();
    dir
}

/// Helper: build the test app over `dir`.
fn test_app(dir: &TempDir) -> axum::Router {
    cms_api::app(AppState::with_root(dir.path()))
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let boundary = "X-CMS-BOUNDARY";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let dir = fixture();
    let response = test_app(&dir).oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let dir = fixture();
    let response = test_app(&dir).oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Content Listing & Documents ----------------------------------------------

#[tokio::test]
async fn test_list_content_types() {
    let dir = fixture();
    let response = test_app(&dir).oneshot(get("/api/cms")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([{"type": "page", "name": "home"}, {"type": "blog", "name": "news"}])
    );
}

#[tokio::test]
async fn test_read_page_without_data() {
    let dir = fixture();
    let response = test_app(&dir).oneshot(get("/api/cms/page/home")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], json!({}));
    assert_eq!(body["schema"][0]["id"], "title");
}

#[tokio::test]
async fn test_unknown_schema_is_404() {
    let dir = fixture();
    let response = test_app(&dir).oneshot(get("/api/cms/page/about")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_type_is_400() {
    let dir = fixture();
    let response = test_app(&dir).oneshot(get("/api/cms/post/home")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_put_page_normalizes_and_persists() {
    let dir = fixture();
    let app = test_app(&dir);
    let doc = json!({"title": "Inicio", "price": "12.5", "cta": "#contacto", "extra": 1});
    let response = app
        .clone()
        .oneshot(json_request(Method::PUT, "/api/cms/page/home", &doc))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["price"], json!(12.5));

    let stored: Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("data/home.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(stored["price"], json!(12.5));
    assert_eq!(stored["extra"], json!(1));

    let response = app.oneshot(get("/api/cms/page/home")).await.unwrap();
    assert_eq!(body_json(response).await["data"]["title"], "Inicio");
}

#[tokio::test]
async fn test_put_page_rejection_returns_error_map() {
    let dir = fixture();
    let doc = json!({"price": "caro", "cta": "javascript:alert(1)"});
    let response = test_app(&dir)
        .oneshot(json_request(Method::PUT, "/api/cms/page/home", &doc))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"]["details"],
        json!({
            "title": ["Título es requerido"],
            "price": ["Precio debe ser un número"],
            "cta": ["Enlace debe ser una URL válida (http(s), relativa o ancla #)"]
        })
    );
    assert!(!dir.path().join("data/home.json").exists());
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let dir = fixture();
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/cms/page/home")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = test_app(&dir).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reload_recompiles_changed_schema() {
    let dir = fixture();
    let app = test_app(&dir);
    let doc = json!({"title": "Inicio", "price": 1, "cta": "/"});
    let response = app
        .clone()
        .oneshot(json_request(Method::PUT, "/api/cms/page/home", &doc))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    std::fs::write(
        dir.path().join("cms/page.home.yaml"),
        format!("{HOME_SCHEMA}- {{ id: subtitle, type: string, label: Subtítulo }}\n"),
    )
    .unwrap();

    // Still cached: the new field is not enforced yet.
    let response = app
        .clone()
        .oneshot(json_request(Method::PUT, "/api/cms/page/home", &doc))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/cms/reload/page/home", &json!({})))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, json!({"success": true, "reloaded": true}));

    let response = app
        .oneshot(json_request(Method::PUT, "/api/cms/page/home", &doc))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["details"]["subtitle"][0], "Subtítulo es requerido");
}

// -- Blog Entries ---------------------------------------------------------------

fn entry(slug: &str, date: &str) -> Value {
    json!({"meta": {"slug": slug, "date": date}, "body": "<p>Hola</p>"})
}

#[tokio::test]
async fn test_create_and_list_entries() {
    let dir = fixture();
    let app = test_app(&dir);
    for (slug, date) in [("primero", "2024-01-01"), ("segundo", "2024-03-01")] {
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/cms/blog/news/new", &entry(slug, date)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["slug"], slug);
        assert_eq!(body["success"], true);
    }

    let response = app.clone().oneshot(get("/api/cms/blog/news")).await.unwrap();
    let list = body_json(response).await;
    let slugs: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["slug"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(slugs, vec!["segundo", "primero"]);

    let response = app.oneshot(get("/api/cms/blog/news/primero")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["meta"]["date"], "2024-01-01");
}

#[tokio::test]
async fn test_create_existing_entry_conflicts() {
    let dir = fixture();
    let app = test_app(&dir);
    let doc = entry("hola", "2024-01-01");
    let first = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/cms/blog/news/new", &doc))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let second = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/cms/blog/news/new", &doc))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    // PUT overwrites.
    let put = app
        .oneshot(json_request(Method::PUT, "/api/cms/blog/news/hola", &doc))
        .await
        .unwrap();
    assert_eq!(put.status(), StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_keep_first_entry() {
    let dir = fixture();
    let app = test_app(&dir);
    let handles: Vec<_> = (0..6)
        .map(|i| {
            let app = app.clone();
            let mut doc = entry("carrera", "2024-01-01");
            doc["body"] = json!(format!("<p>{i}</p>"));
            tokio::spawn(async move {
                let response = app
                    .oneshot(json_request(Method::POST, "/api/cms/blog/news/new", &doc))
                    .await
                    .unwrap();
                (response.status(), doc)
            })
        })
        .collect();

    let mut created = Vec::new();
    for handle in handles {
        let (status, doc) = handle.await.unwrap();
        match status {
            StatusCode::OK => created.push(doc),
            StatusCode::CONFLICT => {}
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(created.len(), 1);

    let stored: Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("data/news/carrera.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(stored["body"], created[0]["body"]);
}

#[tokio::test]
async fn test_entry_needs_real_slug() {
    let dir = fixture();
    let doc = json!({"meta": {"date": "2024-01-01"}, "body": "x"});
    let response = test_app(&dir)
        .oneshot(json_request(Method::POST, "/api/cms/blog/news/new", &doc))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_invalid_entry_not_written() {
    let dir = fixture();
    let doc = json!({"meta": {"slug": "vacio"}, "body": ""});
    let response = test_app(&dir)
        .oneshot(json_request(Method::PUT, "/api/cms/blog/news/vacio", &doc))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["details"]["body"][0], "Contenido es requerido");
    assert!(!dir.path().join("data/news/vacio.json").exists());
}

#[tokio::test]
async fn test_new_entry_reads_empty() {
    let dir = fixture();
    let response = test_app(&dir).oneshot(get("/api/cms/blog/news/new")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!({}));
}

#[tokio::test]
async fn test_traversal_slug_rejected() {
    let dir = fixture();
    let response = test_app(&dir)
        .oneshot(get("/api/cms/blog/news/..%2F..%2Fsecret"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_blog_lists_nothing() {
    let dir = fixture();
    let response = test_app(&dir).oneshot(get("/api/cms/blog/news")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

// -- Uploads --------------------------------------------------------------------

#[tokio::test]
async fn test_upload_image() {
    let dir = fixture();
    let response = test_app(&dir)
        .oneshot(multipart_request("logo.PNG", "image/png", b"\x89PNG"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let filename = body["filename"].as_str().unwrap();
    assert!(filename.ends_with(".png"));
    assert_eq!(body["url"], format!("/uploads/{filename}"));
    assert!(dir.path().join("uploads").join(filename).exists());
}

#[tokio::test]
async fn test_upload_rejects_non_images() {
    let dir = fixture();
    let response = test_app(&dir)
        .oneshot(multipart_request("notas.txt", "text/plain", b"hola"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["error"]["message"],
        "Solo se permiten imágenes (JPEG, PNG, WebP, GIF)"
    );
}

#[tokio::test]
async fn test_upload_without_multipart_body() {
    let dir = fixture();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .body(Body::empty())
        .unwrap();
    let response = test_app(&dir).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "No se recibió ningún archivo");
}
