use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use vetrina::application::collections::{CollectionsRepo, StoreError};
use vetrina::application::contact::ContactService;
use vetrina::application::content::ContentService;
use vetrina::application::gallery::GalleryService;
use vetrina::application::listing::BlogService;
use vetrina::domain::listing::Collection;
use vetrina::domain::records::RawDocument;
use vetrina::infra::content_file::JsonContentStore;
use vetrina::infra::http::{self, AdminState, HttpState, RouterState};

const BOUNDARY: &str = "vetrina-test-boundary";

struct EmptyRepo;

#[async_trait]
impl CollectionsRepo for EmptyRepo {
    async fn fetch_published(
        &self,
        _collection: Collection,
    ) -> Result<Vec<RawDocument>, StoreError> {
        Ok(Vec::new())
    }
}

fn test_router() -> (Router, tempfile::TempDir) {
    router_with_cap(10 * 1024 * 1024)
}

fn router_with_cap(max_attachment_bytes: u64) -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("temp content dir");
    let repo: Arc<dyn CollectionsRepo> = Arc::new(EmptyRepo);
    let content = Arc::new(ContentService::new(Arc::new(JsonContentStore::new(
        dir.path(),
    ))));
    let state = RouterState {
        http: HttpState {
            blog: Arc::new(BlogService::new(repo.clone(), 6)),
            gallery: Arc::new(GalleryService::new(repo)),
            contact: Arc::new(ContactService::new(
                Duration::ZERO,
                Duration::ZERO,
                max_attachment_bytes,
            )),
            content: content.clone(),
            site_title: "Vetrina".to_string(),
            upload_body_limit: 64 * 1024 * 1024,
        },
        admin: AdminState {
            content,
            site_title: "Vetrina".to_string(),
            upload_body_limit: 64 * 1024 * 1024,
        },
    };
    let router = http::build_router(state.clone())
        .merge(http::build_admin_router(state.clone()))
        .with_state(state);
    (router, dir)
}

fn text_part(name: &str, value: &str) -> String {
    format!(
        "--{BOUNDARY}\r\ncontent-disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
    )
}

fn file_part(name: &str, file_name: &str, content_type: &str, contents: &[u8]) -> Vec<u8> {
    let mut part = format!(
        "--{BOUNDARY}\r\ncontent-disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\ncontent-type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    part.extend_from_slice(contents);
    part.extend_from_slice(b"\r\n");
    part
}

fn multipart_body(parts: Vec<Vec<u8>>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(&part);
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn valid_fields() -> Vec<Vec<u8>> {
    vec![
        text_part("name", "Jo").into_bytes(),
        text_part("email", "jo@studio.example").into_bytes(),
        text_part("service", "branding").into_bytes(),
        text_part("message", "Hello there").into_bytes(),
    ]
}

async fn submit(router: &Router, body: Vec<u8>) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/contact")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn missing_required_fields_block_the_submission() {
    let (router, _dir) = test_router();
    let body = multipart_body(vec![text_part("name", "Jo").into_bytes()]);

    let (status, html) = submit(&router, body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("This field is required"));
    // The submitted value is rendered back into the form.
    assert!(html.contains(r#"value="Jo""#));
}

#[tokio::test]
async fn invalid_email_gets_its_own_message() {
    let (router, _dir) = test_router();
    let mut parts = valid_fields();
    parts[1] = text_part("email", "not-an-email").into_bytes();

    let (status, html) = submit(&router, multipart_body(parts)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("Please enter a valid email address"));
}

#[tokio::test]
async fn valid_submission_returns_the_confirmation() {
    let (router, _dir) = test_router();

    let (status, html) = submit(&router, multipart_body(valid_fields())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("success-modal"));
    assert!(html.contains("Thank you!"));
}

#[tokio::test]
async fn unsupported_attachment_is_rejected_without_blocking() {
    let (router, _dir) = test_router();
    let mut parts = valid_fields();
    parts.push(file_part("attachments", "notes.txt", "text/plain", b"hello"));
    parts.push(file_part(
        "attachments",
        "logo.png",
        "image/png",
        &[0u8; 128],
    ));

    let (status, html) = submit(&router, multipart_body(parts)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("File type not supported: notes.txt"));
    assert!(html.contains("logo.png"));
    assert!(!html.contains("notes.txt</span>"));
}

#[tokio::test]
async fn oversized_attachment_is_rejected_per_file() {
    let (router, _dir) = test_router();
    let oversized = vec![0u8; 10 * 1024 * 1024 + 1];
    let mut parts = valid_fields();
    parts.push(file_part("attachments", "huge.png", "image/png", &oversized));

    let (status, html) = submit(&router, multipart_body(parts)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("File too large (Max 10MB): huge.png"));
}

#[tokio::test]
async fn a_lowered_cap_rejects_files_the_default_would_accept() {
    let (router, _dir) = router_with_cap(1024 * 1024);
    let mut parts = valid_fields();
    parts.push(file_part(
        "attachments",
        "big.png",
        "image/png",
        &vec![0u8; 1024 * 1024 + 1],
    ));

    let (status, html) = submit(&router, multipart_body(parts)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("File too large (Max 1MB): big.png"));
}

#[tokio::test]
async fn accepted_attachments_preview_name_and_size() {
    let (router, _dir) = test_router();
    let mut parts = valid_fields();
    parts.push(file_part(
        "attachments",
        "brief.pdf",
        "application/pdf",
        &vec![0u8; 1024 * 1024],
    ));

    let (status, html) = submit(&router, multipart_body(parts)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("brief.pdf"));
    assert!(html.contains("1.00 MB"));
}
