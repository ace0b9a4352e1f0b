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

struct StubRepo {
    blog: Vec<RawDocument>,
    portfolio: Vec<RawDocument>,
    fail: bool,
}

#[async_trait]
impl CollectionsRepo for StubRepo {
    async fn fetch_published(
        &self,
        collection: Collection,
    ) -> Result<Vec<RawDocument>, StoreError> {
        if self.fail {
            return Err(StoreError::transport("connection refused"));
        }
        Ok(match collection {
            Collection::Blog => self.blog.clone(),
            Collection::Portfolio => self.portfolio.clone(),
        })
    }
}

fn blog_doc(id: &str, title: &str, category: &str) -> RawDocument {
    RawDocument {
        category: Some(category.to_string()),
        excerpt: Some(format!("{title} excerpt")),
        created_at: Some(1_700_000_000),
        ..RawDocument::new(id, title)
    }
}

fn router_with(repo: StubRepo) -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("temp content dir");
    let repo: Arc<dyn CollectionsRepo> = Arc::new(repo);
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
                10 * 1024 * 1024,
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

async fn get_body(router: &Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn root_redirects_to_the_portfolio() {
    let (router, _dir) = router_with(StubRepo {
        blog: vec![],
        portfolio: vec![],
        fail: false,
    });
    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/portfolio"
    );
}

#[tokio::test]
async fn blog_page_renders_cards_with_derived_labels() {
    let (router, _dir) = router_with(StubRepo {
        blog: vec![blog_doc("b1", "Launch Notes", "Design")],
        portfolio: vec![],
        fail: false,
    });

    let (status, body) = get_body(&router, "/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Launch Notes"));
    assert!(body.contains("Nov 14, 2023"));
    assert!(body.contains("5 min read"));
    assert!(body.contains("Design"));
}

#[tokio::test]
async fn blog_fetch_failure_stays_200_with_an_inline_error() {
    let (router, _dir) = router_with(StubRepo {
        blog: vec![],
        portfolio: vec![],
        fail: true,
    });

    let (status, body) = get_body(&router, "/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Error loading content."));
}

#[tokio::test]
async fn empty_store_renders_the_no_articles_message() {
    let (router, _dir) = router_with(StubRepo {
        blog: vec![],
        portfolio: vec![],
        fail: false,
    });

    let (status, body) = get_body(&router, "/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No articles found."));
}

#[tokio::test]
async fn fourteen_articles_paginate_into_three_pages() {
    let blog = (0..14)
        .map(|n| blog_doc(&format!("b{n}"), &format!("Post {n}"), "design"))
        .collect();
    let (router, _dir) = router_with(StubRepo {
        blog,
        portfolio: vec![],
        fail: false,
    });

    let (_, body) = get_body(&router, "/blog").await;
    assert!(body.contains("page=3"));
    assert!(!body.contains("page=4"));

    // The last page holds the remaining two cards.
    let (_, page3) = get_body(&router, "/blog/cards?page=3").await;
    assert_eq!(page3.matches("blog-card").count(), 2);

    // Past the last page: an empty slice, controls still rendered.
    let (_, page9) = get_body(&router, "/blog/cards?page=9").await;
    assert_eq!(page9.matches("blog-card").count(), 0);
    assert!(page9.contains("page=3"));
}

#[tokio::test]
async fn category_filter_matches_by_substring() {
    let (router, _dir) = router_with(StubRepo {
        blog: vec![
            blog_doc("b1", "Campaign recap", "social-media"),
            blog_doc("b2", "Grid systems", "design"),
        ],
        portfolio: vec![],
        fail: false,
    });

    let (_, body) = get_body(&router, "/blog/cards?category=social").await;
    assert!(body.contains("Campaign recap"));
    assert!(!body.contains("Grid systems"));
}

#[tokio::test]
async fn search_matches_lowercased_title_and_excerpt() {
    let (router, _dir) = router_with(StubRepo {
        blog: vec![
            blog_doc("b1", "Brand Refresh", "design"),
            blog_doc("b2", "Grid systems", "design"),
        ],
        portfolio: vec![],
        fail: false,
    });

    let (_, body) = get_body(&router, "/blog/cards?q=REFRESH").await;
    assert!(body.contains("Brand Refresh"));
    assert!(!body.contains("Grid systems"));
}

#[tokio::test]
async fn portfolio_modal_returns_404_for_unknown_projects() {
    let (router, _dir) = router_with(StubRepo {
        blog: vec![],
        portfolio: vec![],
        fail: false,
    });

    let (status, _) = get_body(&router, "/portfolio/nope/modal").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn portfolio_modal_hides_placeholder_links() {
    let portfolio = vec![
        RawDocument {
            category: Some("Branding".to_string()),
            description: Some("Full identity".to_string()),
            link: Some("#".to_string()),
            created_at: Some(1_600_000_000),
            ..RawDocument::new("p1", "Identity Work")
        },
        RawDocument {
            link: Some("https://example.com/case".to_string()),
            cta: Some("See it live".to_string()),
            ..RawDocument::new("p2", "Linked Work")
        },
    ];
    let (router, _dir) = router_with(StubRepo {
        blog: vec![],
        portfolio,
        fail: false,
    });

    let (status, body) = get_body(&router, "/portfolio/p1/modal").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Identity Work"));
    assert!(body.contains("2020"));
    assert!(!body.contains("modal-cta"));

    let (_, linked) = get_body(&router, "/portfolio/p2/modal").await;
    assert!(linked.contains("https://example.com/case"));
    assert!(linked.contains("See it live"));
}

#[tokio::test]
async fn portfolio_grid_shows_the_visible_count() {
    let portfolio = vec![
        RawDocument {
            category: Some("branding".to_string()),
            ..RawDocument::new("p1", "One")
        },
        RawDocument {
            category: Some("web".to_string()),
            ..RawDocument::new("p2", "Two")
        },
    ];
    let (router, _dir) = router_with(StubRepo {
        blog: vec![],
        portfolio,
        fail: false,
    });

    let (_, body) = get_body(&router, "/portfolio?category=web").await;
    assert!(body.contains(r#"<span id="count">1</span>"#));
    assert!(body.contains("Two"));
    assert!(!body.contains(">One<"));
}

#[tokio::test]
async fn newsletter_signup_validates_the_address() {
    let (router, _dir) = router_with(StubRepo {
        blog: vec![],
        portfolio: vec![],
        fail: false,
    });

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/blog/newsletter")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("email=not-an-email"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/blog/newsletter")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("email=jo%40studio.example"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("Subscribed successfully!"));
}

#[tokio::test]
async fn field_check_returns_the_inline_error_fragment() {
    let (router, _dir) = router_with(StubRepo {
        blog: vec![],
        portfolio: vec![],
        fail: false,
    });

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/contact/field")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("field=email&value=bad"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("Please enter a valid email address"));

    // A valid value renders an empty fragment, clearing any prior error.
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/contact/field")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("field=email&value=jo%40studio.example"))
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(!String::from_utf8_lossy(&bytes).contains("field-error"));
}
