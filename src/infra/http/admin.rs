use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    middleware,
    response::{Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::error;

use crate::{
    application::{
        content::{ContentService, NewBlogEntry, NewProject},
        error::HttpError,
    },
    domain::content::ContentDocument,
    presentation::{
        admin::{
            AdminDashboardTemplate, AdminDashboardView, AdminEditorTemplate, AdminEditorView,
            AdminLayout,
        },
        views::{ToastStackPartial, ToastView, render_template_response},
    },
};

use super::{
    RouterState,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct AdminState {
    pub content: Arc<ContentService>,
    pub site_title: String,
    pub upload_body_limit: usize,
}

pub fn build_admin_router(state: RouterState) -> Router<RouterState> {
    let upload_body_limit = state.admin.upload_body_limit;

    Router::new()
        .route("/admin", get(dashboard))
        .route("/admin/editor", get(editor))
        .route("/admin/content", post(save_document))
        .route("/admin/about", post(save_about))
        .route("/admin/blog", post(create_blog_entry))
        .route("/admin/portfolio", post(create_project))
        .route("/admin/media", post(upload_media))
        .layer(DefaultBodyLimit::max(upload_body_limit))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

const SOURCE: &str = "infra::http::admin";

fn store_error(err: impl std::error::Error) -> HttpError {
    HttpError::from_error(
        SOURCE,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Content store unavailable",
        &err,
    )
}

async fn dashboard(State(state): State<AdminState>) -> Result<Response, HttpError> {
    let stats = state.content.dashboard().await.map_err(store_error)?;
    let view = AdminLayout::new(&state.site_title, AdminDashboardView::from_stats(stats));
    Ok(render_template_response(
        AdminDashboardTemplate { view },
        StatusCode::OK,
    ))
}

async fn editor(State(state): State<AdminState>) -> Result<Response, HttpError> {
    let document = state.content.document().await.map_err(store_error)?;
    let media = state.content.media().await.map_err(store_error)?;
    let view = AdminLayout::new(&state.site_title, AdminEditorView::new(&document, &media));
    Ok(render_template_response(
        AdminEditorTemplate { view },
        StatusCode::OK,
    ))
}

/// Wholesale save: the editor posts the entire document and it replaces
/// whatever was stored.
async fn save_document(
    State(state): State<AdminState>,
    Json(document): Json<ContentDocument>,
) -> Result<Redirect, HttpError> {
    state
        .content
        .save_document(document)
        .await
        .map_err(store_error)?;
    Ok(Redirect::to("/admin/editor"))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AboutForm {
    body_html: String,
}

async fn save_about(
    State(state): State<AdminState>,
    axum::Form(form): axum::Form<AboutForm>,
) -> Result<Redirect, HttpError> {
    state
        .content
        .save_about(&form.body_html)
        .await
        .map_err(store_error)?;
    Ok(Redirect::to("/admin/editor"))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BlogEntryForm {
    title: String,
    category: String,
    excerpt: String,
    body_html: String,
}

async fn create_blog_entry(
    State(state): State<AdminState>,
    axum::Form(form): axum::Form<BlogEntryForm>,
) -> Result<Redirect, HttpError> {
    if form.title.trim().is_empty() {
        return Err(HttpError::new(
            SOURCE,
            StatusCode::UNPROCESSABLE_ENTITY,
            "A title is required",
            "blog entry submitted without a title",
        ));
    }

    state
        .content
        .create_blog_entry(NewBlogEntry {
            title: form.title,
            category: form.category,
            excerpt: form.excerpt,
            body_html: form.body_html,
        })
        .await
        .map_err(store_error)?;
    Ok(Redirect::to("/admin/editor"))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProjectForm {
    name: String,
    category: String,
    description: String,
    image_url: String,
    link: String,
    featured: bool,
}

async fn create_project(
    State(state): State<AdminState>,
    axum::Form(form): axum::Form<ProjectForm>,
) -> Result<Redirect, HttpError> {
    if form.name.trim().is_empty() {
        return Err(HttpError::new(
            SOURCE,
            StatusCode::UNPROCESSABLE_ENTITY,
            "A name is required",
            "project submitted without a name",
        ));
    }

    state
        .content
        .create_project(NewProject {
            name: form.name,
            category: form.category,
            description: form.description,
            image_url: form.image_url,
            link: form.link,
            featured: form.featured,
        })
        .await
        .map_err(store_error)?;
    Ok(Redirect::to("/admin/editor"))
}

/// Record each uploaded file; one file's failure never aborts the batch.
/// The response is one toast per file, success or failure.
async fn upload_media(
    State(state): State<AdminState>,
    mut multipart: Multipart,
) -> Result<Response, HttpError> {
    let mut toasts = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        HttpError::new(
            SOURCE,
            StatusCode::BAD_REQUEST,
            "Malformed upload",
            err.to_string(),
        )
    })? {
        if field.name() != Some("files") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(&name)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(
                    target = "vetrina::http::admin",
                    file = %name,
                    error = %err,
                    "failed to read uploaded file"
                );
                toasts.push(ToastView::error(format!("Failed to upload {name}")));
                continue;
            }
        };

        match state.content.record_media(&name, &content_type, &bytes).await {
            Ok(_) => toasts.push(ToastView::success(format!("{name} uploaded successfully"))),
            Err(err) => {
                error!(
                    target = "vetrina::http::admin",
                    file = %name,
                    error = %err,
                    "failed to record uploaded file"
                );
                toasts.push(ToastView::error(format!("Failed to upload {name}")));
            }
        }
    }

    Ok(render_template_response(
        ToastStackPartial { toasts },
        StatusCode::OK,
    ))
}
