use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    middleware,
    response::{Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::error;

use crate::{
    application::{
        contact::{ContactService, IncomingAttachment, SubmissionOutcome},
        content::ContentService,
        error::HttpError,
        gallery::GalleryService,
        listing::BlogService,
    },
    domain::{
        contact::ContactSubmission,
        listing::{FilterState, category_matches},
    },
    presentation::views::{
        BlogGridPartial, BlogPageContext, BlogTemplate, ContactContext, ContactSuccessPartial,
        ContactTemplate, FieldErrorPartial, FilterButton, GalleryContext, LayoutChrome,
        LayoutContext, PortfolioTemplate, ProjectModalPartial, ServiceCard, ServicesContext,
        ServicesTemplate, ToastPartial, ToastView, render_not_found_response,
        render_template_response,
    },
    util::text::capitalize,
};

use super::{
    RouterState,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct HttpState {
    pub blog: Arc<BlogService>,
    pub gallery: Arc<GalleryService>,
    pub contact: Arc<ContactService>,
    pub content: Arc<ContentService>,
    pub site_title: String,
    pub upload_body_limit: usize,
}

pub fn build_router(state: RouterState) -> Router<RouterState> {
    let upload_body_limit = state.http.upload_body_limit;

    Router::new()
        .route("/", get(index))
        .route("/blog", get(blog_page))
        .route("/blog/cards", get(blog_cards))
        .route("/blog/newsletter", post(newsletter_signup))
        .route("/portfolio", get(portfolio_page))
        .route("/portfolio/{id}/modal", get(project_modal))
        .route("/services", get(services_page))
        .route("/contact", get(contact_page).post(contact_submit))
        .route("/contact/field", post(contact_field))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(upload_body_limit))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListingQuery {
    category: Option<String>,
    q: Option<String>,
    page: Option<usize>,
}

impl ListingQuery {
    /// Decode into a [`FilterState`], applying the page last so a deep link
    /// keeps both its filters and its page.
    fn into_state(self) -> FilterState {
        let mut state = FilterState::new();
        if let Some(category) = self.category.as_deref() {
            state.set_category(category);
        }
        if let Some(query) = self.q.as_deref() {
            state.set_search(query);
        }
        if let Some(page) = self.page {
            state.set_page(page);
        }
        state
    }
}

async fn index() -> Redirect {
    Redirect::temporary("/portfolio")
}

async fn blog_page(State(state): State<HttpState>, Query(query): Query<ListingQuery>) -> Response {
    let filter = query.into_state();
    let content = blog_context(&state, &filter).await;
    let chrome = LayoutChrome::new(&state.site_title, "/blog");
    let view = LayoutContext::new(chrome, content).with_page_title("Blog");
    render_template_response(BlogTemplate { view }, StatusCode::OK)
}

/// Grid fragment re-fetched when a filter, search, or page control changes.
async fn blog_cards(State(state): State<HttpState>, Query(query): Query<ListingQuery>) -> Response {
    let filter = query.into_state();
    let content = blog_context(&state, &filter).await;
    render_template_response(BlogGridPartial { content }, StatusCode::OK)
}

/// A fetch failure keeps the page up: the grid renders an inline error block
/// and the response stays 200.
async fn blog_context(state: &HttpState, filter: &FilterState) -> BlogPageContext {
    match state.blog.page_context(filter).await {
        Ok(content) => content,
        Err(err) => {
            error!(
                target = "vetrina::http::blog",
                error = %err,
                "blog listing fetch failed"
            );
            BlogPageContext::failed(filter)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NewsletterForm {
    email: String,
}

async fn newsletter_signup(
    State(state): State<HttpState>,
    axum::Form(form): axum::Form<NewsletterForm>,
) -> Response {
    match state.contact.subscribe(&form.email).await {
        Ok(()) => render_template_response(
            ToastPartial {
                toast: ToastView::success("Subscribed successfully!".to_string()),
            },
            StatusCode::OK,
        ),
        Err(error) => render_template_response(
            ToastPartial {
                toast: ToastView::error(error.message.to_string()),
            },
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
    }
}

async fn portfolio_page(
    State(state): State<HttpState>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let filter = query.into_state();
    let (content, fetch_failed) = match state.gallery.gallery_context(&filter).await {
        Ok(content) => (content, false),
        Err(err) => {
            error!(
                target = "vetrina::http::portfolio",
                error = %err,
                "portfolio fetch failed"
            );
            (GalleryContext::failed(), true)
        }
    };

    let chrome = LayoutChrome::new(&state.site_title, "/portfolio");
    let view = LayoutContext::new(chrome, content).with_page_title("Portfolio");
    render_template_response(PortfolioTemplate { view, fetch_failed }, StatusCode::OK)
}

async fn project_modal(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    const SOURCE: &str = "infra::http::public::project_modal";

    match state.gallery.project_modal(&id).await {
        Ok(Some(detail)) => Ok(render_template_response(
            ProjectModalPartial {
                modal: detail.into(),
            },
            StatusCode::OK,
        )),
        Ok(None) => Err(HttpError::new(
            SOURCE,
            StatusCode::NOT_FOUND,
            "Project not found",
            format!("no portfolio project with id {id}"),
        )),
        Err(err) => Err(HttpError::from_error(
            SOURCE,
            StatusCode::SERVICE_UNAVAILABLE,
            "Content source temporarily unavailable",
            &err,
        )),
    }
}

async fn services_page(
    State(state): State<HttpState>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let filter = query.into_state();
    let chrome = LayoutChrome::new(&state.site_title, "/services");

    let document = match state.content.document().await {
        Ok(document) => document,
        Err(err) => {
            error!(
                target = "vetrina::http::services",
                error = %err,
                "content document load failed"
            );
            Default::default()
        }
    };

    let mut keys: Vec<String> = document
        .services
        .iter()
        .map(|entry| entry.category.to_lowercase())
        .collect();
    keys.sort_unstable();
    keys.dedup();

    let mut filters = vec![FilterButton {
        key: "all".to_string(),
        label: "All".to_string(),
        is_active: filter.active_category() == "all",
    }];
    filters.extend(keys.into_iter().map(|key| FilterButton {
        label: capitalize(&key),
        is_active: filter.active_category() == key,
        key,
    }));

    let cards = document
        .services
        .iter()
        .filter(|entry| category_matches(&entry.category.to_lowercase(), &filter))
        .map(|entry| ServiceCard {
            title: entry.title.clone(),
            description: entry.description.clone(),
            category: entry.category.to_lowercase(),
            category_label: capitalize(&entry.category),
            icon: entry.icon.clone(),
        })
        .collect();

    let content = ServicesContext {
        cards,
        filters,
        active_category: filter.active_category().to_string(),
    };
    let view = LayoutContext::new(chrome, content).with_page_title("Services");
    render_template_response(ServicesTemplate { view }, StatusCode::OK)
}

async fn contact_page(State(state): State<HttpState>) -> Response {
    let chrome = LayoutChrome::new(&state.site_title, "/contact");
    let view = LayoutContext::new(chrome, ContactContext::blank()).with_page_title("Contact");
    render_template_response(ContactTemplate { view }, StatusCode::OK)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FieldCheckForm {
    field: String,
    value: String,
}

/// Per-field validation, driven on blur. Returns the inline error fragment,
/// empty when the value is fine so a previous error clears.
async fn contact_field(
    State(state): State<HttpState>,
    axum::Form(form): axum::Form<FieldCheckForm>,
) -> Response {
    let error = state
        .contact
        .check_field(&form.field, &form.value)
        .map(|error| error.message.to_string());
    render_template_response(FieldErrorPartial { error }, StatusCode::OK)
}

async fn contact_submit(
    State(state): State<HttpState>,
    multipart: Multipart,
) -> Result<Response, HttpError> {
    const SOURCE: &str = "infra::http::public::contact_submit";

    let (submission, attachments) = read_contact_form(multipart).await.map_err(|err| {
        HttpError::new(
            SOURCE,
            StatusCode::BAD_REQUEST,
            "Malformed form submission",
            err,
        )
    })?;

    match state.contact.submit(&submission, &attachments).await {
        SubmissionOutcome::Invalid(errors) => {
            let chrome = LayoutChrome::new(&state.site_title, "/contact");
            let content = ContactContext::blank().with_errors(&submission, &errors);
            let view = LayoutContext::new(chrome, content).with_page_title("Contact");
            Ok(render_template_response(
                ContactTemplate { view },
                StatusCode::UNPROCESSABLE_ENTITY,
            ))
        }
        SubmissionOutcome::Accepted {
            previews,
            rejections,
        } => Ok(render_template_response(
            ContactSuccessPartial::new(previews, rejections),
            StatusCode::OK,
        )),
    }
}

/// Decode the multipart body: text parts fill the submission, `attachments`
/// parts become files. Unknown parts are ignored.
async fn read_contact_form(
    mut multipart: Multipart,
) -> Result<(ContactSubmission, Vec<IncomingAttachment>), String> {
    let mut submission = ContactSubmission::default();
    let mut attachments = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| err.to_string())?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "attachments" {
            let file_name = field.file_name().unwrap_or("attachment").to_string();
            let content_type = field
                .content_type()
                .map(str::to_string)
                .unwrap_or_else(|| {
                    mime_guess::from_path(&file_name)
                        .first_or_octet_stream()
                        .essence_str()
                        .to_string()
                });
            let bytes = field.bytes().await.map_err(|err| err.to_string())?;
            attachments.push(IncomingAttachment {
                name: file_name,
                content_type,
                bytes,
            });
            continue;
        }

        let value = field.text().await.map_err(|err| err.to_string())?;
        match name.as_str() {
            "name" => submission.name = value,
            "email" => submission.email = value,
            "company" => submission.company = value,
            "service" => submission.service = value,
            "message" => submission.message = value,
            _ => {}
        }
    }

    Ok((submission, attachments))
}

async fn not_found(State(state): State<HttpState>) -> Response {
    render_not_found_response(LayoutChrome::new(&state.site_title, ""))
}
