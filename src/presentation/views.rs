use crate::application::error::{ErrorReport, HttpError};
use crate::domain::attachments::AttachmentPreview;
use crate::domain::attachments::AttachmentRejection;
use crate::domain::contact::FieldError;
use crate::domain::gallery::ProjectDetail;
use crate::domain::listing::FilterState;
use crate::util::text::capitalize;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let view = LayoutContext::new(chrome, ());
    let mut response = render_template_response(NotFoundTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

/// The static site frame: brand, sidebar navigation, footer.
#[derive(Clone)]
pub struct LayoutChrome {
    pub site_title: String,
    pub navigation: Vec<NavigationLinkView>,
    pub footer_copy: String,
}

impl LayoutChrome {
    /// Chrome with the entry matching `active_path` highlighted.
    pub fn new(site_title: &str, active_path: &str) -> Self {
        let entries = [
            ("Portfolio", "/portfolio"),
            ("Services", "/services"),
            ("Blog", "/blog"),
            ("Contact", "/contact"),
        ];
        Self {
            site_title: site_title.to_string(),
            navigation: entries
                .iter()
                .map(|(label, href)| NavigationLinkView {
                    label: (*label).to_string(),
                    href: (*href).to_string(),
                    is_active: *href == active_path,
                })
                .collect(),
            footer_copy: format!("© 2026 {site_title}. All rights reserved."),
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub site_title: String,
    pub navigation: Vec<NavigationLinkView>,
    pub footer_copy: String,
    pub page_title: String,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        let page_title = chrome.site_title.clone();
        Self {
            site_title: chrome.site_title,
            navigation: chrome.navigation,
            footer_copy: chrome.footer_copy,
            page_title,
            content,
        }
    }

    pub fn with_page_title(mut self, title: &str) -> Self {
        self.page_title = format!("{title} | {}", self.site_title);
        self
    }
}

#[derive(Clone)]
pub struct FilterButton {
    pub key: String,
    pub label: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct PageButton {
    pub number: usize,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct BlogCard {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub date_label: String,
    pub category_label: String,
    pub image: String,
    pub read_time: String,
}

/// How the content grid rendered: items, a no-match message, a no-content
/// message, or the inline fetch-failure block.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum GridOutcome {
    Items,
    NoMatches,
    NoContent,
    Failed,
}

impl GridOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, GridOutcome::Failed)
    }
}

#[derive(Clone)]
pub struct BlogPageContext {
    pub cards: Vec<BlogCard>,
    pub pages: Vec<PageButton>,
    pub outcome: GridOutcome,
    pub filters: Vec<FilterButton>,
    pub active_category: String,
    pub search_query: String,
}

impl BlogPageContext {
    /// The store returned no documents at all.
    pub fn empty(state: &FilterState) -> Self {
        Self {
            cards: Vec::new(),
            pages: Vec::new(),
            outcome: GridOutcome::NoContent,
            filters: Vec::new(),
            active_category: state.active_category().to_string(),
            search_query: state.search_query().to_string(),
        }
    }

    /// The fetch failed; the page stays up with an inline error block.
    pub fn failed(state: &FilterState) -> Self {
        Self {
            outcome: GridOutcome::Failed,
            ..Self::empty(state)
        }
    }
}

#[derive(Template)]
#[template(path = "blog.html")]
pub struct BlogTemplate {
    pub view: LayoutContext<BlogPageContext>,
}

#[derive(Template)]
#[template(path = "partials/blog_grid.html")]
pub struct BlogGridPartial {
    pub content: BlogPageContext,
}

#[derive(Clone)]
pub struct ProjectCard {
    pub id: String,
    pub title: String,
    pub category_label: String,
    pub year: String,
    pub excerpt: String,
    pub image: String,
}

#[derive(Clone)]
pub struct GalleryContext {
    pub cards: Vec<ProjectCard>,
    pub visible_count: usize,
    pub filters: Vec<FilterButton>,
    pub active_category: String,
}

impl GalleryContext {
    pub fn failed() -> Self {
        Self {
            cards: Vec::new(),
            visible_count: 0,
            filters: Vec::new(),
            active_category: "all".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "portfolio.html")]
pub struct PortfolioTemplate {
    pub view: LayoutContext<GalleryContext>,
    pub fetch_failed: bool,
}

/// The modal payload with display-ready labels.
#[derive(Clone)]
pub struct ProjectModalView {
    pub title: String,
    pub category_label: String,
    pub year: String,
    pub image: String,
    pub description: String,
    pub link: Option<String>,
    pub cta: String,
}

impl From<ProjectDetail> for ProjectModalView {
    fn from(detail: ProjectDetail) -> Self {
        Self {
            title: detail.title,
            category_label: capitalize(&detail.category),
            year: detail.year,
            image: detail.image,
            description: detail.description,
            link: detail.link,
            cta: detail.cta,
        }
    }
}

#[derive(Template)]
#[template(path = "partials/project_modal.html")]
pub struct ProjectModalPartial {
    pub modal: ProjectModalView,
}

#[derive(Clone)]
pub struct ServiceCard {
    pub title: String,
    pub description: String,
    pub category: String,
    pub category_label: String,
    pub icon: String,
}

#[derive(Clone)]
pub struct ServicesContext {
    pub cards: Vec<ServiceCard>,
    pub filters: Vec<FilterButton>,
    pub active_category: String,
}

#[derive(Template)]
#[template(path = "services.html")]
pub struct ServicesTemplate {
    pub view: LayoutContext<ServicesContext>,
}

#[derive(Clone)]
pub struct ContactFieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct ContactContext {
    pub fields: Vec<ContactFieldView>,
    pub message_value: String,
    pub message_error: Option<String>,
}

impl ContactContext {
    pub fn blank() -> Self {
        Self {
            fields: vec![
                ContactFieldView {
                    name: "name",
                    label: "Name",
                    value: String::new(),
                    error: None,
                },
                ContactFieldView {
                    name: "email",
                    label: "Email",
                    value: String::new(),
                    error: None,
                },
                ContactFieldView {
                    name: "company",
                    label: "Company",
                    value: String::new(),
                    error: None,
                },
                ContactFieldView {
                    name: "service",
                    label: "Service",
                    value: String::new(),
                    error: None,
                },
            ],
            message_value: String::new(),
            message_error: None,
        }
    }

    /// Re-render the submitted values with their inline errors.
    pub fn with_errors(
        mut self,
        values: &crate::domain::contact::ContactSubmission,
        errors: &[FieldError],
    ) -> Self {
        for field in &mut self.fields {
            field.value = values.field_value(field.name).to_string();
            field.error = errors
                .iter()
                .find(|error| error.field == field.name)
                .map(|error| error.message.to_string());
        }
        self.message_value = values.message.clone();
        self.message_error = errors
            .iter()
            .find(|error| error.field == "message")
            .map(|error| error.message.to_string());
        self
    }
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub view: LayoutContext<ContactContext>,
}

#[derive(Template)]
#[template(path = "partials/field_error.html")]
pub struct FieldErrorPartial {
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct ToastView {
    pub message: String,
    pub kind: &'static str,
}

impl ToastView {
    pub fn error(message: String) -> Self {
        Self {
            message,
            kind: "error",
        }
    }

    pub fn success(message: String) -> Self {
        Self {
            message,
            kind: "success",
        }
    }
}

/// Rendered after an accepted submission: the confirmation modal, the
/// accepted-file previews, and one toast per rejected file.
#[derive(Template)]
#[template(path = "partials/contact_success.html")]
pub struct ContactSuccessPartial {
    pub previews: Vec<AttachmentPreview>,
    pub toasts: Vec<ToastView>,
}

impl ContactSuccessPartial {
    pub fn new(previews: Vec<AttachmentPreview>, rejections: Vec<AttachmentRejection>) -> Self {
        Self {
            previews,
            toasts: rejections
                .into_iter()
                .map(|rejection| ToastView::error(rejection.to_string()))
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "partials/toast.html")]
pub struct ToastPartial {
    pub toast: ToastView,
}

#[derive(Template)]
#[template(path = "partials/toast_stack.html")]
pub struct ToastStackPartial {
    pub toasts: Vec<ToastView>,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub view: LayoutContext<()>,
}
