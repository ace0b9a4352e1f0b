use std::{process, sync::Arc, time::Duration};

use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

use vetrina::{
    application::{
        contact::ContactService, content::ContentService, error::AppError, gallery::GalleryService,
        listing::BlogService,
    },
    config,
    infra::{
        content_file::JsonContentStore,
        error::InfraError,
        http::{self, AdminState, HttpState, RouterState},
        store::DocumentStoreClient,
        telemetry,
    },
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let store = Arc::new(DocumentStoreClient::new(&settings.store.base_url)?);
    let content_store = Arc::new(JsonContentStore::new(settings.content.directory.clone()));

    let blog = Arc::new(BlogService::new(
        store.clone(),
        settings.listing.blog_page_size,
    ));
    let gallery = Arc::new(GalleryService::new(store));
    let contact = Arc::new(ContactService::new(
        settings.contact.submit_delay,
        settings.contact.newsletter_delay,
        settings.uploads.max_attachment_bytes.get(),
    ));
    let content = Arc::new(ContentService::new(content_store));

    // One request may batch several attachments; give the body room for a few
    // at the per-file cap.
    let upload_body_limit = usize::try_from(settings.uploads.max_attachment_bytes.get())
        .unwrap_or(usize::MAX)
        .saturating_mul(4);

    let router_state = RouterState {
        http: HttpState {
            blog,
            gallery,
            contact,
            content: content.clone(),
            site_title: settings.site.title.clone(),
            upload_body_limit,
        },
        admin: AdminState {
            content,
            site_title: settings.site.title.clone(),
            upload_body_limit,
        },
    };

    let router = http::build_router(router_state.clone())
        .merge(http::build_admin_router(router_state.clone()))
        .with_state(router_state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(addr = %settings.server.addr, "listening");

    let drain_window = settings.server.graceful_shutdown;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal(drain_window))
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal(drain_window: Duration) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received, draining connections");

    // Bound the drain: connections still open after the window are abandoned.
    tokio::spawn(async move {
        tokio::time::sleep(drain_window).await;
        warn!("graceful shutdown window elapsed, exiting");
        process::exit(1);
    });
}
