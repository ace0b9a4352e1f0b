use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::application::contact::{
    METRIC_ATTACHMENTS_REJECTED, METRIC_CONTACT_SUBMISSIONS, METRIC_NEWSLETTER_SIGNUPS,
};
use crate::config::{LogFormat, LoggingSettings};
use crate::infra::store::{METRIC_STORE_FETCH, METRIC_STORE_FETCH_FAILED};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_STORE_FETCH,
            Unit::Count,
            "Total number of document store collection fetches."
        );
        describe_counter!(
            METRIC_STORE_FETCH_FAILED,
            Unit::Count,
            "Total number of document store fetches that failed."
        );
        describe_counter!(
            METRIC_CONTACT_SUBMISSIONS,
            Unit::Count,
            "Total number of accepted contact form submissions."
        );
        describe_counter!(
            METRIC_ATTACHMENTS_REJECTED,
            Unit::Count,
            "Total number of contact attachments rejected by screening."
        );
        describe_counter!(
            METRIC_NEWSLETTER_SIGNUPS,
            Unit::Count,
            "Total number of newsletter signups."
        );
    });
}
