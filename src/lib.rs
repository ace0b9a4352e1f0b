//! Server-rendered portfolio and publishing site.
//!
//! The crate is layered: `domain` holds pure types and invariants,
//! `application` the services orchestrating them, `infra` the adapters
//! (document store client, content files, HTTP surface, telemetry), and
//! `presentation` the askama view models and templates.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
