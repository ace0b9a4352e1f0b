//! Domain layer types and invariants.

pub mod attachments;
pub mod contact;
pub mod content;
pub mod gallery;
pub mod listing;
pub mod records;
