//! Application services layer.

pub mod collections;
pub mod contact;
pub mod content;
pub mod error;
pub mod gallery;
pub mod listing;
