//! # Media Core
//!
//! Domain logic for the 3125 Media publication backend:
//! - the editor document tree and the Markdown converter that feeds it
//! - category tree and comment threading builders
//! - popular-article ranking windows with their fallback
//! - token-cost accounting for AI-assisted drafting
//! - the thin client over the hosted database service
//!
//! **No API concerns**: HTTP routing, request/response types and the server
//! binary live in `media-api`.

pub mod categories;
pub mod comments;
pub mod config;
pub mod db;
pub mod document;
pub mod drafting;
pub mod error;
pub mod markdown;
pub mod openai;
pub mod ranking;
pub mod usage;

pub use config::CoreConfig;
pub use error::{MediaError, MediaResult};
