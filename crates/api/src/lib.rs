//! # Media API
//!
//! REST API for the 3125 Media backend.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, the admin API key)
//!
//! Domain logic lives in `media-core`; this crate only shapes requests and
//! responses around it.

#![warn(rust_2018_idioms)]

pub mod dto;
