//! # Web API Middleware
//!
//! Request IDs, rate limiting and session authentication. The layers are
//! assembled in [`crate::web::create_app`].

pub mod auth;
pub mod rate_limit;
pub mod request_id;
