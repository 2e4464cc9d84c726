#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Kontrak Core
//!
//! Contract issuing, delivery and digital signing service.
//!
//! ## Overview
//!
//! Administrators write contract templates with `{{NAME}}` placeholders and
//! issue contracts from them to traders. A trader opens the contract through
//! a one-time access link, reads the rendered text and signs it. Signed
//! contracts are delivered as paginated PDF documents.
//!
//! ## Module Organization
//!
//! - [`rendering`] - Placeholder substitution with Indonesian date and currency formatting
//! - [`pdf`] - Markdown-like text to Letter-size PDF with header and signature block
//! - [`state_machine`] - Contract lifecycle statuses and transitions
//! - [`models`] - Users, templates, contracts and their history
//! - [`services`] - Contract, user and template workflows, credentials, rate limiting
//! - [`database`] - Pool construction, migrations and initial data
//! - [`web`] - Axum HTTP API
//! - [`config`] - Layered YAML and environment configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Console and file tracing setup
//!
//! ## Quick Start
//!
//! ```rust
//! use kontrak_core::rendering::{
//!     BuiltinBindings, ContractVariables, IndonesianLocale, TemplateRenderer,
//! };
//!
//! let renderer = TemplateRenderer::new(IndonesianLocale::wib());
//! let bindings = BuiltinBindings {
//!     user_name: "Herman Zaldivar".to_string(),
//!     user_email: "hermanzal@trader.com".to_string(),
//!     user_phone: "+62812-8888-9999".to_string(),
//!     trading_id: "TRD001".to_string(),
//!     contract_number: "TSC202401150042".to_string(),
//!     created_at: chrono::Utc::now(),
//!     amount: 50_000_000.0,
//! };
//! let text = renderer.render("Nama: {{USER_NAME}}", &bindings, &ContractVariables::new());
//! assert_eq!(text, "Nama: Herman Zaldivar");
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test                            # Unit and HTTP tests
//! cargo test --features database-tests  # Model tests against DATABASE_URL
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod pdf;
pub mod rendering;
pub mod services;
pub mod state_machine;
pub mod web;

pub use config::{ConfigManager, KontrakConfig};
pub use error::{KontrakError, Result};
pub use pdf::{DocumentFormatter, DocumentRequest, PdfError};
pub use rendering::{BuiltinBindings, ContractVariables, IndonesianLocale, TemplateRenderer};
pub use state_machine::{ContractEvent, ContractStatus};
