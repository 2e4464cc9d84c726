//! # Services
//!
//! Workflows shared by the HTTP handlers. Each service owns a pool handle and
//! the slice of configuration it needs.

pub mod contract_service;
pub mod credentials;
pub mod dashboard;
pub mod rate_limiter;
pub mod template_service;
pub mod user_service;

pub use contract_service::{
    AccessedContract, ContractDocument, ContractService, CreateContract, CreatedContract,
    GeneratedLink, SignatureSubmission, SignedContract,
};
pub use dashboard::{dashboard_stats, DashboardStats};
pub use rate_limiter::{RateLimitDecision, RateLimiter};
pub use template_service::{CreateTemplate, TemplateService};
pub use user_service::{CreateUser, CreatedUser, UserService};

/// Request origin recorded in contract history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
