pub mod contract;
pub mod contract_history;
pub mod template;
pub mod user;

// Re-export core models for easy access
pub use contract::{Contract, ContractCounts, ContractSummary, NewContract, LIST_LIMIT};
pub use contract_history::{ContractHistory, NewContractHistory};
pub use template::{NewTemplate, Template, DEFAULT_CATEGORY};
pub use user::{NewUser, User, UserRole};
