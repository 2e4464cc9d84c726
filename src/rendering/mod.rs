//! # Contract Text Rendering
//!
//! Placeholder substitution for contract templates and the `id-ID` locale
//! formatting it relies on.

pub mod locale;
pub mod placeholders;
pub mod template_renderer;

pub use locale::{format_rupiah, IndonesianLocale};
pub use placeholders::{extract_placeholders, unresolved_placeholders};
pub use template_renderer::{
    builtin, variables_from_json, variables_to_json, BuiltinBindings, ContractVariables,
    TemplateRenderer,
};
