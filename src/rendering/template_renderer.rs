//! # Template Renderer
//!
//! Resolves `{{NAME}}` placeholders in contract text. Built-in placeholders
//! sourced from the contract and user records are always substituted first;
//! the contract's custom variable mapping is applied afterwards.
//!
//! Placeholders that match neither set are left in the output verbatim.
//! Custom keys are replaced in key order, so keys must not contain each other
//! as substrings; that is the caller's responsibility.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

use super::locale::IndonesianLocale;
use super::placeholders::{is_valid_placeholder_name, placeholder_token, unresolved_placeholders};

/// Custom variable bindings stored on a contract
pub type ContractVariables = BTreeMap<String, String>;

/// Names of placeholders resolved from the contract and user records
pub mod builtin {
    pub const USER_NAME: &str = "USER_NAME";
    pub const USER_EMAIL: &str = "USER_EMAIL";
    pub const USER_PHONE: &str = "USER_PHONE";
    pub const TRADING_ID: &str = "TRADING_ID";
    pub const CONTRACT_NUMBER: &str = "CONTRACT_NUMBER";
    pub const CONTRACT_DATE: &str = "CONTRACT_DATE";
    pub const AMOUNT: &str = "AMOUNT";

    /// All built-ins, in substitution order
    pub const ALL: [&str; 7] = [
        USER_NAME,
        USER_EMAIL,
        USER_PHONE,
        TRADING_ID,
        CONTRACT_NUMBER,
        CONTRACT_DATE,
        AMOUNT,
    ];
}

/// Values for the built-in placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinBindings {
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub trading_id: String,
    pub contract_number: String,
    pub created_at: DateTime<Utc>,
    pub amount: f64,
}

/// Pure placeholder substitution with locale-aware built-ins
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer {
    locale: IndonesianLocale,
}

impl TemplateRenderer {
    pub fn new(locale: IndonesianLocale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> &IndonesianLocale {
        &self.locale
    }

    /// Render `body` into finalized text
    pub fn render(
        &self,
        body: &str,
        builtins: &BuiltinBindings,
        custom: &ContractVariables,
    ) -> String {
        let mut content = body.to_string();

        for (name, value) in self.builtin_values(builtins) {
            content = replace_placeholder(&content, name, &value);
        }

        for (key, value) in custom {
            content = replace_placeholder(&content, key, value);
        }

        let unresolved = unresolved_placeholders(&content);
        if !unresolved.is_empty() {
            debug!(
                contract_number = %builtins.contract_number,
                unresolved = ?unresolved,
                "Rendered contract text still contains placeholders"
            );
        }

        content
    }

    /// Formatted built-in values paired with their placeholder names
    pub fn builtin_values(&self, builtins: &BuiltinBindings) -> [(&'static str, String); 7] {
        [
            (builtin::USER_NAME, builtins.user_name.clone()),
            (builtin::USER_EMAIL, builtins.user_email.clone()),
            (builtin::USER_PHONE, builtins.user_phone.clone()),
            (builtin::TRADING_ID, builtins.trading_id.clone()),
            (builtin::CONTRACT_NUMBER, builtins.contract_number.clone()),
            (
                builtin::CONTRACT_DATE,
                self.locale.format_date(builtins.created_at),
            ),
            (
                builtin::AMOUNT,
                self.locale.format_currency(builtins.amount),
            ),
        ]
    }
}

fn replace_placeholder(content: &str, name: &str, value: &str) -> String {
    let token = placeholder_token(name);
    if content.contains(&token) {
        content.replace(&token, value)
    } else {
        content.to_string()
    }
}

/// Convert a stored JSON object into string bindings
///
/// `null` becomes the empty string, strings are kept as-is and any other value
/// uses its JSON text. Non-object input yields no bindings.
pub fn variables_from_json(value: &serde_json::Value) -> ContractVariables {
    match value {
        serde_json::Value::Object(map) => map
            .iter()
            .filter(|(key, _)| {
                let valid = is_valid_placeholder_name(key);
                if !valid {
                    debug!(key = %key, "Ignoring variable that no placeholder can reference");
                }
                valid
            })
            .map(|(key, value)| (key.clone(), variable_value_to_string(value)))
            .collect(),
        _ => ContractVariables::new(),
    }
}

/// Inverse of [`variables_from_json`] for persistence
pub fn variables_to_json(variables: &ContractVariables) -> serde_json::Value {
    serde_json::Value::Object(
        variables
            .iter()
            .map(|(key, value)| (key.clone(), serde_json::Value::String(value.clone())))
            .collect(),
    )
}

fn variable_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
