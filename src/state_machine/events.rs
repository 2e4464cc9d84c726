use serde::{Deserialize, Serialize};

/// Events that can trigger contract state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractEvent {
    /// Issue the access link
    Send,
    /// Store the user's signature
    Sign,
    /// Close out a signed contract
    Complete,
    /// Expiry timestamp passed before signing
    Expire,
    /// Withdraw the contract
    Cancel,
}

impl ContractEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Sign => "sign",
            Self::Complete => "complete",
            Self::Expire => "expire",
            Self::Cancel => "cancel",
        }
    }

    /// Action name recorded in contract history
    pub fn history_action(&self) -> &'static str {
        match self {
            Self::Send => "sent",
            Self::Sign => "signed",
            Self::Complete => "completed",
            Self::Expire => "expired",
            Self::Cancel => "cancelled",
        }
    }
}
