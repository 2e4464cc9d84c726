use serde::{Deserialize, Serialize};
use std::fmt;

/// Contract lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Created but not yet delivered to the user
    Draft,
    /// Access link issued, waiting for a signature
    Sent,
    /// Signed by the user through the access link
    Signed,
    /// Closed out by an administrator after signing
    Completed,
    /// Read after its expiry timestamp
    Expired,
    /// Withdrawn before signing
    Cancelled,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 6] = [
        Self::Draft,
        Self::Sent,
        Self::Signed,
        Self::Completed,
        Self::Expired,
        Self::Cancelled,
    ];

    /// A signature payload is stored exactly in these states
    pub fn is_signed(&self) -> bool {
        matches!(self, Self::Signed | Self::Completed)
    }

    /// States in which the expiry timestamp is still enforced
    pub fn can_expire(&self) -> bool {
        matches!(self, Self::Draft | Self::Sent)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Signed => "signed",
            Self::Completed => "completed",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContractStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "signed" => Ok(Self::Signed),
            "completed" => Ok(Self::Completed),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid contract status: {s}")),
        }
    }
}

/// Default state for new contracts
impl Default for ContractStatus {
    fn default() -> Self {
        Self::Draft
    }
}
