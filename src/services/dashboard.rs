//! Dashboard counters.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Contract, ContractCounts, User};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_contracts: i64,
    pub pending_signatures: i64,
    pub completed_contracts: i64,
    pub total_value: f64,
}

impl DashboardStats {
    /// Admins see every contract and the total value; users only their own
    /// counts with the value withheld
    pub fn from_counts(counts: ContractCounts, include_value: bool) -> Self {
        Self {
            total_contracts: counts.total,
            pending_signatures: counts.pending,
            completed_contracts: counts.completed,
            total_value: if include_value { counts.total_value } else { 0.0 },
        }
    }
}

pub async fn dashboard_stats(pool: &PgPool, viewer: &User) -> Result<DashboardStats> {
    if viewer.is_admin() {
        let counts = Contract::counts(pool, None).await?;
        Ok(DashboardStats::from_counts(counts, true))
    } else {
        let counts = Contract::counts(pool, Some(viewer.id)).await?;
        Ok(DashboardStats::from_counts(counts, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_withheld_for_users() {
        let counts = ContractCounts {
            total: 4,
            pending: 1,
            completed: 2,
            total_value: 75_000_000.0,
        };
        let admin = DashboardStats::from_counts(counts, true);
        assert_eq!(admin.total_value, 75_000_000.0);
        let user = DashboardStats::from_counts(counts, false);
        assert_eq!(user.total_value, 0.0);
        assert_eq!(user.completed_contracts, 2);

        let json = serde_json::to_value(user).unwrap();
        assert_eq!(json["pendingSignatures"], 1);
    }
}
