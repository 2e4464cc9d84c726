//! Passwords, access tokens and generated identifiers.

use chrono::NaiveDate;
use rand::Rng;

use crate::error::{KontrakError, Result};

/// Access tokens shorter than this are rejected without a lookup
pub const MIN_ACCESS_TOKEN_LENGTH: usize = 32;

const ACCESS_TOKEN_BYTES: usize = 32;
const CONTRACT_NUMBER_PREFIX: &str = "TSC";
const TRADING_ACCOUNT_PREFIX: &str = "TRD";

/// Hash a password with bcrypt on a blocking worker
pub async fn hash_password(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| KontrakError::Internal(format!("password hashing task failed: {e}")))?
        .map_err(KontrakError::from)
}

/// Verify a password against a stored bcrypt hash; malformed hashes never match
pub async fn verify_password(password: String, password_hash: String) -> bool {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash).unwrap_or(false))
        .await
        .unwrap_or(false)
}

/// 32 random bytes, hex encoded (64 characters)
pub fn generate_access_token() -> String {
    let bytes: [u8; ACCESS_TOKEN_BYTES] = rand::thread_rng().gen();
    hex::encode(bytes)
}

pub fn is_plausible_access_token(token: &str) -> bool {
    token.len() >= MIN_ACCESS_TOKEN_LENGTH
}

/// `TSC<YYYYMMDD><0000-9998>`
pub fn generate_contract_number(date: NaiveDate) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..9999);
    format!(
        "{CONTRACT_NUMBER_PREFIX}{}{suffix:04}",
        date.format("%Y%m%d")
    )
}

/// `TRD` followed by the last six digits of the epoch milliseconds
pub fn default_trading_account(epoch_millis: i64) -> String {
    format!("{TRADING_ACCOUNT_PREFIX}{:06}", epoch_millis.rem_euclid(1_000_000))
}
