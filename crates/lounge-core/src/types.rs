//! ============================================================================
//! Core Types for the Member Lounge
//! ============================================================================
//! Wallet session, access request, signed assertion and the error taxonomy
//! shared by the wallet, access and lounge modules. Serializable types are
//! what the CLI prints with `--format json`.
//! ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

// ============================================================================
// Wallet Types
// ============================================================================

/// EVM account address (`0x` + 40 hex chars).
///
/// Keeps the provider's spelling for display (checksum casing), compares and
/// hashes case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let s = s.trim();
        let hex_part = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| AddressError(s.to_string()))?;

        if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressError(s.to_string()));
        }

        Ok(Self(format!("0x{}", hex_part)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form, used as the tag for membership queries
    pub fn canonical(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Left-padded 32-byte ABI word
    pub fn to_abi_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        // Validated in parse(), decode cannot fail
        if let Ok(bytes) = hex::decode(&self.canonical()[2..]) {
            word[12..].copy_from_slice(&bytes);
        }
        word
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid address: {0:?}")]
pub struct AddressError(pub String);

/// A connected wallet. Absence of a session is modelled as `Option<WalletSession>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSession {
    pub address: Address,
    pub chain_id: u64,
}

// ============================================================================
// Lounge Entry Types
// ============================================================================

/// Response of `GET /api/request_access`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    pub nonce: String,
}

/// Signature over the lounge challenge message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAssertion {
    pub signature: String,
}

// ============================================================================
// Notices
// ============================================================================

/// Area a user-visible notice belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Connection,
    Membership,
    LoungeEntry,
}

/// Non-fatal error surfaced on the page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Wallet connection failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    #[error("No wallet provider found")]
    NoProvider,

    #[error("Connection request rejected by user")]
    Rejected,

    #[error("Unsupported network: expected chain {expected}, wallet is on chain {actual}")]
    UnsupportedChain { expected: u64, actual: u64 },

    #[error("Wallet returned no accounts")]
    NoAccounts,

    #[error("Wallet provider error: {0}")]
    Provider(String),
}

/// Token balance query failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BalanceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Malformed balance result: {0}")]
    Malformed(String),
}

/// Message signing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignError {
    #[error("Signature request rejected by user")]
    Rejected,

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Wallet provider error: {0}")]
    Provider(String),
}

/// Nonce fetch failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NonceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Access API returned status {0}")]
    Status(u16),

    #[error("Malformed access response: {0}")]
    Malformed(String),
}

/// Lounge-entry flow failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoungeError {
    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Lounge entry already in progress")]
    AlreadyPending,

    #[error("Failed to request access code: {0}")]
    Nonce(#[from] NonceError),

    #[error("Failed to sign access message: {0}")]
    Signing(#[from] SignError),

    #[error("Navigation failed: {0}")]
    Navigation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parse() {
        let addr = Address::parse("0x8b0A0b7Ba195E37065fc28436875877FDa0b1A15").unwrap();
        assert_eq!(addr.as_str(), "0x8b0A0b7Ba195E37065fc28436875877FDa0b1A15");
        assert_eq!(addr.canonical(), "0x8b0a0b7ba195e37065fc28436875877fda0b1a15");
    }

    #[test]
    fn test_address_rejects_garbage() {
        assert!(Address::parse("8b0A0b7Ba195E37065fc28436875877FDa0b1A15").is_err());
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse("0xZZ0A0b7Ba195E37065fc28436875877FDa0b1A15").is_err());
    }

    #[test]
    fn test_address_case_insensitive_eq() {
        let a = Address::parse("0x8b0A0b7Ba195E37065fc28436875877FDa0b1A15").unwrap();
        let b = Address::parse("0x8b0a0b7ba195e37065fc28436875877fda0b1a15").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_address_abi_word() {
        let addr = Address::parse("0x00000000000000000000000000000000000000ff").unwrap();
        let word = addr.to_abi_word();
        assert!(word[..31].iter().all(|b| *b == 0));
        assert_eq!(word[31], 0xff);
    }

    #[test]
    fn test_address_serde() {
        let json = serde_json::json!("0x8b0A0b7Ba195E37065fc28436875877FDa0b1A15");
        let addr: Address = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&addr).unwrap(), json);

        let bad: Result<Address, _> = serde_json::from_value(serde_json::json!("nope"));
        assert!(bad.is_err());
    }

    #[test]
    fn test_lounge_error_from() {
        let err: LoungeError = SignError::Rejected.into();
        assert_eq!(err, LoungeError::Signing(SignError::Rejected));
        assert!(err.to_string().contains("rejected"));
    }
}
