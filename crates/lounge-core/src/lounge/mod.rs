//! ============================================================================
//! Lounge Module - signed entry into the member lounge
//! ============================================================================
//! Entry is authenticated server-side: the page fetches a one-time access
//! code, has the wallet sign a challenge containing it and hands the
//! signature to `/lounge`, which recovers the signer and checks the NFT
//! balance itself.
//! ============================================================================

mod api;
mod entry;

use async_trait::async_trait;
use url::form_urlencoded;

use crate::types::{AccessRequest, LoungeError, NonceError};

pub use api::AccessApiClient;
pub use entry::{EntryState, LoungeEntry};

/// Backend path issuing one-time access codes
pub const REQUEST_ACCESS_PATH: &str = "/api/request_access";

/// Protected lounge route
pub const LOUNGE_PATH: &str = "/lounge";

/// Source of single-use access codes
#[async_trait]
pub trait NonceSource: Send + Sync {
    async fn request_access(&self) -> Result<AccessRequest, NonceError>;
}

/// Moves the user to another route
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, target: &str) -> Result<(), LoungeError>;
}

/// Challenge the wallet signs; the lounge route rebuilds it from the same nonce
pub fn challenge_message(nonce: &str) -> String {
    format!("I want to enter the lounge. one-time access code: {}", nonce)
}

/// `/lounge?signature=<signature>`
pub fn lounge_target(signature: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("signature", signature)
        .finish();
    format!("{}?{}", LOUNGE_PATH, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_message() {
        assert_eq!(
            challenge_message("abc123"),
            "I want to enter the lounge. one-time access code: abc123"
        );
    }

    #[test]
    fn test_lounge_target() {
        assert_eq!(lounge_target("0xdeadbeef"), "/lounge?signature=0xdeadbeef");
    }

    #[test]
    fn test_lounge_target_encodes() {
        assert_eq!(lounge_target("a b&c"), "/lounge?signature=a+b%26c");
    }
}
