//! ============================================================================
//! Wallet Module - wallet connection and message signing
//! ============================================================================
//! The wallet itself (browser extension, node with unlocked accounts, ...)
//! is an external collaborator. The page controller talks to it through
//! these two traits; `InjectedWallet` is the JSON-RPC implementation.
//! ============================================================================

mod injected;

use async_trait::async_trait;

use crate::types::{Address, ConnectError, SignError, SignedAssertion, WalletSession};

pub use injected::{parse_chain_id, InjectedWallet};

/// Establishes and tears down the wallet session
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Ask the wallet for an account on the target chain
    async fn activate(&self) -> Result<WalletSession, ConnectError>;

    /// Forget the current session
    async fn deactivate(&self);
}

/// Signs plain-text messages with the connected account
#[async_trait]
pub trait MessageSigner: Send + Sync {
    async fn sign_message(
        &self,
        address: &Address,
        message: &str,
    ) -> Result<SignedAssertion, SignError>;
}
