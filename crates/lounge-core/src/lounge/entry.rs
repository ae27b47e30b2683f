//! ============================================================================
//! Lounge Entry - idle/pending state machine
//! ============================================================================
//! Idle -> Pending on click (wallet required). While pending:
//!   1. fetch a fresh access code
//!   2. sign the challenge containing that code
//!   3. navigate to /lounge with the signature
//! Every exit path, success or failure, returns to Idle. Navigation only
//! happens after both a nonce and a signature were obtained.
//! ============================================================================

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{challenge_message, lounge_target, Navigator, NonceSource};
use crate::types::{Address, LoungeError, WalletSession};
use crate::wallet::MessageSigner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryState {
    #[default]
    Idle,
    Pending,
}

/// Lounge-entry flow
#[derive(Debug, Default)]
pub struct LoungeEntry {
    state: EntryState,
}

impl LoungeEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EntryState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == EntryState::Pending
    }

    /// Idle -> Pending. Fails without a wallet or while another attempt runs.
    pub fn begin(&mut self, session: Option<&WalletSession>) -> Result<Address, LoungeError> {
        if self.is_pending() {
            return Err(LoungeError::AlreadyPending);
        }
        let session = session.ok_or(LoungeError::WalletNotConnected)?;

        self.state = EntryState::Pending;
        Ok(session.address.clone())
    }

    /// Back to Idle
    pub fn finish(&mut self) {
        self.state = EntryState::Idle;
    }

    /// Run the full flow; returns the navigation target on success
    pub async fn enter(
        &mut self,
        session: Option<&WalletSession>,
        nonces: &dyn NonceSource,
        signer: &dyn MessageSigner,
        navigator: &dyn Navigator,
    ) -> Result<String, LoungeError> {
        let address = self.begin(session)?;
        info!("Attempting lounge entry for {}", address);

        let result = run_steps(&address, nonces, signer, navigator).await;
        self.finish();

        match &result {
            Ok(target) => info!("Navigated to {}", target),
            Err(e) => warn!("Lounge entry aborted: {}", e),
        }
        result
    }
}

async fn run_steps(
    address: &Address,
    nonces: &dyn NonceSource,
    signer: &dyn MessageSigner,
    navigator: &dyn Navigator,
) -> Result<String, LoungeError> {
    let access = nonces.request_access().await?;

    let message = challenge_message(&access.nonce);
    let signed = signer.sign_message(address, &message).await?;

    let target = lounge_target(&signed.signature);
    navigator.navigate(&target).await?;
    Ok(target)
}
