//! ============================================================================
//! Injected Wallet - EIP-1193 style provider over JSON-RPC
//! ============================================================================
//! Connects through `eth_requestAccounts`, checks `eth_chainId` against the
//! single supported chain and signs with `personal_sign`.
//! ============================================================================

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{MessageSigner, WalletConnector};
use crate::rpc::{JsonRpcClient, RpcError, DISCONNECTED_CODE, USER_REJECTED_CODE};
use crate::types::{Address, ConnectError, SignError, SignedAssertion, WalletSession};

/// Wallet provider restricted to one chain
pub struct InjectedWallet {
    rpc: JsonRpcClient,
    supported_chain_id: u64,
}

impl InjectedWallet {
    pub fn new(provider_url: &str, supported_chain_id: u64) -> Self {
        Self {
            rpc: JsonRpcClient::new(provider_url),
            supported_chain_id,
        }
    }

    pub fn with_timeout(provider_url: &str, supported_chain_id: u64, timeout: Duration) -> Self {
        Self {
            rpc: JsonRpcClient::with_timeout(provider_url, timeout),
            supported_chain_id,
        }
    }
}

#[async_trait]
impl WalletConnector for InjectedWallet {
    async fn activate(&self) -> Result<WalletSession, ConnectError> {
        info!("Requesting wallet accounts from {}", self.rpc.url());

        let accounts: Vec<String> = self
            .rpc
            .call("eth_requestAccounts", serde_json::json!([]))
            .await
            .map_err(connect_error)?;

        let first = accounts.first().ok_or(ConnectError::NoAccounts)?;
        let address = Address::parse(first)
            .map_err(|e| ConnectError::Provider(e.to_string()))?;

        let chain_hex: String = self
            .rpc
            .call("eth_chainId", serde_json::json!([]))
            .await
            .map_err(connect_error)?;
        let chain_id = parse_chain_id(&chain_hex)
            .ok_or_else(|| ConnectError::Provider(format!("bad chain id {:?}", chain_hex)))?;

        if chain_id != self.supported_chain_id {
            warn!(
                "Wallet on chain {}, only chain {} is supported",
                chain_id, self.supported_chain_id
            );
            return Err(ConnectError::UnsupportedChain {
                expected: self.supported_chain_id,
                actual: chain_id,
            });
        }

        info!("Wallet connected: {} (chain {})", address, chain_id);
        Ok(WalletSession { address, chain_id })
    }

    async fn deactivate(&self) {
        // Injected providers keep their own permission state; nothing to revoke here
        debug!("Wallet session released");
    }
}

#[async_trait]
impl MessageSigner for InjectedWallet {
    async fn sign_message(
        &self,
        address: &Address,
        message: &str,
    ) -> Result<SignedAssertion, SignError> {
        debug!("Requesting personal_sign from {}", address);

        let payload = format!("0x{}", hex::encode(message.as_bytes()));
        let signature: String = self
            .rpc
            .call(
                "personal_sign",
                serde_json::json!([payload, address.as_str()]),
            )
            .await
            .map_err(sign_error)?;

        if signature.is_empty() {
            return Err(SignError::Provider("empty signature".into()));
        }

        Ok(SignedAssertion { signature })
    }
}

/// Parse an `eth_chainId` quantity (`0x89` -> 137)
pub fn parse_chain_id(s: &str) -> Option<u64> {
    let digits = s.trim().strip_prefix("0x")?;
    u64::from_str_radix(digits, 16).ok()
}

fn connect_error(err: RpcError) -> ConnectError {
    match err {
        RpcError::Transport(_) => ConnectError::NoProvider,
        RpcError::Rpc { code, .. } if code == USER_REJECTED_CODE => ConnectError::Rejected,
        RpcError::Rpc { code, .. } if code == DISCONNECTED_CODE => ConnectError::NoProvider,
        other => ConnectError::Provider(other.to_string()),
    }
}

fn sign_error(err: RpcError) -> SignError {
    match err {
        RpcError::Rpc { code, .. } if code == USER_REJECTED_CODE => SignError::Rejected,
        RpcError::Rpc { code, .. } if code == DISCONNECTED_CODE => SignError::NotConnected,
        other => SignError::Provider(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chain_id() {
        assert_eq!(parse_chain_id("0x89"), Some(137));
        assert_eq!(parse_chain_id("0x1"), Some(1));
        assert_eq!(parse_chain_id("137"), None);
        assert_eq!(parse_chain_id("0xzz"), None);
    }

    #[test]
    fn test_connect_error_mapping() {
        assert_eq!(
            connect_error(RpcError::Transport("connection refused".into())),
            ConnectError::NoProvider
        );
        assert_eq!(
            connect_error(RpcError::Rpc { code: 4001, message: "User rejected".into() }),
            ConnectError::Rejected
        );
        assert!(matches!(
            connect_error(RpcError::Rpc { code: -32603, message: "internal".into() }),
            ConnectError::Provider(_)
        ));
    }

    #[test]
    fn test_sign_error_mapping() {
        assert_eq!(
            sign_error(RpcError::Rpc { code: 4001, message: "User denied".into() }),
            SignError::Rejected
        );
        assert_eq!(
            sign_error(RpcError::Rpc { code: 4900, message: "Disconnected".into() }),
            SignError::NotConnected
        );
        assert!(matches!(sign_error(RpcError::Status(502)), SignError::Provider(_)));
    }

    #[tokio::test]
    async fn test_activate_without_provider() {
        let wallet = InjectedWallet::new(&crate::test_net::closed_port_url(), 137);
        let err = wallet.activate().await.unwrap_err();
        assert_eq!(err, ConnectError::NoProvider);
    }

    #[tokio::test]
    async fn test_activate_against_stalled_provider() {
        let (_listener, url) = crate::test_net::silent_endpoint();
        let wallet = InjectedWallet::with_timeout(&url, 137, crate::test_net::SHORT_TIMEOUT);

        let result = tokio::time::timeout(Duration::from_secs(5), wallet.activate())
            .await
            .expect("activation should give up on its own");
        assert_eq!(result.unwrap_err(), ConnectError::NoProvider);
    }
}
