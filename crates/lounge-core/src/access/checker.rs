//! ============================================================================
//! Balance Checker - membership NFT balance lookups
//! ============================================================================
//! Reads the ERC-1155 balance of one token id for the connected account
//! through a read-only `eth_call`.
//! ============================================================================

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::types::{u128_from_word, uint256_from_decimal, BALANCE_OF_SELECTOR};
use crate::rpc::{JsonRpcClient, RpcError};
use crate::types::{Address, BalanceError};

/// Read-only token balance source
#[async_trait]
pub trait TokenBalanceReader: Send + Sync {
    /// Balance of `token_id` held by `owner` on `contract`
    async fn balance_of(
        &self,
        contract: &Address,
        owner: &Address,
        token_id: &str,
    ) -> Result<u128, BalanceError>;
}

/// ERC-1155 balance reader backed by a chain node
pub struct Erc1155BalanceReader {
    rpc: JsonRpcClient,
}

impl Erc1155BalanceReader {
    pub fn new(node_rpc_url: &str) -> Self {
        Self {
            rpc: JsonRpcClient::new(node_rpc_url),
        }
    }

    pub fn with_timeout(node_rpc_url: &str, timeout: Duration) -> Self {
        Self {
            rpc: JsonRpcClient::with_timeout(node_rpc_url, timeout),
        }
    }
}

#[async_trait]
impl TokenBalanceReader for Erc1155BalanceReader {
    async fn balance_of(
        &self,
        contract: &Address,
        owner: &Address,
        token_id: &str,
    ) -> Result<u128, BalanceError> {
        let data = encode_balance_of(owner, token_id)?;
        debug!(
            "Checking balance of token {} on {} for {}",
            token_id, contract, owner
        );

        let result: String = self
            .rpc
            .call(
                "eth_call",
                serde_json::json!([{ "to": contract.as_str(), "data": data }, "latest"]),
            )
            .await
            .map_err(|e| match e {
                RpcError::Rpc { code, message } => BalanceError::Rpc { code, message },
                RpcError::Decode(msg) => BalanceError::Malformed(msg),
                other => BalanceError::Network(other.to_string()),
            })?;

        let balance = decode_balance(&result)?;
        debug!("Token balance: {}", balance);
        Ok(balance)
    }
}

/// Calldata for `balanceOf(owner, token_id)`
pub fn encode_balance_of(owner: &Address, token_id: &str) -> Result<String, BalanceError> {
    let id_word = uint256_from_decimal(token_id)
        .ok_or_else(|| BalanceError::Malformed(format!("invalid token id {:?}", token_id)))?;

    let mut data = Vec::with_capacity(4 + 64);
    data.extend_from_slice(&BALANCE_OF_SELECTOR);
    data.extend_from_slice(&owner.to_abi_word());
    data.extend_from_slice(&id_word);

    Ok(format!("0x{}", hex::encode(data)))
}

/// Decode an `eth_call` result holding one uint256
pub fn decode_balance(result: &str) -> Result<u128, BalanceError> {
    let digits = result
        .strip_prefix("0x")
        .ok_or_else(|| BalanceError::Malformed(result.to_string()))?;

    // "0x" is what a call to a non-contract address returns
    if digits.len() != 64 {
        return Err(BalanceError::Malformed(format!(
            "expected 32-byte word, got {:?}",
            result
        )));
    }

    let bytes = hex::decode(digits).map_err(|e| BalanceError::Malformed(e.to_string()))?;
    let mut word = [0u8; 32];
    word.copy_from_slice(&bytes);
    Ok(u128_from_word(&word))
}
