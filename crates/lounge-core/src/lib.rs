//! ============================================================================
//! LOUNGE-CORE: Member Lounge Page Logic
//! ============================================================================
//! This crate handles all logic for the NFT-gated member lounge page:
//! - Wallet connection restricted to one chain (JSON-RPC provider)
//! - Membership check against an ERC-1155 token balance
//! - Signed lounge entry: one-time access code -> personal_sign -> redirect
//! - Home page rendering (HTML / terminal)
//! ============================================================================

pub mod access;
pub mod config;
pub mod lounge;
pub mod page;
pub mod rpc;
pub mod types;
pub mod wallet;

#[cfg(test)]
mod test_net;

// Re-export main types for convenience
pub use types::*;
pub use access::{Erc1155BalanceReader, MembershipStatus, MembershipTracker, TokenBalanceReader};
pub use config::{ConfigError, LoungeConfig};
pub use lounge::{AccessApiClient, EntryState, LoungeEntry, Navigator, NonceSource};
pub use page::{HomeQuery, HomeView, PageController};
pub use wallet::{InjectedWallet, MessageSigner, WalletConnector};
